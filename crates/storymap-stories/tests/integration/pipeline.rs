//! End-to-end collection builds over a story directory.

use storymap_core::Error;
use storymap_content::{FrontmatterParser, ParseOptions};
use storymap_stories::{BuildOptions, CollectionBuilder, StorySchema, build_collection};

use crate::common::{StoryDir, one_broken, status_and_dates};

fn ids(collection: &storymap_stories::Collection) -> Vec<String> {
    collection.stories().iter().map(|s| s.id.clone()).collect()
}

#[test]
fn test_partial_failure_is_isolated() {
    let dir = one_broken();
    let collection = build_collection(dir.store(), false).expect("Lenient build should succeed");

    assert_eq!(ids(&collection), vec!["cy", "ana"]);
    assert_eq!(collection.errors().len(), 1);

    let failure = &collection.errors()[0];
    assert_eq!(failure.id, "ben");
    assert_eq!(failure.key.as_deref(), Some("ben.mdx"));
    assert_eq!(failure.messages(), vec!["title: Required"]);
}

#[test]
fn test_strict_mode_raises_one_aggregate_error() {
    let dir = one_broken();
    let err = build_collection(dir.store(), true).unwrap_err();

    assert!(matches!(err, Error::StrictValidation { .. }));
    assert_eq!(err.failures().len(), 1);
    assert_eq!(err.failures()[0].id, "ben");

    let summary = err.to_string();
    assert!(summary.contains("1 document"), "{summary}");
    assert!(summary.contains("ben (ben.mdx)"), "{summary}");
    assert!(summary.contains("title: Required"), "{summary}");
}

#[test]
fn test_non_utf8_document_is_isolated() {
    let dir = StoryDir::new()
        .story("ana.mdx", "title: Ana", "Ana's story.")
        .bytes("latin1.mdx", b"---\ntitle: Jos\xe9\n---\n");

    let collection = build_collection(dir.store(), false).expect("Lenient build should succeed");
    assert_eq!(ids(&collection), vec!["ana"]);
    assert_eq!(collection.errors().len(), 1);

    let failure = &collection.errors()[0];
    assert_eq!(failure.id, "latin1");
    assert_eq!(failure.key.as_deref(), Some("latin1.mdx"));
    assert_eq!(failure.messages(), vec!["document: not valid UTF-8"]);

    let err = build_collection(dir.store(), true).unwrap_err();
    assert_eq!(err.failures()[0].id, "latin1");
}

#[test]
fn test_published_before_draft_dominates_recency() {
    let dir = status_and_dates();
    let collection = build_collection(dir.store(), true).unwrap();
    assert_eq!(ids(&collection), vec!["b", "a", "c"]);
}

#[test]
fn test_rebuild_is_identical() {
    let dir = status_and_dates()
        .story("d.mdx", "title: d\ndate: TBD", "")
        .story("e.mdx", "title: D", "")
        .story("f.mdx", "title: f\ndate: March 4, 2024", "");
    let builder = CollectionBuilder::new(dir.store());

    let first = builder.build().unwrap();
    let second = builder.build().unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(ids(&first), vec!["b", "f", "a", "e", "d", "c"]);
}

#[test]
fn test_coordinate_shape() {
    let dir = StoryDir::new()
        .story("one.mdx", "title: One\ncoordinates: [1]", "")
        .story("three.mdx", "title: Three\ncoordinates: [1, 2, 3]", "")
        .story("ok.mdx", "title: Ok\ncoordinates: [-122.4, 37.7]", "");
    let collection = build_collection(dir.store(), false).unwrap();

    assert_eq!(ids(&collection), vec!["ok"]);
    let coords = collection.find("ok").unwrap().coordinates.unwrap();
    assert_eq!((coords.longitude(), coords.latitude()), (-122.4, 37.7));

    let failed: Vec<&str> = collection.errors().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(failed, vec!["one", "three"]);
}

#[test]
fn test_id_coerced_from_key() {
    let parsed = FrontmatterParser::new().parse_keyed(
        "---\ntitle: Maria\n---\n",
        "maria",
        ParseOptions { coerce_id: true },
    );
    let story = StorySchema::story().validate(&parsed.metadata).unwrap();
    assert_eq!(story.id, "maria");

    let dir = StoryDir::new().story("maria.mdx", "title: Maria", "");
    let collection = build_collection(dir.store(), true).unwrap();
    assert_eq!(collection.stories()[0].id, "maria");
}

#[test]
fn test_explicit_id_wins_over_key() {
    let dir = StoryDir::new().story("2023-maria.mdx", "id: maria\ntitle: Maria", "");
    let collection = build_collection(dir.store(), true).unwrap();
    assert!(collection.find("maria").is_some());
    assert_eq!(collection.source_key("maria"), Some("2023-maria.mdx"));
}

#[test]
fn test_documents_without_metadata_block() {
    let dir = StoryDir::new()
        .raw("plain.mdx", "Just a body, no metadata.\n")
        .raw("unclosed.mdx", "---\ntitle: Never closed\n")
        .raw("notes.txt", "---\ntitle: Not a story\n---\n");
    let collection = build_collection(dir.store(), false).unwrap();

    assert!(collection.is_empty());
    let failed: Vec<&str> = collection.errors().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(failed, vec!["plain", "unclosed"]);
}

#[test]
fn test_missing_directory_is_empty() {
    let dir = StoryDir::new();
    let store = storymap_stories::FsContentStore::new(dir.path().join("nope"));
    let collection = CollectionBuilder::new(store)
        .with_options(BuildOptions::strict())
        .build()
        .unwrap();
    assert!(collection.is_empty());
}
