//! Single-story lookup through the filesystem store.

use storymap_stories::{BuildOptions, StoryCache, find_story};

use crate::common::one_broken;

#[test]
fn test_find_story_from_disk() {
    let dir = one_broken();
    let cache = StoryCache::new();

    let story = find_story(dir.store(), "cy", BuildOptions::default(), Some(&cache))
        .unwrap()
        .expect("cy should be found");
    assert_eq!(story.metadata.title, "Cy");
    assert_eq!(story.content, "Cy's story.");
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_invalid_document_is_never_returned() {
    let dir = one_broken();
    let found = find_story(dir.store(), "ben", BuildOptions::strict(), None).unwrap();
    assert!(found.is_none());
}

#[test]
fn test_cache_survives_file_removal_until_cleared() {
    let dir = one_broken();
    let cache = StoryCache::new();
    find_story(dir.store(), "ana", BuildOptions::default(), Some(&cache)).unwrap();

    std::fs::remove_file(dir.path().join("ana.mdx")).unwrap();
    assert!(
        find_story(dir.store(), "ana", BuildOptions::default(), Some(&cache))
            .unwrap()
            .is_some()
    );

    cache.clear();
    assert!(
        find_story(dir.store(), "ana", BuildOptions::default(), Some(&cache))
            .unwrap()
            .is_none()
    );
}
