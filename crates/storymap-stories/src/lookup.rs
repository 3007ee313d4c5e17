//! Single-story lookup.

use serde::Serialize;
use storymap_content::{
    FrontmatterParser, MetadataDecoder, ParseOptions, YamlDecoder, sanitize_html_comments,
};
use storymap_core::Result;

use crate::cache::StoryCache;
use crate::collection::{BuildOptions, CollectionBuilder};
use crate::schema::StoryMetadata;
use crate::store::ContentStore;

/// A story's validated metadata plus the body that follows its metadata
/// block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryDetail {
    /// Validated, date-normalized metadata.
    pub metadata: StoryMetadata,
    /// Body with HTML comments rewritten as MDX comments.
    pub content: String,
}

/// Load one valid story by id.
///
/// Returns `Ok(None)` when no valid story has that id; documents that
/// failed validation are never returned. The lookup is always lenient,
/// regardless of `options.strict`, so one broken document cannot hide the
/// others. When a cache is given it is consulted first and filled on a
/// miss.
pub fn find_story<S: ContentStore>(
    store: S,
    id: &str,
    options: BuildOptions,
    cache: Option<&StoryCache>,
) -> Result<Option<StoryDetail>> {
    find_story_with(store, YamlDecoder, id, options, cache)
}

/// [`find_story`] for stores whose metadata blocks use another format.
pub fn find_story_with<S: ContentStore, D: MetadataDecoder + Clone>(
    store: S,
    decoder: D,
    id: &str,
    options: BuildOptions,
    cache: Option<&StoryCache>,
) -> Result<Option<StoryDetail>> {
    if let Some(hit) = cache.and_then(|c| c.get(id)) {
        return Ok(Some((*hit).clone()));
    }

    let builder = CollectionBuilder::new(&store)
        .with_decoder(decoder.clone())
        .with_options(BuildOptions {
            strict: false,
            ..options
        });
    let collection = builder.build()?;

    let (Some(metadata), Some(key)) = (collection.find(id), collection.source_key(id)) else {
        log::debug!("No valid story with id '{id}'");
        return Ok(None);
    };

    let raw = store.read(key)?;
    let doc = FrontmatterParser::with_decoder(decoder).parse_keyed(
        &raw,
        key,
        ParseOptions {
            coerce_id: options.coerce_id,
        },
    );
    let detail = StoryDetail {
        metadata: metadata.clone(),
        content: sanitize_html_comments(&doc.content),
    };

    if let Some(cache) = cache {
        cache.insert(detail.clone());
    }
    Ok(Some(detail))
}
