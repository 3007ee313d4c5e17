//! Caller-owned cache of loaded stories.
//!
//! A [`StoryCache`] is created by whoever serves stories (usually once per
//! process) and handed to [`find_story`](crate::lookup::find_story). Entries
//! live until the cache is dropped, [`cleared`](StoryCache::clear), or an
//! id is [`invalidated`](StoryCache::invalidate). There is no global
//! instance.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::lookup::StoryDetail;

/// Thread-safe map from story id to a loaded [`StoryDetail`].
#[derive(Debug, Default)]
pub struct StoryCache {
    entries: RwLock<HashMap<String, Arc<StoryDetail>>>,
}

impl StoryCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached story for `id`, if loaded.
    pub fn get(&self, id: &str) -> Option<Arc<StoryDetail>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let hit = entries.get(id).cloned();
        log::debug!(
            "Story cache {} for '{id}'",
            if hit.is_some() { "hit" } else { "miss" }
        );
        hit
    }

    /// Store a loaded story, replacing any previous entry for its id.
    pub fn insert(&self, detail: StoryDetail) -> Arc<StoryDetail> {
        let detail = Arc::new(detail);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(detail.metadata.id.clone(), Arc::clone(&detail));
        detail
    }

    /// Drop one entry. Returns true if it was present.
    pub fn invalidate(&self, id: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached stories.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
