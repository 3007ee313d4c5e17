//! Story schema, date normalization, and collection building.
//!
//! This crate turns a directory (or any [`ContentStore`]) of story
//! documents into an ordered, validated [`Collection`]:
//!
//! ```text
//! ContentStore ──► FrontmatterParser ──► StorySchema ──► dates ──► sort
//!                   (storymap-content)    (validate)    (normalize)
//! ```
//!
//! Invalid documents become [`ValidationError`](storymap_core::ValidationError)
//! records next to the valid ones. Strict builds turn any such record into
//! one aggregate [`Error::StrictValidation`](storymap_core::Error).
//!
//! # Modules
//!
//! - [`schema`]: Field rules and the typed [`StoryMetadata`] record
//! - [`dates`]: Free-form date → `YYYY-MM-DD`
//! - [`collection`]: Build, order, and strict-gate a collection
//! - [`store`]: Where documents come from
//! - [`lookup`] / [`cache`]: Single-story retrieval with a caller-owned cache
//! - [`lint`]: Rule checks for authoring tools
//!
//! # Example
//!
//! ```rust
//! use storymap_stories::{CollectionBuilder, MemoryContentStore};
//!
//! let store = MemoryContentStore::new()
//!     .with_document("ana.mdx", "---\ntitle: Ana\ndate: 1/2/2024\n---\nBody")
//!     .with_document("ben.mdx", "---\ntitle: Ben\nstatus: draft\n---\nBody");
//!
//! let collection = CollectionBuilder::new(&store).build().unwrap();
//! let ids: Vec<_> = collection.stories().iter().map(|s| s.id.as_str()).collect();
//! assert_eq!(ids, ["ana", "ben"]);
//! assert_eq!(collection.stories()[0].date.as_deref(), Some("2024-01-02"));
//! ```

pub mod cache;
pub mod collection;
pub mod dates;
pub mod lint;
pub mod lookup;
pub mod schema;
pub mod store;

// Re-export commonly used types
pub use cache::StoryCache;
pub use collection::{
    BuildOptions, Collection, CollectionBuilder, build_collection, compare_stories, sort_stories,
};
pub use dates::{DateOutcome, NormalizedDate, classify_date, normalize_date_field, normalize_date_string};
pub use lint::{
    AssetRoots, Finding, FindingKind, LintReport, Severity, lint_collection, lint_collection_with,
    lint_store, lint_store_with, missing_hero_alt,
};
pub use lookup::{StoryDetail, find_story, find_story_with};
pub use schema::{Coordinates, StoryMetadata, StorySchema, StoryStatus};
pub use store::{ContentStore, FsContentStore, MemoryContentStore};
