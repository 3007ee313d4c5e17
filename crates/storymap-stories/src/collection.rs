//! Collection building: parse, validate, normalize, sort.
//!
//! [`CollectionBuilder`] drives the whole pipeline over a [`ContentStore`]:
//!
//! 1. List document keys (sorted, so directory order never matters)
//! 2. Parse each document's metadata block, deriving missing ids
//! 3. Validate against the [`StorySchema`]
//! 4. Normalize the `date` field
//! 5. Reject duplicate ids
//! 6. Sort the valid records
//!
//! A document that fails validation, or cannot be decoded as UTF-8, becomes a [`ValidationError`] record
//! and never stops the batch. In strict mode, any such record turns the
//! whole build into [`Error::StrictValidation`].
//!
//! # Ordering
//!
//! Published stories come before drafts. Within a status group, stories
//! that both have a date are newest first; dated stories precede dateless
//! ones; everything else is alphabetical by title, then name, then id.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::ErrorKind;

use serde::Serialize;
use storymap_content::{FrontmatterParser, MetadataDecoder, ParseOptions, YamlDecoder};
use storymap_core::{Error, FieldIssue, Result, ValidationError, id_from_key};

use crate::schema::{StoryMetadata, StorySchema};
use crate::store::ContentStore;

/// Options for a collection build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fail the whole build if any document is invalid.
    pub strict: bool,
    /// Derive missing ids from storage keys.
    pub coerce_id: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict: false,
            coerce_id: true,
        }
    }
}

impl BuildOptions {
    /// Non-strict options (the default).
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Strict options for release builds.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }
}

/// The ordered result of a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    stories: Vec<StoryMetadata>,
    errors: Vec<ValidationError>,
    #[serde(skip)]
    sources: BTreeMap<String, String>,
}

impl Collection {
    /// Valid stories in display order.
    pub fn stories(&self) -> &[StoryMetadata] {
        &self.stories
    }

    /// Documents that failed validation, ordered by id then key.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consume the collection, returning stories and errors.
    pub fn into_parts(self) -> (Vec<StoryMetadata>, Vec<ValidationError>) {
        (self.stories, self.errors)
    }

    /// Number of valid stories.
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// True when there are no valid stories.
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// True when every document validated.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Look up a valid story by id.
    pub fn find(&self, id: &str) -> Option<&StoryMetadata> {
        self.stories.iter().find(|s| s.id == id)
    }

    /// Storage key a valid story was read from.
    pub fn source_key(&self, id: &str) -> Option<&str> {
        self.sources.get(id).map(String::as_str)
    }

    /// Published stories, in order.
    pub fn published(&self) -> impl Iterator<Item = &StoryMetadata> {
        self.stories.iter().filter(|s| !s.is_draft())
    }

    /// Stories that can be placed on the map.
    pub fn mapped(&self) -> impl Iterator<Item = &StoryMetadata> {
        self.stories.iter().filter(|s| s.coordinates.is_some())
    }

    /// Fail with [`Error::StrictValidation`] if any document is invalid.
    pub fn into_strict(self) -> Result<Self> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::StrictValidation {
                failures: self.errors,
            })
        }
    }
}

/// Builds a [`Collection`] from a [`ContentStore`].
pub struct CollectionBuilder<S, D = YamlDecoder> {
    store: S,
    parser: FrontmatterParser<D>,
    schema: StorySchema,
    options: BuildOptions,
}

impl<S: ContentStore> CollectionBuilder<S, YamlDecoder> {
    /// Builder over `store` with YAML metadata and default options.
    pub fn new(store: S) -> Self {
        Self {
            store,
            parser: FrontmatterParser::new(),
            schema: StorySchema::story(),
            options: BuildOptions::default(),
        }
    }
}

impl<S: ContentStore, D: MetadataDecoder> CollectionBuilder<S, D> {
    /// Swap the metadata decoder.
    pub fn with_decoder<D2: MetadataDecoder>(self, decoder: D2) -> CollectionBuilder<S, D2> {
        CollectionBuilder {
            store: self.store,
            parser: FrontmatterParser::with_decoder(decoder),
            schema: self.schema,
            options: self.options,
        }
    }

    /// Replace all build options.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Toggle strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Toggle id coercion from storage keys.
    pub fn coerce_id(mut self, coerce: bool) -> Self {
        self.options.coerce_id = coerce;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the pipeline.
    pub fn build(&self) -> Result<Collection> {
        let mut keys = self.store.list()?;
        keys.sort();
        keys.dedup();

        let parse_options = ParseOptions {
            coerce_id: self.options.coerce_id,
        };

        let mut stories = Vec::new();
        let mut errors = Vec::new();
        let mut sources: BTreeMap<String, String> = BTreeMap::new();

        for key in &keys {
            let raw = match self.store.read(key) {
                Ok(raw) => raw,
                Err(Error::Io { source, .. }) if source.kind() == ErrorKind::InvalidData => {
                    log::warn!("Story {key} is not valid UTF-8, skipping");
                    errors.push(
                        ValidationError::new(
                            error_id("", key),
                            vec![FieldIssue::new("document", "not valid UTF-8")],
                        )
                        .with_key(key.clone()),
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };
            let doc = self.parser.parse_keyed(&raw, key, parse_options);

            match self.schema.validate(&doc.metadata) {
                Ok(mut story) => {
                    // Without id coercion, many records may share the empty id.
                    let duplicate_of = if story.id.is_empty() {
                        None
                    } else {
                        sources.get(&story.id)
                    };
                    if let Some(first_key) = duplicate_of {
                        log::warn!("Duplicate story id '{}' in {key} (first defined in {first_key})", story.id);
                        errors.push(
                            ValidationError::new(
                                error_id(&story.id, key),
                                vec![FieldIssue::new(
                                    "id",
                                    format!("Duplicate id, already defined by {first_key}"),
                                )],
                            )
                            .with_key(key.clone()),
                        );
                        continue;
                    }
                    story.normalize_date();
                    sources.entry(story.id.clone()).or_insert_with(|| key.clone());
                    stories.push(story);
                }
                Err(mut failure) => {
                    failure.id = error_id(&failure.id, key);
                    log::debug!("Story {key} failed validation: {failure}");
                    errors.push(failure.with_key(key.clone()));
                }
            }
        }

        sort_stories(&mut stories);
        errors.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.key.cmp(&b.key)));

        log::info!(
            "Built story collection: {} valid, {} invalid",
            stories.len(),
            errors.len()
        );

        let collection = Collection {
            stories,
            errors,
            sources,
        };
        if self.options.strict {
            collection.into_strict()
        } else {
            Ok(collection)
        }
    }
}

/// Id for an error record: the document's own id, else one derived from
/// its key.
fn error_id(id: &str, key: &str) -> String {
    if id.is_empty() {
        id_from_key(key).unwrap_or_else(|| key.to_string())
    } else {
        id.to_string()
    }
}

/// Build a collection with default (YAML, lenient unless `strict`) settings.
pub fn build_collection<S: ContentStore>(store: S, strict: bool) -> Result<Collection> {
    CollectionBuilder::new(store).strict(strict).build()
}

/// Sort stories into display order. Stable and deterministic.
pub fn sort_stories(stories: &mut [StoryMetadata]) {
    stories.sort_by(compare_stories);
}

/// Display-order comparator.
pub fn compare_stories(a: &StoryMetadata, b: &StoryMetadata) -> Ordering {
    a.status
        .cmp(&b.status)
        .then_with(|| match (&a.date, &b.date) {
            (Some(da), Some(db)) => db.cmp(da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| compare_labels(a.sort_label(), b.sort_label()))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
