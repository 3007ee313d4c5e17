//! Story metadata schema.
//!
//! The schema is a declarative list of [`FieldSpec`]s, one per known
//! metadata key, each pairing a field name with a check function. Validation
//! runs every check and collects every issue so an author sees all problems
//! in one pass. Unknown keys are ignored; explicit nulls count as absent.
//!
//! | field         | type                         | required |
//! |---------------|------------------------------|----------|
//! | `id`          | string                       | no*      |
//! | `title`       | string                       | yes      |
//! | `name`        | string                       | no       |
//! | `location`    | string                       | no       |
//! | `coordinates` | `[longitude, latitude]`      | no       |
//! | `date`        | string                       | no       |
//! | `tags`        | array of strings             | no       |
//! | `hero`        | string                       | no       |
//! | `heroAlt`     | string                       | no       |
//! | `status`      | `"published"` \| `"draft"`   | no       |
//! | `excerpt`     | string                       | no       |
//!
//! \* The collection builder derives `id` from the storage key before
//! validation, so records it produces always carry one.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storymap_content::{Metadata, value_kind};
use storymap_core::{FieldIssue, ValidationError};

use crate::dates::normalize_date_field;

/// Publication status of a story.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// Visible in the public listing.
    #[default]
    Published,
    /// Work in progress; listed after every published story.
    Draft,
}

impl StoryStatus {
    /// Accepted spellings, in declaration order.
    pub const VALUES: [&'static str; 2] = ["published", "draft"];

    /// Parse the metadata spelling of a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "published" => Some(StoryStatus::Published),
            "draft" => Some(StoryStatus::Draft),
            _ => None,
        }
    }

    /// Metadata spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryStatus::Published => "published",
            StoryStatus::Draft => "draft",
        }
    }
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map position as `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    /// East-west position in degrees.
    pub fn longitude(&self) -> f64 {
        self.0
    }

    /// North-south position in degrees.
    pub fn latitude(&self) -> f64 {
        self.1
    }

    /// True when both components are within WGS84 bounds.
    pub fn in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.0) && (-90.0..=90.0).contains(&self.1)
    }
}

/// A validated story record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryMetadata {
    /// Unique story key.
    pub id: String,
    /// Story title.
    pub title: String,
    /// Display name of the person the story is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text place description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Map pin position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Canonical `YYYY-MM-DD` date once normalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Raw author input when normalization altered or discarded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Path or URL of the representative image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
    /// Alt text for `hero`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_alt: Option<String>,
    #[serde(default)]
    pub status: StoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl StoryMetadata {
    /// A published story with only an id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            name: None,
            location: None,
            coordinates: None,
            date: None,
            date_original: None,
            tags: None,
            hero: None,
            hero_alt: None,
            status: StoryStatus::Published,
            excerpt: None,
        }
    }

    /// True for draft stories.
    pub fn is_draft(&self) -> bool {
        self.status == StoryStatus::Draft
    }

    /// Label used for alphabetical ordering: title, then name, then id.
    pub fn sort_label(&self) -> &str {
        [Some(self.title.as_str()), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.id)
    }

    /// Replace the raw `date` with its canonical form.
    ///
    /// The raw value moves to `date_original` when it was altered or
    /// discarded. Calling this twice is harmless.
    pub fn normalize_date(&mut self) {
        let Some(raw) = self.date.take() else {
            return;
        };
        let normalized = normalize_date_field(&raw);
        self.date = normalized.date;
        if normalized.original.is_some() {
            self.date_original = normalized.original;
        }
    }
}

/// Checks one present, non-null field value. Receives the field name so
/// element issues can be reported as `field[i]`.
pub type FieldCheck = fn(&str, &Value) -> Vec<FieldIssue>;

/// One schema entry.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    /// Metadata key.
    pub name: &'static str,
    /// Whether absence (or null) is a violation.
    pub required: bool,
    /// Shape/type check for present values.
    pub check: FieldCheck,
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl FieldSpec {
    const fn optional(name: &'static str, check: FieldCheck) -> Self {
        Self {
            name,
            required: false,
            check,
        }
    }

    const fn required(name: &'static str, check: FieldCheck) -> Self {
        Self {
            name,
            required: true,
            check,
        }
    }
}

/// Declarative schema for story metadata.
#[derive(Debug, Clone)]
pub struct StorySchema {
    fields: Vec<FieldSpec>,
}

impl Default for StorySchema {
    fn default() -> Self {
        Self::story()
    }
}

impl StorySchema {
    /// The story metadata schema.
    pub fn story() -> Self {
        Self {
            fields: vec![
                FieldSpec::optional("id", expect_string),
                FieldSpec::required("title", expect_string),
                FieldSpec::optional("name", expect_string),
                FieldSpec::optional("location", expect_string),
                FieldSpec::optional("coordinates", expect_coordinates),
                FieldSpec::optional("date", expect_string),
                FieldSpec::optional("tags", expect_string_list),
                FieldSpec::optional("hero", expect_string),
                FieldSpec::optional("heroAlt", expect_string),
                FieldSpec::optional("status", expect_status),
                FieldSpec::optional("excerpt", expect_string),
            ],
        }
    }

    /// Schema entries in evaluation order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Run every field check, returning all issues found.
    pub fn check(&self, metadata: &Metadata) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        for spec in &self.fields {
            match metadata.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        issues.push(FieldIssue::new(spec.name, "Required"));
                    }
                }
                Some(value) => issues.extend((spec.check)(spec.name, value)),
            }
        }
        issues
    }

    /// Validate `metadata` and build the typed record.
    ///
    /// `status` defaults to `published`. The `date` field is copied
    /// verbatim; see [`StoryMetadata::normalize_date`].
    pub fn validate(&self, metadata: &Metadata) -> Result<StoryMetadata, ValidationError> {
        let issues = self.check(metadata);
        let id = string_field(metadata, "id").unwrap_or_default();
        if !issues.is_empty() {
            return Err(ValidationError::new(id, issues));
        }

        Ok(StoryMetadata {
            id,
            title: string_field(metadata, "title").unwrap_or_default(),
            name: string_field(metadata, "name"),
            location: string_field(metadata, "location"),
            coordinates: coordinates_field(metadata),
            date: string_field(metadata, "date"),
            date_original: None,
            tags: string_list_field(metadata, "tags"),
            hero: string_field(metadata, "hero"),
            hero_alt: string_field(metadata, "heroAlt"),
            status: string_field(metadata, "status")
                .and_then(|s| StoryStatus::parse(&s))
                .unwrap_or_default(),
            excerpt: string_field(metadata, "excerpt"),
        })
    }
}

// ============================================================================
// Field checks
// ============================================================================

fn expected(field: &str, what: &str, value: &Value) -> FieldIssue {
    FieldIssue::new(
        field,
        format!("Expected {what}, received {}", value_kind(value)),
    )
}

fn expect_string(field: &str, value: &Value) -> Vec<FieldIssue> {
    if value.is_string() {
        Vec::new()
    } else {
        vec![expected(field, "string", value)]
    }
}

fn expect_string_list(field: &str, value: &Value) -> Vec<FieldIssue> {
    let Some(items) = value.as_array() else {
        return vec![expected(field, "array", value)];
    };
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_string())
        .map(|(i, item)| expected(&format!("{field}[{i}]"), "string", item))
        .collect()
}

fn expect_coordinates(field: &str, value: &Value) -> Vec<FieldIssue> {
    let Some(items) = value.as_array() else {
        return vec![expected(field, "array [longitude, latitude]", value)];
    };
    if items.len() != 2 {
        return vec![FieldIssue::new(
            field,
            format!(
                "Expected exactly 2 items [longitude, latitude], received {}",
                items.len()
            ),
        )];
    }
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_number())
        .map(|(i, item)| expected(&format!("{field}[{i}]"), "number", item))
        .collect()
}

fn expect_status(field: &str, value: &Value) -> Vec<FieldIssue> {
    let allowed = StoryStatus::VALUES
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(" | ");
    match value.as_str() {
        Some(s) if StoryStatus::parse(s).is_some() => Vec::new(),
        Some(s) => vec![FieldIssue::new(
            field,
            format!("Invalid enum value. Expected {allowed}, received '{s}'"),
        )],
        None => vec![expected(field, &allowed, value)],
    }
}

// ============================================================================
// Field extraction (after validation)
// ============================================================================

fn string_field(metadata: &Metadata, key: &str) -> Option<String> {
    metadata.get(key)?.as_str().map(String::from)
}

fn string_list_field(metadata: &Metadata, key: &str) -> Option<Vec<String>> {
    let items = metadata.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(String::from))
            .collect(),
    )
}

fn coordinates_field(metadata: &Metadata) -> Option<Coordinates> {
    match metadata.get("coordinates")?.as_array()?.as_slice() {
        [lon, lat] => Some(Coordinates(lon.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}
