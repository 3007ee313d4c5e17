//! Per-document validation reports.
//!
//! A [`ValidationError`] ties a story id (and the storage key it was read
//! from) to every field-level problem found in that document. It is a value,
//! not a failure: the collection builder keeps going after producing one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Field path, e.g. `title` or `tags[2]`.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldIssue {
    /// Create an issue for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All validation failures of one story document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Story id (declared or derived from the storage key).
    pub id: String,
    /// Storage key of the document, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Every violated field, in schema order.
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Create a report for `id` with the given issues.
    pub fn new(id: impl Into<String>, issues: Vec<FieldIssue>) -> Self {
        Self {
            id: id.into(),
            key: None,
            issues,
        }
    }

    /// Attach the storage key the document was read from.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Issue messages formatted as `field: message`.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(key) = &self.key {
            write!(f, " ({key})")?;
        }
        write!(f, ": {}", self.messages().join("; "))
    }
}
