//! Error types for storymap-core

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::validation::ValidationError;

/// Result type alias for Storymap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Storymap crates.
///
/// Per-document schema failures are *not* errors; they are reported as
/// [`ValidationError`] values. Only strict mode escalates them into
/// [`Error::StrictValidation`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Filesystem error, with the path that caused it.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration problem (missing file, bad key, unparsable TOML).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Structured-data decoding error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested story or document does not exist.
    #[error("Story not found: {id}")]
    NotFound {
        /// Id or storage key that was looked up
        id: String,
    },

    /// Strict mode rejected the batch because documents failed validation.
    #[error("{}", strict_summary(.failures))]
    StrictValidation {
        /// Every failed document, ordered by id
        failures: Vec<ValidationError>,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse(message.into())
    }

    /// Wraps an I/O error with the path it occurred on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a not-found error.
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Error::NotFound { id: id.into() }
    }

    /// Failed documents carried by a strict-mode error, if any.
    pub fn failures(&self) -> &[ValidationError] {
        match self {
            Error::StrictValidation { failures } => failures,
            _ => &[],
        }
    }
}

fn strict_summary(failures: &[ValidationError]) -> String {
    let mut out = format!(
        "Story validation failed for {} document{}:",
        failures.len(),
        if failures.len() == 1 { "" } else { "s" }
    );
    for failure in failures {
        out.push_str("\n  - ");
        out.push_str(&failure.id);
        if let Some(key) = &failure.key {
            out.push_str(&format!(" ({key})"));
        }
        for issue in &failure.issues {
            out.push_str(&format!("\n      {issue}"));
        }
    }
    out
}
