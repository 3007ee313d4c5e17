//! Pluggable structured-data decoders for metadata blocks.
//!
//! The frontmatter parser does not care which format the block is written
//! in; it hands the raw text to a [`MetadataDecoder`] and gets back a
//! string-keyed [`Metadata`] map. [`YamlDecoder`] is the default.
//!
//! ```rust
//! use storymap_content::decoder::{MetadataDecoder, YamlDecoder};
//!
//! let meta = YamlDecoder.decode("title: Maria\ncoordinates: [-122.4, 37.7]").unwrap();
//! assert_eq!(meta["title"], "Maria");
//! assert_eq!(meta["coordinates"][0], -122.4);
//! ```

use serde_json::Value;
use storymap_core::{Error, Result};

/// Decoded metadata: string keys mapped to generic structured values.
pub type Metadata = serde_json::Map<String, Value>;

/// Decodes the text of a metadata block into a [`Metadata`] map.
///
/// Implementations must treat an empty (or null) block as an empty map and
/// reject blocks whose top level is not a mapping.
pub trait MetadataDecoder: Send + Sync {
    /// Short format name used in log messages.
    fn name(&self) -> &'static str;

    /// Decode `text` into a metadata map.
    fn decode(&self, text: &str) -> Result<Metadata>;
}

/// YAML metadata blocks (the `---` frontmatter convention).
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl MetadataDecoder for YamlDecoder {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, text: &str) -> Result<Metadata> {
        if text.trim().is_empty() {
            return Ok(Metadata::new());
        }
        let value: Value = yaml_serde::from_str(text)
            .map_err(|e| Error::parse(format!("Failed to parse YAML metadata: {e}")))?;
        into_mapping(value)
    }
}

/// JSON metadata blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl MetadataDecoder for JsonDecoder {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, text: &str) -> Result<Metadata> {
        if text.trim().is_empty() {
            return Ok(Metadata::new());
        }
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::parse(format!("Failed to parse JSON metadata: {e}")))?;
        into_mapping(value)
    }
}

fn into_mapping(value: Value) -> Result<Metadata> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Metadata::new()),
        other => Err(Error::parse(format!(
            "Metadata block must be a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// Name of a value's type, as used in validation messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
