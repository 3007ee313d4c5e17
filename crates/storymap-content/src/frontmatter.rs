//! Frontmatter extraction from story documents.
//!
//! A story document may begin with a metadata block delimited by `---`
//! lines:
//!
//! ```markdown
//! ---
//! title: Maria's Story
//! location: Oakland, CA
//! coordinates: [-122.27, 37.80]
//! tags:
//!   - stroke
//! ---
//!
//! Maria was a teacher for thirty years...
//! ```
//!
//! The block is only recognized when the opening delimiter is the very first
//! line of the document. Malformed metadata never fails the parse: it
//! degrades to an empty map and a warning is logged, leaving the schema
//! validator to report the missing fields.
//!
//! # Usage
//!
//! ```rust
//! use storymap_content::frontmatter::{parse_document, FrontmatterParser, ParseOptions};
//!
//! let doc = parse_document("---\ntitle: Maria\n---\n\nBody");
//! assert_eq!(doc.get_str("title"), Some("Maria"));
//! assert_eq!(doc.content, "Body");
//!
//! let parser = FrontmatterParser::new();
//! let doc = parser.parse_keyed("---\ntitle: Maria\n---\nBody", "maria.mdx", ParseOptions::default());
//! assert_eq!(doc.get_str("id"), Some("maria"));
//! ```

use serde_json::Value;
use storymap_core::id_from_key;

use crate::decoder::{Metadata, MetadataDecoder, YamlDecoder};

/// Line that opens and closes a metadata block.
pub const DELIMITER: &str = "---";

/// Result of splitting a document into metadata and content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Decoded metadata; empty when there was no block or it was malformed.
    pub metadata: Metadata,
    /// Content remainder after the block, leading blank lines removed.
    pub content: String,
    had_delimiters: bool,
}

impl ParsedDocument {
    /// Check if a delimited block was found (even if decoding failed).
    pub fn had_delimiters(&self) -> bool {
        self.had_delimiters
    }

    /// Check if the metadata map has any entries.
    pub fn has_metadata(&self) -> bool {
        !self.metadata.is_empty()
    }

    /// Get a string field from the metadata.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)?.as_str()
    }

    /// Take ownership of the metadata and content.
    pub fn into_parts(self) -> (Metadata, String) {
        (self.metadata, self.content)
    }
}

/// Options applied after the metadata block has been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Derive `id` from the storage key when the metadata lacks one.
    pub coerce_id: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { coerce_id: true }
    }
}

/// Splits documents and decodes their metadata block with `D`.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterParser<D = YamlDecoder> {
    decoder: D,
}

impl FrontmatterParser<YamlDecoder> {
    /// Parser using the YAML decoder.
    pub fn new() -> Self {
        Self {
            decoder: YamlDecoder,
        }
    }
}

impl<D: MetadataDecoder> FrontmatterParser<D> {
    /// Parser using a custom decoder.
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    /// Split `raw` into metadata and content.
    pub fn parse(&self, raw: &str) -> ParsedDocument {
        let Some((block, rest)) = split_frontmatter(raw) else {
            return ParsedDocument {
                metadata: Metadata::new(),
                content: raw.to_string(),
                had_delimiters: false,
            };
        };

        let metadata = match self.decoder.decode(block) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Ignoring malformed {} metadata block: {e}", self.decoder.name());
                Metadata::new()
            }
        };

        ParsedDocument {
            metadata,
            content: trim_leading_blank_lines(rest).to_string(),
            had_delimiters: true,
        }
    }

    /// Parse a document read from storage `key`, applying `options`.
    pub fn parse_keyed(&self, raw: &str, key: &str, options: ParseOptions) -> ParsedDocument {
        let mut doc = self.parse(raw);
        if options.coerce_id && !has_id(&doc.metadata) {
            if let Some(id) = id_from_key(key) {
                log::debug!("Derived id '{id}' from storage key '{key}'");
                doc.metadata.insert("id".to_string(), Value::String(id));
            }
        }
        doc
    }
}

/// Parse a document with the default YAML decoder.
pub fn parse_document(raw: &str) -> ParsedDocument {
    FrontmatterParser::new().parse(raw)
}

/// Locate the metadata block, returning `(block_text, text_after_block)`.
///
/// Returns `None` when the document does not open with a delimiter line or
/// the block is never closed.
pub fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let first_end = raw.find('\n')?;
    if raw[..first_end].trim_end() != DELIMITER {
        return None;
    }

    let block_start = first_end + 1;
    let mut pos = block_start;
    while pos <= raw.len() {
        let line_end = raw[pos..].find('\n').map_or(raw.len(), |i| pos + i);
        if raw[pos..line_end].trim_end() == DELIMITER {
            let body_start = (line_end + 1).min(raw.len());
            return Some((&raw[block_start..pos], &raw[body_start..]));
        }
        if line_end == raw.len() {
            break;
        }
        pos = line_end + 1;
    }

    log::warn!("Metadata opening delimiter found but no closing delimiter");
    None
}

fn has_id(metadata: &Metadata) -> bool {
    match metadata.get("id") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

fn trim_leading_blank_lines(text: &str) -> &str {
    let mut rest = text;
    loop {
        match rest.find('\n') {
            Some(i) if rest[..i].trim().is_empty() => rest = &rest[i + 1..],
            None if rest.trim().is_empty() => return "",
            _ => return rest,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
