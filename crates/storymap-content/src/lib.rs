//! Frontmatter parsing, metadata decoding, and markup helpers.
//!
//! This crate knows how a story document is laid out on disk but nothing
//! about what a valid story looks like; schema rules live in
//! `storymap-stories`.
//!
//! # Modules
//!
//! - [`frontmatter`]: Metadata block detection and id coercion
//! - [`decoder`]: Pluggable structured-data decoders (YAML, JSON)
//! - [`markup`]: Image reference extraction and comment sanitizing
//!
//! # Example
//!
//! ```rust
//! use storymap_content::{parse_document, Metadata};
//!
//! let doc = parse_document("---\ntitle: Hello\n---\n\nBody");
//! let meta: &Metadata = &doc.metadata;
//! assert_eq!(meta["title"], "Hello");
//! assert_eq!(doc.content, "Body");
//! ```

pub mod decoder;
pub mod frontmatter;
pub mod markup;

// Re-export commonly used types
pub use decoder::{JsonDecoder, Metadata, MetadataDecoder, YamlDecoder, value_kind};
pub use frontmatter::{FrontmatterParser, ParseOptions, ParsedDocument, parse_document};
pub use markup::{image_references, sanitize_html_comments};
