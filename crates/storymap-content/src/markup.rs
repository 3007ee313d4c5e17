//! Helpers for the markup body of a story.
//!
//! Story bodies mix Markdown with JSX-style components (`<Figure>`,
//! `<ImageGrid>`, raw `<img>`). These helpers find the images a body
//! references and prepare legacy HTML comments for MDX rendering.
//!
//! # Example
//!
//! ```rust
//! use storymap_content::markup::image_references;
//!
//! let body = "![Porch](/stories/maria/porch.jpg)\n\n<Figure src=\"/stories/maria/garden.jpg\" />";
//! assert_eq!(
//!     image_references(body),
//!     vec!["/stories/maria/porch.jpg", "/stories/maria/garden.jpg"]
//! );
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;

/// `<Figure ... src="x">`, `<img ... src={'x'}>` and friends.
static JSX_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(?:Figure|img)\b[^>]*?\bsrc=(?:\{\s*)?["']([^"']+)["']"#)
        .expect("Invalid JSX image regex")
});

static HTML_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--(.*?)-->").expect("Invalid HTML comment regex"));

/// Image destinations written with Markdown syntax (`![alt](src)`).
pub fn markdown_image_sources(content: &str) -> Vec<String> {
    Parser::new(content)
        .filter_map(|event| match event {
            Event::Start(Tag::Image { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })
        .filter(|src| !src.is_empty())
        .collect()
}

/// Image sources of `<Figure>` and `<img>` tags, with either a quoted
/// attribute or a quoted expression (`src={"..."}`).
pub fn jsx_image_sources(content: &str) -> Vec<String> {
    JSX_IMAGE_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Every image referenced by the body, Markdown first, without duplicates.
pub fn image_references(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    markdown_image_sources(content)
        .into_iter()
        .chain(jsx_image_sources(content))
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

/// Rewrite `<!-- note -->` comments into MDX comments (`{/*note*/}`).
///
/// MDX rejects HTML comments, and older stories still carry them.
pub fn sanitize_html_comments(content: &str) -> String {
    HTML_COMMENT_RE
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let inner = caps.get(1).map_or("", |m| m.as_str().trim());
            // A bare `*/` would end the MDX comment early.
            format!("{{/*{}*/}}", inner.replace("*/", "* /"))
        })
        .into_owned()
}
