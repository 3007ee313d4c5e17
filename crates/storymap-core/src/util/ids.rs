//! Story ID utilities.
//!
//! Story documents are addressed by a storage key (usually a file name such
//! as `maria.mdx`). When a document's metadata does not declare an `id`, the
//! id is the key's base name with its extension removed.

/// Derive a story id from a storage key.
///
/// Takes the last path segment (either `/` or `\` separated) and strips the
/// final extension. Dot-files keep their leading dot. Returns `None` when
/// nothing is left.
///
/// # Examples
///
/// ```
/// use storymap_core::util::ids::id_from_key;
///
/// assert_eq!(id_from_key("maria.mdx"), Some("maria".to_string()));
/// assert_eq!(id_from_key("stories/ana-lucia.md"), Some("ana-lucia".to_string()));
/// assert_eq!(id_from_key("maria"), Some("maria".to_string()));
/// assert_eq!(id_from_key("stories/"), None);
/// ```
pub fn id_from_key(key: &str) -> Option<String> {
    let base = key.rsplit(['/', '\\']).next().unwrap_or(key).trim();
    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => base,
    };

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
