//! Path utilities.

use std::path::PathBuf;

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or platforms without a home directory,
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use storymap_core::util::paths::expand_tilde;
///
/// assert_eq!(expand_tilde("/etc/storymap.toml"), PathBuf::from("/etc/storymap.toml"));
/// ```
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
