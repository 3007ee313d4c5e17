//! Storymap configuration.
//!
//! ```toml
//! [content]
//! dir = "src/content/stories"
//! extensions = ["mdx", "md"]
//! coerce_id = true
//!
//! [assets]
//! base_dir = "."
//! roots = ["static", "public"]
//!
//! [build]
//! strict = true
//! ```
//!
//! `STORYMAP_CONTENT_DIR` overrides `content.dir` after the file is loaded.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use storymap_core::ConfigManager;
use storymap_core::util::paths::expand_tilde;
use storymap_stories::{AssetRoots, BuildOptions, FsContentStore};

/// Environment variable overriding `content.dir`.
pub const CONTENT_DIR_ENV: &str = "STORYMAP_CONTENT_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorymapConfig {
    pub content: ContentConfig,
    pub assets: AssetsConfig,
    pub build: BuildConfig,
}

/// Where story documents live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub dir: String,
    pub extensions: Vec<String>,
    pub coerce_id: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: "src/content/stories".to_string(),
            extensions: vec!["mdx".to_string(), "md".to_string()],
            coerce_id: true,
        }
    }
}

/// Where referenced images live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub base_dir: String,
    pub roots: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            roots: vec!["static".to_string(), "public".to_string()],
        }
    }
}

/// Release-build behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub strict: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ConfigManager for StorymapConfig {
    fn project_name() -> &'static str {
        "storymap"
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(CONTENT_DIR_ENV) {
            if !dir.trim().is_empty() {
                log::debug!("{CONTENT_DIR_ENV} overrides content.dir with {dir}");
                self.content.dir = dir;
            }
        }
    }
}

impl StorymapConfig {
    /// Story directory with `~` expanded.
    pub fn content_dir(&self) -> PathBuf {
        expand_tilde(&self.content.dir)
    }

    /// Filesystem store over the configured story directory.
    pub fn store(&self) -> FsContentStore {
        FsContentStore::new(self.content_dir()).with_extensions(self.content.extensions.iter().cloned())
    }

    /// Asset lookup for lint.
    pub fn asset_roots(&self) -> AssetRoots {
        AssetRoots::new(expand_tilde(&self.assets.base_dir), self.assets.roots.iter().cloned())
    }

    /// Build options with the given strictness.
    pub fn build_options(&self, strict: bool) -> BuildOptions {
        BuildOptions {
            strict,
            coerce_id: self.content.coerce_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorymapConfig::default();
        assert_eq!(config.content.dir, "src/content/stories");
        assert_eq!(config.content.extensions, vec!["mdx", "md"]);
        assert!(config.content.coerce_id);
        assert_eq!(config.assets.roots, vec!["static", "public"]);
        assert!(config.build.strict);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: StorymapConfig = toml::from_str("[content]\ndir = \"stories\"\n").unwrap();
        assert_eq!(config.content.dir, "stories");
        assert_eq!(config.content.extensions, vec!["mdx", "md"]);
        assert!(config.build.strict);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storymap.toml");
        std::fs::write(&path, "[build]\nstrict = false\n[assets]\nroots = [\"public\"]\n").unwrap();

        let config = StorymapConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert!(!config.build.strict);
        assert_eq!(config.assets.roots, vec!["public"]);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        assert!(StorymapConfig::load(Some("/nonexistent/storymap.toml")).is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = StorymapConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[content]"));
        let back: StorymapConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_env_vars() {
        let vars = StorymapConfig::default().to_env_vars().unwrap();
        assert!(vars.contains(&("STORYMAP_CONTENT_DIR".to_string(), "src/content/stories".to_string())));
        assert!(vars.contains(&("STORYMAP_CONTENT_EXTENSIONS".to_string(), "mdx,md".to_string())));
        assert!(vars.contains(&("STORYMAP_BUILD_STRICT".to_string(), "true".to_string())));
    }

    #[test]
    fn test_build_options() {
        let mut config = StorymapConfig::default();
        config.content.coerce_id = false;
        assert_eq!(
            config.build_options(true),
            BuildOptions {
                strict: true,
                coerce_id: false
            }
        );
    }
}
