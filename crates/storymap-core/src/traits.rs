//! Configuration management trait.
//!
//! [`ConfigManager`] is implemented by an application's top-level config
//! struct. It supplies file discovery, TOML loading, and environment-variable
//! export so that `config` subcommands can be written once and reused.
//!
//! # Resolution order
//!
//! 1. An explicit path (e.g. `--config`)
//! 2. `{PROJECT}_CONFIG` environment variable
//! 3. `{project}.toml` in the current working directory, if it exists
//! 4. `{platform config dir}/{project}/config.toml`

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::util::paths::expand_tilde;

/// Load, locate, and export a TOML configuration.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name, e.g. `"storymap"`.
    fn project_name() -> &'static str;

    /// Environment variable prefix derived from the project name.
    ///
    /// `"storymap"` → `"STORYMAP"`, `"story-map"` → `"STORY_MAP"`.
    fn env_prefix() -> String {
        Self::project_name().to_uppercase().replace(['-', ' '], "_")
    }

    /// Platform default location of the config file.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve which config file should be used.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(expand_tilde(path));
        }

        if let Ok(path) = env::var(format!("{}_CONFIG", Self::env_prefix())) {
            if !path.trim().is_empty() {
                return Some(expand_tilde(&path));
            }
        }

        let local = PathBuf::from(format!("{}.toml", Self::project_name()));
        if local.exists() {
            return Some(local);
        }

        Self::default_config_path()
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// An explicit path that does not exist is an error; discovered paths
    /// that do not exist are not.
    fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                log::debug!("Loading configuration from {}", path.display());
                toml::from_str(&content)
                    .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?
            }
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
            _ => {
                log::debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment-variable overrides after loading.
    fn apply_env_overrides(&mut self) {}

    /// Serialize to a pretty TOML document.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten the configuration into `PREFIX_SECTION_KEY=value` pairs.
    ///
    /// Arrays are joined with commas.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&Self::env_prefix(), &value, &mut vars);
        Ok(vars)
    }
}

fn flatten_env(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let name = format!("{prefix}_{}", key.to_uppercase().replace('-', "_"));
                flatten_env(&name, child, out);
            }
        }
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), scalar_to_string(other))),
    }
}

fn scalar_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct DemoConfig {
        site: DemoSite,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct DemoSite {
        name: String,
        roots: Vec<String>,
        strict: bool,
    }

    impl Default for DemoSite {
        fn default() -> Self {
            Self {
                name: "demo".to_string(),
                roots: vec!["static".to_string(), "public".to_string()],
                strict: true,
            }
        }
    }

    impl ConfigManager for DemoConfig {
        fn project_name() -> &'static str {
            "demo-site"
        }
    }

    #[test]
    fn test_env_prefix() {
        assert_eq!(DemoConfig::env_prefix(), "DEMO_SITE");
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = DemoConfig::resolve_config_path(Some("/explicit/demo.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/demo.toml")));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.toml");
        std::fs::write(&path, "[site]\nname = \"stories\"\n").unwrap();

        let config = DemoConfig::load(path.to_str()).unwrap();
        assert_eq!(config.site.name, "stories");
        assert!(config.site.strict);
    }

    #[test]
    fn test_load_missing_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = DemoConfig::load(path.to_str()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[site\nname = ").unwrap();
        let err = DemoConfig::load(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_to_toml_string_roundtrips() {
        let config = DemoConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed: DemoConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_to_env_vars() {
        let vars = DemoConfig::default().to_env_vars().unwrap();
        assert!(vars.contains(&("DEMO_SITE_SITE_NAME".to_string(), "demo".to_string())));
        assert!(vars.contains(&(
            "DEMO_SITE_SITE_ROOTS".to_string(),
            "static,public".to_string()
        )));
        assert!(vars.contains(&("DEMO_SITE_SITE_STRICT".to_string(), "true".to_string())));
    }
}
