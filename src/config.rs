//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: explicit path, else `$XDG_CONFIG_HOME/entity-hierarchy/entity-hierarchy.toml`
//! 3. Environment variables: `ENTITY_HIERARCHY__*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

const APP_NAME: &str = "entity-hierarchy";
const ENV_PREFIX: &str = "ENTITY_HIERARCHY";

/// Hierarchy service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Relative path of the relationship sync endpoint (POST)
    pub sync_path: String,
    /// Relative path of the hierarchy fetch endpoint (GET)
    pub fetch_path: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".into(),
            sync_path: "entities/sync-relationships".into(),
            fetch_path: "entities/hierarchy".into(),
            timeout_secs: 30,
        }
    }
}

/// Warm-start snapshot cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory holding cached snapshots
    pub dir: PathBuf,
    /// Key the last loaded hierarchy is stored under
    pub key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
            key: "entity-hierarchy".into(),
        }
    }
}

/// Unified configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub api: ApiConfig,
    pub cache: CacheConfig,
}

/// Default cache directory (XDG cache dir, else `~/.cache/entity-hierarchy`).
fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!("~/.cache/{APP_NAME}")))
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(format!("{APP_NAME}.toml")))
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit TOML file; when `None` the global XDG file is used if present
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("api.base_url", defaults.api.base_url.clone())
            .map_err(config_err)?
            .set_default("api.sync_path", defaults.api.sync_path.clone())
            .map_err(config_err)?
            .set_default("api.fetch_path", defaults.api.fetch_path.clone())
            .map_err(config_err)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs)
            .map_err(config_err)?
            .set_default("cache.enabled", defaults.cache.enabled)
            .map_err(config_err)?
            .set_default("cache.dir", defaults.cache.dir.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("cache.key", defaults.cache.key.clone())
            .map_err(config_err)?;

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ApplicationError::Config {
                        message: format!("config file not found: {}", path.display()),
                    });
                }
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    builder = builder
                        .add_source(File::from(global_path).format(FileFormat::Toml).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.cache.dir.to_string_lossy().as_ref());
        self.cache.dir = PathBuf::from(expanded);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "api.base_url must not be empty".into(),
            });
        }
        if self.cache.enabled && self.cache.key.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "cache.key must not be empty when the cache is enabled".into(),
            });
        }
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Commented template for a fresh config file.
    pub fn template() -> String {
        r#"# entity-hierarchy configuration
# Environment variables override this file: ENTITY_HIERARCHY__API__BASE_URL=...

[api]
# base_url = "http://localhost:8080/api"
# sync_path = "entities/sync-relationships"
# fetch_path = "entities/hierarchy"
# timeout_secs = 30

[cache]
# enabled = true
# dir = "~/.cache/entity-hierarchy"
# key = "entity-hierarchy"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_points_at_local_backend() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:8080/api");
        assert_eq!(settings.api.timeout_secs, 30);
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.key, "entity-hierarchy");
    }

    #[test]
    fn given_tilde_in_cache_dir_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.cache.dir = PathBuf::from("~/snapshots");
        settings.expand_paths();
        assert!(!settings.cache.dir.to_string_lossy().starts_with('~'));
        assert!(settings.cache.dir.ends_with("snapshots"));
    }

    #[test]
    fn given_settings_when_to_toml_then_contains_sections() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("[api]"));
        assert!(toml.contains("[cache]"));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let parsed: Result<Settings, _> = toml::from_str(&Settings::template());
        assert!(parsed.is_ok(), "{:?}", parsed.err());
    }

    #[test]
    fn given_empty_base_url_when_validating_then_config_error() {
        let mut settings = Settings::default();
        settings.api.base_url = " ".into();
        assert!(matches!(settings.validate(), Err(ApplicationError::Config { .. })));
    }
}
