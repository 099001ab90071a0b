//! # cppdom-config
//!
//! Layered configuration loading for cppdom using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Process environment variables (`CPPDOM_*` prefix, `__` as separator)
//! 2. `CPPDOM_*` entries of `<project>/.env`
//! 3. `<project>/.cppdom/config.toml`
//! 4. User-level `~/.config/cppdom/config.toml`
//! 5. Built-in defaults
//!
//! The `.env` file is read as a provider layer. It is never exported into
//! the process environment, so loading a config has no side effects.
//!
//! # Environment Variable Mapping
//!
//! `CPPDOM_BUILD__MAX_COMPOUND_DEPTH` -> `build.max_compound_depth`.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use cppdom_config::DomConfig;
//! use cppdom_core::Dom;
//!
//! let config = DomConfig::load_at("path/to/project").expect("config");
//! let dom: Dom = Dom::with_options("widget.h", config.build);
//! assert_eq!(dom.compound_count(), 1);
//! ```

mod error;

pub use error::ConfigError;

use cppdom_core::BuildOptions;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Value,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "CPPDOM_";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DomConfig {
    /// How the arena records recognizer output.
    #[serde(default)]
    pub build: BuildOptions,
}

impl DomConfig {
    /// Load and validate the configuration for the project in the current
    /// directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_at(".")
    }

    /// Load and validate the configuration for the project rooted at `root`.
    pub fn load_at(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_at(root.as_ref())?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain for the project rooted at `root`.
    ///
    /// Public so callers can add providers on top.
    pub fn figment_at(root: &Path) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let project_path = root.join(".cppdom").join("config.toml");
        if project_path.exists() {
            figment = figment.merge(Toml::file(project_path));
        }

        for (key, value) in Self::dotenv_entries(&root.join(".env"))? {
            figment = figment.merge(Serialized::default(&key, value));
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR)))
    }

    /// Reject values the arena cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build.max_compound_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "build.max_compound_depth".to_string(),
                reason: "must be at least 1 to allow any nested scope".to_string(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cppdom").join("config.toml"))
    }

    /// `CPPDOM_*` entries of a `.env` file as figment key paths, with values
    /// parsed the way [`Env`] parses them. A missing file yields nothing.
    fn dotenv_entries(path: &Path) -> Result<Vec<(String, Value)>, ConfigError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, raw) = item?;
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key_path = name.to_ascii_lowercase().replace(ENV_SEPARATOR, ".");
            let value = raw.parse::<Value>().unwrap_or_else(|never| match never {});
            entries.push((key_path, value));
        }
        Ok(entries)
    }
}
