//! Loads optional deployment defaults from a YAML file on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::DeployDefaults;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SHIPYARD_CONFIG";

/// YAML-backed store for `DeployDefaults`.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Use `explicit` if given, else `$SHIPYARD_CONFIG`, else
    /// `~/.shipyard/config.yaml`.
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let path = explicit
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| dirs::home_dir().map(|h| h.join(".shipyard").join("config.yaml")));
        Self { path }
    }

    /// Load defaults; a missing file yields empty defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<DeployDefaults> {
        let Some(path) = &self.path else {
            return Ok(DeployDefaults::default());
        };
        if !path.exists() {
            return Ok(DeployDefaults::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(DeployDefaults::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }
}
