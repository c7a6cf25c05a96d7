//! Configuration module for reposcope
//!
//! Manages application configuration including the directories scanned
//! for repositories and the default similarity threshold. Configuration
//! is stored in the user's config directory and is also projected into
//! the virtual tree under `/config`.

use std::fs;
use std::path::PathBuf;
use config::{Config, ConfigError, File, FileFormat};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::query::DEFAULT_THRESHOLD;

const fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReposcopeConfig {
    /// Directories scanned for repositories
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Default similarity cutoff for fuzzy query evaluation
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: u32,

    /// Whether clean repositories appear under the status grouping
    #[serde(default)]
    pub show_clean: bool,
}

impl Default for ReposcopeConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            fuzzy_threshold: default_threshold(),
            show_clean: false,
        }
    }
}

impl ReposcopeConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be
    /// determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("reposcope").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed,
    /// or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file path
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        debug!("loading configuration from {}", path.display());
        let settings = Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created,
    /// the configuration cannot be serialized to TOML, or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Flat key/value view of the configuration for the `/config`
    /// subtree of the virtual tree
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        let roots = self
            .roots
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(":");

        vec![
            ("roots".to_string(), roots),
            ("fuzzy_threshold".to_string(), self.fuzzy_threshold.to_string()),
            ("show_clean".to_string(), self.show_clean.to_string()),
        ]
    }
}
