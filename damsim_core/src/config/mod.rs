//! Configuration loading from TOML files

use crate::snapshot::{normalize_with, ParameterSnapshot};
use crate::types::InputMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Input mode of a fresh or reset snapshot. Unknown names mean gear.
    #[serde(default = "default_mode")]
    pub default_mode: String,
    /// JSON file holding named presets
    #[serde(default = "default_presets_path")]
    pub presets_path: PathBuf,
    /// Prefix of generated share links
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
    /// Partial snapshot overriding the built-in defaults
    #[serde(default)]
    pub defaults: Option<serde_json::Value>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            default_mode: default_mode(),
            presets_path: default_presets_path(),
            share_base_url: default_share_base_url(),
            defaults: None,
        }
    }
}

fn default_mode() -> String {
    "simple".to_string()
}
fn default_presets_path() -> PathBuf {
    PathBuf::from("damsim-presets.json")
}
fn default_share_base_url() -> String {
    "https://example.invalid/damsim/".to_string()
}

impl ToolConfig {
    /// The bundled configuration
    pub fn bundled() -> Self {
        let toml = include_str!("../../config/damsim.toml");
        parse_toml(toml).unwrap_or_else(|_| ToolConfig::default())
    }

    /// Load `path` if it exists, otherwise fall back to the bundled config
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(ToolConfig::bundled());
        }
        let config: ToolConfig = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presets_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "presets_path must not be empty".to_string(),
            ));
        }
        if self.share_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "share_base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn mode(&self) -> InputMode {
        InputMode::parse(&self.default_mode).unwrap_or(InputMode::Gear)
    }

    /// Snapshot used for new and reset states: the built-in defaults,
    /// overridden by `[defaults]`, in [`mode`](Self::mode).
    pub fn default_snapshot(&self) -> ParameterSnapshot {
        let base = ParameterSnapshot::with_mode(self.mode());
        let mut snapshot = match &self.defaults {
            Some(overrides) => normalize_with(overrides, &base),
            None => base,
        };
        snapshot.input_mode = self.mode();
        snapshot
    }
}
