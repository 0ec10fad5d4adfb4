//! Configuration management (~/.config/Nethercore/inspector.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory. Missing keys fall back to their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the inspector configuration
pub const CONFIG_FILE: &str = "inspector.toml";

/// Inspector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InspectorConfig {
    /// Registry refresh policy
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Inspector session behavior
    #[serde(default)]
    pub session: SessionConfig,
}

/// When the registry rebuilds in response to host lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Rebuild after code reloads (default: true)
    #[serde(default = "default_true")]
    pub refresh_on_reload: bool,
    /// Rebuild on play/edit mode transitions (default: true)
    #[serde(default = "default_true")]
    pub refresh_on_play_mode: bool,
}

/// Inspector session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Only poll live values while the host is playing (default: true)
    #[serde(default = "default_true")]
    pub poll_only_while_playing: bool,
    /// Text shown for a value that has not been read (default: "-")
    #[serde(default = "default_empty_value")]
    pub empty_value: String,
}

fn default_true() -> bool {
    true
}

fn default_empty_value() -> String {
    "-".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            refresh_on_reload: default_true(),
            refresh_on_play_mode: default_true(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_only_while_playing: default_true(),
            empty_value: default_empty_value(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Nethercore\config`
/// On macOS: `~/Library/Application Support/io.nethercore.Nethercore`
/// On Linux: `~/.config/Nethercore`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.nethercore", "", "Nethercore")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of the inspector config file, if a config directory exists
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from the platform config directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> InspectorConfig {
    let Some(path) = config_path() else {
        return InspectorConfig::default();
    };
    if !path.exists() {
        return InspectorConfig::default();
    }

    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), "using default inspector config: {e}");
            InspectorConfig::default()
        }
    }
}

/// Loads the configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<InspectorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Saves the configuration to the platform config directory.
///
/// Creates the directory if it doesn't exist.
pub fn save(config: &InspectorConfig) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Saves the configuration to an explicit path.
pub fn save_to(config: &InspectorConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
