//! Host configuration for the adriver command line player
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/adriver/config.yaml
//!
//! ```yaml
//! backends: [jack, file]      # omit to allow every compiled-in backend
//! settings:
//!   selected-backend: auto
//!   period-size: 256
//!   sample-format: float
//!   file.name: /tmp/tone.wav
//! tone:
//!   frequency: 440.0
//!   amplitude: 0.2
//! duration_secs: 2.0
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use adriver_core::SettingsOverrides;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Restrict selection to these backends (`None` = all compiled in)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backends: Option<Vec<String>>,
    /// Driver setting overrides applied after registration
    pub settings: SettingsOverrides,
    /// Test tone played in synth mode and callback mode alike
    pub tone: ToneConfig,
    /// How long to play before tearing the driver down
    pub duration_secs: f64,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            backends: None,
            settings: SettingsOverrides::new(),
            tone: ToneConfig::default(),
            duration_secs: 2.0,
        }
    }
}

/// Test tone section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Frequency in Hz
    pub frequency: f32,
    /// Peak amplitude (0.0 - 1.0)
    pub amplitude: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency: 440.0, // A4
            amplitude: 0.2,
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/adriver/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("adriver")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> PlayConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return PlayConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<PlayConfig>(&contents) {
            Ok(config) => {
                log::info!("load_config: Successfully loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                PlayConfig::default()
            }
        },
        Err(e) => {
            log::warn!(
                "load_config: Failed to read config file: {}, using defaults",
                e
            );
            PlayConfig::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &PlayConfig, path: &Path) -> Result<()> {
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: Config saved successfully");
    Ok(())
}
