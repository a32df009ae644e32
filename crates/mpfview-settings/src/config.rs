//! Configuration management for mpfview
//!
//! Settings are stored as JSON or TOML, chosen by file extension. Missing
//! sections and keys fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use mpfview_core::constants::{DEFAULT_STEP_SIZE_MM, MAX_STEP_SIZE_MM, MIN_STEP_SIZE_MM};

use crate::error::{SettingsError, SettingsResult};

/// Application directory name under the platform config directory
pub const APP_DIR_NAME: &str = "mpfview";

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// On-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Playback segmentation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationSettings {
    /// Default sampling distance in mm
    pub step_size_mm: f64,
    /// Smallest accepted sampling distance in mm
    pub min_step_size_mm: f64,
    /// Largest accepted sampling distance in mm
    pub max_step_size_mm: f64,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            step_size_mm: DEFAULT_STEP_SIZE_MM,
            min_step_size_mm: MIN_STEP_SIZE_MM,
            max_step_size_mm: MAX_STEP_SIZE_MM,
        }
    }
}

impl SegmentationSettings {
    /// Bring a requested step size into the configured range
    ///
    /// Non-finite requests fall back to the default step size.
    pub fn clamp(&self, step_size_mm: f64) -> f64 {
        if !step_size_mm.is_finite() {
            return self.step_size_mm;
        }
        step_size_mm.clamp(self.min_step_size_mm, self.max_step_size_mm)
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Playback sampling
    pub segmentation: SegmentationSettings,
    /// Log output
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location (`<config dir>/mpfview/config.toml`)
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("platform config directory unavailable".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config at the default path, or defaults when there is none
    pub fn load_or_default() -> SettingsResult<Self> {
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            Ok(path) => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                debug!("{}, using defaults", err);
                Ok(Self::default())
            }
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let seg = &self.segmentation;
        if !(seg.min_step_size_mm.is_finite() && seg.min_step_size_mm > 0.0) {
            return Err(SettingsError::invalid(
                "segmentation.min_step_size_mm",
                "must be > 0",
            ));
        }
        if !(seg.max_step_size_mm.is_finite() && seg.max_step_size_mm >= seg.min_step_size_mm) {
            return Err(SettingsError::invalid(
                "segmentation.max_step_size_mm",
                "must be >= min_step_size_mm",
            ));
        }
        if !(seg.step_size_mm >= seg.min_step_size_mm && seg.step_size_mm <= seg.max_step_size_mm)
        {
            return Err(SettingsError::invalid(
                "segmentation.step_size_mm",
                format!(
                    "must be within {} to {}",
                    seg.min_step_size_mm, seg.max_step_size_mm
                ),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(SettingsError::invalid("logging.level", "must not be empty"));
        }

        Ok(())
    }
}
