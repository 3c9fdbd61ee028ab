//! Configuration file support for blurmask.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/blurmask/config.toml`. Settings include brush defaults, how the
//! mask layer is derived, the starting mode, and where exports are written.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, MaskStyleKind};
pub use types::{BrushConfig, EditorConfig, ExportConfig, MaskConfig, PerformanceConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [brush]
/// line_width = 24.0
/// line_cap = "round"
///
/// [mask]
/// style = "blur"
/// blur_radius = 12.0
///
/// [editor]
/// default_mode = "pen"
///
/// [performance]
/// background_blur = true
///
/// [export]
/// save_directory = "~/Pictures/Blurmask"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Stroke width and cap
    #[serde(default)]
    pub brush: BrushConfig,

    /// Mask layer derivation (blur or solid fill)
    #[serde(default)]
    pub mask: MaskConfig,

    /// Editing session defaults
    #[serde(default)]
    pub editor: EditorConfig,

    /// Performance tuning options
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Export destination
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `brush.line_width`: 1.0 - 200.0
    /// - `mask.blur_radius`: 0.0 - 100.0
    /// - `editor.display_max_dimension`: >= 0.0
    pub fn validate_and_clamp(&mut self) {
        // Line width: 1.0 - 200.0
        if !(1.0..=200.0).contains(&self.brush.line_width) {
            log::warn!(
                "Invalid line_width {:.1}, clamping to 1.0-200.0 range",
                self.brush.line_width
            );
            self.brush.line_width = if self.brush.line_width.is_nan() {
                crate::editor::DEFAULT_LINE_WIDTH
            } else {
                self.brush.line_width.clamp(1.0, 200.0)
            };
        }

        // Blur radius: 0.0 - 100.0
        if !(0.0..=100.0).contains(&self.mask.blur_radius) {
            log::warn!(
                "Invalid blur_radius {:.1}, clamping to 0.0-100.0 range",
                self.mask.blur_radius
            );
            self.mask.blur_radius = if self.mask.blur_radius.is_nan() {
                crate::editor::DEFAULT_BLUR_RADIUS
            } else {
                self.mask.blur_radius.clamp(0.0, 100.0)
            };
        }

        // Display bound: 0 disables
        if !(self.editor.display_max_dimension >= 0.0
            && self.editor.display_max_dimension.is_finite())
        {
            log::warn!(
                "Invalid display_max_dimension {:.1}, using image size",
                self.editor.display_max_dimension
            );
            self.editor.display_max_dimension = 0.0;
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!("Empty export filename_template, using default");
            self.export.filename_template = ExportConfig::default().filename_template;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/blurmask/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("blurmask");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to the default location.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    /// Serializes the config to TOML and writes it to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file, for editors and external tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
