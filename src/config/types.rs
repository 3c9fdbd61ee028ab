//! Configuration type definitions.

use super::enums::{ColorSpec, MaskStyleKind};
use crate::draw::LineCap;
use crate::input::Mode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Brush settings applied to every stroke.
///
/// Width and cap are read when strokes are committed, so changing them while a
/// gesture is in progress affects the whole uncommitted batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrushConfig {
    /// Stroke width in display points (valid range: 1.0 - 200.0)
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Stroke end style: "butt", "round", or "square"
    #[serde(default)]
    pub line_cap: LineCap,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            line_width: default_line_width(),
            line_cap: LineCap::default(),
        }
    }
}

/// Mask layer settings.
///
/// Pen strokes reveal this layer: either a blurred copy of the source image or
/// an opaque fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaskConfig {
    /// "blur" or "solid"
    #[serde(default)]
    pub style: MaskStyleKind,

    /// Gaussian blur radius in points (valid range: 0.0 - 100.0)
    /// Small radii may map to a one-pixel window and leave the image unchanged
    #[serde(default = "default_blur_radius")]
    pub blur_radius: f64,

    /// Fill color for the "solid" style - a named color or `[r, g, b]` (0-255)
    /// Alpha is ignored; the mask is always opaque
    #[serde(default)]
    pub color: ColorSpec,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            style: MaskStyleKind::default(),
            blur_radius: default_blur_radius(),
            color: ColorSpec::default(),
        }
    }
}

/// Editing session defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EditorConfig {
    /// Mode the editor starts in: "pen" or "eraser"
    #[serde(default)]
    pub default_mode: Mode,

    /// Longest side of the display surface in points
    /// 0 uses the image's own point size; otherwise strokes are measured against
    /// the image resized to fit this bound
    #[serde(default)]
    pub display_max_dimension: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_mode: Mode::default(),
            display_max_dimension: 0.0,
        }
    }
}

/// Performance tuning options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceConfig {
    /// Compute blurred mask layers on a worker thread
    /// Reads of the mask layer wait for the worker; a new source image cancels it
    #[serde(default)]
    pub background_blur: bool,
}

/// Where exported images are written when no explicit output path is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Output directory; `~/` is expanded to the home directory
    #[serde(default = "default_save_directory")]
    pub save_directory: String,

    /// Filename template (chrono format specifiers), without extension
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: default_filename_template(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_line_width() -> f64 {
    crate::editor::DEFAULT_LINE_WIDTH
}

fn default_blur_radius() -> f64 {
    crate::editor::DEFAULT_BLUR_RADIUS
}

fn default_save_directory() -> String {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join("Blurmask")
        .to_string_lossy()
        .into_owned()
}

fn default_filename_template() -> String {
    "blurmask_%Y-%m-%d_%H%M%S".to_string()
}
