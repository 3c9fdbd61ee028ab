//! Initial compositor settings.

use super::line_style::LineStyle;
use crate::config::{Config, MaskStyleKind};
use crate::draw::LineCap;
use crate::input::Mode;

/// Default stroke width in display points.
pub const DEFAULT_LINE_WIDTH: f64 = 20.0;

/// Brush, mask, and mode settings a [`LayerCompositor`](super::LayerCompositor) starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_style: LineStyle,
    pub mode: Mode,
    /// Compute blurred mask layers on a worker thread
    pub background_blur: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            line_cap: LineCap::default(),
            line_style: LineStyle::default(),
            mode: Mode::default(),
            background_blur: false,
        }
    }
}

impl EditorSettings {
    /// Builds settings from a loaded (already validated) configuration.
    pub fn from_config(config: &Config) -> Self {
        let line_style = match config.mask.style {
            MaskStyleKind::Blur => LineStyle::BlurRadius(config.mask.blur_radius),
            MaskStyleKind::Solid => LineStyle::SolidColor(config.mask.color.to_color()),
        };
        Self {
            line_width: config.brush.line_width,
            line_cap: config.brush.line_cap,
            line_style,
            mode: config.editor.default_mode,
            background_blur: config.performance.background_blur,
        }
    }
}
