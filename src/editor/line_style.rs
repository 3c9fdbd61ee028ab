//! How the mask layer is derived from the source image.

use crate::draw::{BLACK, Color};

/// Default Gaussian radius (points) for the blurred mask layer.
pub const DEFAULT_BLUR_RADIUS: f64 = 20.0;

/// Source of the layer revealed by Pen strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    /// Opaque fill of one color at the source image's size
    SolidColor(Color),
    /// The source image blurred with this Gaussian radius (points)
    BlurRadius(f64),
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::BlurRadius(DEFAULT_BLUR_RADIUS)
    }
}

impl LineStyle {
    /// Solid mask in the default color.
    pub fn solid() -> Self {
        Self::SolidColor(BLACK)
    }

    /// Blur radius, if this is a blur style.
    pub fn blur_radius(&self) -> Option<f64> {
        match self {
            Self::BlurRadius(radius) => Some(*radius),
            Self::SolidColor(_) => None,
        }
    }
}
