//! Geometry helpers shared by the editor, the raster utilities, and the CLI.
//!
//! This module provides:
//! - [`Point`] and [`Size`] value types in display/point coordinates
//! - Aspect-ratio fitting (`aspect_fit_size`, `aspect_fill_size`)
//! - Display-to-image coordinate scaling ([`ScaleRatio`])

use serde::{Deserialize, Serialize};

// ============================================================================
// Value Types
// ============================================================================

/// A location in display (or image point) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair measured in points (pixels divided by the device scale).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns true if either side is zero, negative, or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Longer of the two sides.
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Scales both sides by the same factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Converts a point size to whole device pixels, never less than one pixel per side.
    pub fn to_pixels(&self, scale: f64) -> (i32, i32) {
        let w = (self.width * scale).round().max(1.0) as i32;
        let h = (self.height * scale).round().max(1.0) as i32;
        (w, h)
    }

    /// Parses `WIDTHxHEIGHT` (e.g. `375x667`), as accepted on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        let (w, h) = value.split_once(['x', 'X'])?;
        let size = Self::new(w.trim().parse().ok()?, h.trim().parse().ok()?);
        (!size.is_degenerate()).then_some(size)
    }
}

// ============================================================================
// Aspect Ratio Fitting
// ============================================================================

/// Largest size with `content`'s aspect ratio that fits entirely inside `bounds`.
pub fn aspect_fit_size(bounds: Size, content: Size) -> Size {
    if content.is_degenerate() {
        return Size::default();
    }
    let ratio = (bounds.width / content.width).min(bounds.height / content.height);
    content.scaled(ratio)
}

/// Smallest size with `content`'s aspect ratio that covers all of `bounds`.
pub fn aspect_fill_size(bounds: Size, content: Size) -> Size {
    if content.is_degenerate() {
        return Size::default();
    }
    let ratio = (bounds.width / content.width).max(bounds.height / content.height);
    content.scaled(ratio)
}

// ============================================================================
// Display -> Image Scaling
// ============================================================================

/// Independent per-axis ratios mapping display coordinates onto image points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRatio {
    pub width: f64,
    pub height: f64,
}

impl ScaleRatio {
    /// Ratio `target / display` for each axis. Returns `None` for a degenerate display size.
    pub fn between(display: Size, target: Size) -> Option<Self> {
        if display.is_degenerate() || target.is_degenerate() {
            return None;
        }
        Some(Self {
            width: target.width / display.width,
            height: target.height / display.height,
        })
    }

    /// Maps a display point into target space.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(point.x * self.width, point.y * self.height)
    }

    /// Factor applied to stroke widths so thickness survives non-uniform scaling.
    pub fn line_width_factor(&self) -> f64 {
        self.width.max(self.height)
    }
}
