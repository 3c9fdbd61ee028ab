//! Raster primitives for the blur editor (Cairo-based).
//!
//! This module defines the core image types and the stateless operations the
//! editor composes:
//! - [`Image`]: immutable ARGB32 raster plus device scale
//! - [`blur`]: three-pass box blur approximating a Gaussian
//! - [`ops`]: resize, solid fill, and layer flattening
//! - [`render`]: clear-operator stroke rasterization

pub mod blur;
pub mod color;
pub mod image;
pub mod ops;
pub mod render;

// Re-export commonly used types at module level
pub use blur::{BoxBlur, box_window};
pub use color::{Color, name_to_color};
pub use image::{DrawError, Image, PixelBuffer};
pub use ops::{filled, resized_to, resized_to_fit, suitable_size, union_below};
pub use render::{LineCap, StrokeStyle, render_erase_segment, render_erase_strokes};

pub use color::{BLACK, BLUE, GREEN, GREY, ORANGE, PINK, RED, WHITE, YELLOW};
