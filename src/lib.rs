//! Library exports for the blurmask image editor.
//!
//! The core is [`editor::LayerCompositor`]: it derives a mask layer (a blur or
//! solid fill of the source image), punches strokes out of a committed baseline,
//! and flattens the result so strokes reveal either the mask or the original
//! depending on the editing mode. The remaining modules supply the raster
//! primitives, gesture handling, configuration, and file output around it.

pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod input;
pub mod script;
pub mod util;

pub use config::Config;
