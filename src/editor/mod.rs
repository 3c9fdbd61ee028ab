//! Stateful editing layer: the mask layer, the committed baseline, and the
//! mode-aware commit that bakes strokes into it.

mod compositor;
mod line_style;
mod mask;
mod settings;


use crate::draw::DrawError;
use thiserror::Error;

pub use compositor::{DisplayLayers, LayerCompositor};
pub use line_style::{DEFAULT_BLUR_RADIUS, LineStyle};
pub use settings::{DEFAULT_LINE_WIDTH, EditorSettings};

/// Why an editing operation produced no image.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Nothing to edit yet; callers normally treat this as a silent no-op
    #[error("no source image has been set")]
    NoSourceImage,

    #[error("mask layer is unavailable")]
    MaskLayerUnavailable,

    #[error(transparent)]
    Draw(#[from] DrawError),
}
