//! Input handling: gesture events, the stroke recorder, and editing modes.
//!
//! This module turns the abstract pointer stream delivered by the surrounding
//! widget into ordered [`Stroke`]s, and defines the [`Mode`] that decides which
//! layer those strokes reveal.

pub mod events;
pub mod mode;
pub mod recorder;
pub mod stroke;

// Re-export commonly used types at module level
pub use events::GestureEvent;
pub use mode::{Backdrop, Mode};
pub use recorder::{RecorderState, StrokeRecorder};
pub use stroke::{Stroke, StrokeBatch};
