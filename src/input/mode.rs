//! Editing mode selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Editing mode.
///
/// Determines which layer a stroke reveals once it is committed, and which
/// layer the view shows behind the live top layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Strokes reveal the mask layer (blurred image or solid fill) (default)
    #[default]
    Pen,
    /// Strokes restore the original image
    Eraser,
}

/// The layer shown underneath punched strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backdrop {
    /// The derived blur / solid-color layer
    MaskLayer,
    /// The untouched source image
    Original,
}

impl Mode {
    /// Layer that strokes made in this mode are baked against.
    pub fn backdrop(&self) -> Backdrop {
        match self {
            Self::Pen => Backdrop::MaskLayer,
            Self::Eraser => Backdrop::Original,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Eraser => "eraser",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pen" => Ok(Self::Pen),
            "eraser" | "erase" => Ok(Self::Eraser),
            _ => Err(()),
        }
    }
}
