//! Stroke segments and the pending batch.

use crate::util::Point;
use serde::{Deserialize, Serialize};

/// One line segment of a gesture, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
}

impl Stroke {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

/// Strokes accumulated since the last commit, in arrival order.
///
/// Order matters: overlapping segments are rasterized one after another so a
/// gesture reads as one continuous brush trail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeBatch {
    strokes: Vec<Stroke>,
}

impl StrokeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stroke after every stroke already recorded.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn as_slice(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Empties the batch, returning the strokes in arrival order.
    pub fn take(&mut self) -> Vec<Stroke> {
        std::mem::take(&mut self.strokes)
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}
