//! Gesture-to-stroke state machine.

use super::events::GestureEvent;
use super::stroke::Stroke;
use crate::util::Point;

/// Recorder state.
///
/// Tracks whether a gesture is in progress and where its last point was.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RecorderState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Finger down; strokes are emitted from `last` to each new point
    Tracking { last: Point },
}

/// Turns a pointer gesture into a sequence of from→to strokes.
///
/// - `Idle` → `Tracking` on begin (nothing emitted)
/// - `Tracking` → `Tracking` on move (emits `last → point`, then advances `last`)
/// - `Tracking` → `Idle` on end (nothing emitted for the terminal point)
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    state: RecorderState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, RecorderState::Tracking { .. })
    }

    /// Starts a gesture. A second begin while already tracking keeps the
    /// original anchor point.
    pub fn begin(&mut self, point: Point) {
        if matches!(self.state, RecorderState::Idle) {
            self.state = RecorderState::Tracking { last: point };
        }
    }

    /// Continues the gesture, emitting the segment from the previous point.
    ///
    /// Moves outside a gesture are ignored.
    pub fn move_to(&mut self, point: Point) -> Option<Stroke> {
        if let RecorderState::Tracking { last } = &mut self.state {
            let stroke = Stroke::new(*last, point);
            *last = point;
            Some(stroke)
        } else {
            None
        }
    }

    /// Ends the gesture and forgets the last point.
    pub fn end(&mut self) {
        self.state = RecorderState::Idle;
    }

    /// Dispatches a raw gesture event, returning a stroke when one is produced.
    pub fn handle(&mut self, event: GestureEvent) -> Option<Stroke> {
        match event {
            GestureEvent::Began(point) => {
                self.begin(point);
                None
            }
            GestureEvent::Moved(point) => self.move_to(point),
            GestureEvent::Ended | GestureEvent::Cancelled => {
                self.end();
                None
            }
        }
    }
}
