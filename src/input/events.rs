//! Abstract gesture events consumed from the (external) touch/pointer layer.

use crate::util::Point;

/// One event of a single-pointer gesture, already hit-tested and expressed in
/// display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Finger/stylus touched down
    Began(Point),
    /// Finger/stylus moved while down
    Moved(Point),
    /// Finger/stylus lifted
    Ended,
    /// The platform aborted the gesture (treated like `Ended`)
    Cancelled,
}
