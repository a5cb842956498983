//! Position & PointerSample - input collaborator output
//!
//! Raw pointer positions as delivered by an input source.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A 2D point in a consistent coordinate space (e.g. page coordinates).
///
/// Immutable once captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement `(dx, dy)` from `self` to `other`
    #[inline]
    pub fn displacement_to(&self, other: &Position) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    /// Euclidean distance to `other`
    #[inline]
    pub fn distance_to(&self, other: &Position) -> f64 {
        let (dx, dy) = self.displacement_to(other);
        dx.hypot(dy)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A position stamped with the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Pointer position
    pub position: Position,

    /// Time since session start
    pub timestamp: Duration,
}

impl PointerSample {
    /// Create a sample at `timestamp`
    pub fn new(position: Position, timestamp: Duration) -> Self {
        Self {
            position,
            timestamp,
        }
    }

    /// Create a sample from a millisecond timestamp and raw coordinates
    pub fn at_millis(t_ms: u64, x: f64, y: f64) -> Self {
        Self::new(Position::new(x, y), Duration::from_millis(t_ms))
    }
}
