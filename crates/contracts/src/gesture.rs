//! Quadrant, Direction & GestureSnapshot - tracker output
//!
//! The read-only view handed to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of four sign-based zones of displacement between two consecutive samples.
///
/// | quadrant | dx  | dy  |
/// |----------|-----|-----|
/// | Q1       | > 0 | > 0 |
/// | Q2       | < 0 | > 0 |
/// | Q3       | < 0 | < 0 |
/// | Q4       | > 0 | < 0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quadrant {
    /// All quadrants in clockwise order
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Zero-based index (Q1 = 0)
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Quadrant::Q1 => 0,
            Quadrant::Q2 => 1,
            Quadrant::Q3 => 2,
            Quadrant::Q4 => 3,
        }
    }

    /// Clockwise successor
    #[inline]
    pub const fn next(self) -> Quadrant {
        match self {
            Quadrant::Q1 => Quadrant::Q2,
            Quadrant::Q2 => Quadrant::Q3,
            Quadrant::Q3 => Quadrant::Q4,
            Quadrant::Q4 => Quadrant::Q1,
        }
    }

    /// Clockwise predecessor
    #[inline]
    pub const fn prev(self) -> Quadrant {
        match self {
            Quadrant::Q1 => Quadrant::Q4,
            Quadrant::Q2 => Quadrant::Q1,
            Quadrant::Q3 => Quadrant::Q2,
            Quadrant::Q4 => Quadrant::Q3,
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.index() + 1)
    }
}

/// Coarse compass direction of the most recent valid transition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    UpRight,
    DownRight,
    DownLeft,
    UpLeft,
    #[default]
    Unknown,
}

impl Direction {
    /// Human-readable label in the requested locale
    pub fn label(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => match self {
                Direction::UpRight => "upper-right",
                Direction::DownRight => "lower-right",
                Direction::DownLeft => "lower-left",
                Direction::UpLeft => "upper-left",
                Direction::Unknown => "unknown",
            },
            Locale::Zh => match self {
                Direction::UpRight => "右上",
                Direction::DownRight => "右下",
                Direction::DownLeft => "左下",
                Direction::UpLeft => "左上",
                Direction::Unknown => "未知",
            },
        }
    }
}

impl From<Quadrant> for Direction {
    fn from(quadrant: Quadrant) -> Self {
        match quadrant {
            Quadrant::Q1 => Direction::UpRight,
            Quadrant::Q2 => Direction::DownRight,
            Quadrant::Q3 => Direction::DownLeft,
            Quadrant::Q4 => Direction::UpLeft,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Locale::En))
    }
}

/// Label set used when rendering directions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

/// Read-only observation of a tracking session.
///
/// Published after every processed sample and every smoother tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureSnapshot {
    /// Completed revolutions, non-decreasing for the lifetime of a session
    pub revolution_count: u64,

    /// Smoothed speed (units per millisecond), never negative
    pub speed: f64,

    /// Current direction label
    pub direction: Direction,

    /// Quadrant of the most recent valid transition
    pub quadrant: Option<Quadrant>,

    /// Session time of the observation (milliseconds)
    pub timestamp_ms: f64,
}
