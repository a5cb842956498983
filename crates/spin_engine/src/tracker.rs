//! Quadrant tracker: clockwise validation and revolution counting.

use contracts::{Direction, Position, Quadrant};
use tracing::{debug, instrument, trace};

use crate::quadrant::{determine_quadrant, VisitedQuadrants};

/// How a single observed position affected the tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// No previous position: stored as the anchor of a new attempt
    Anchored,
    /// Axis-aligned or zero displacement: only the anchor moved
    Indeterminate,
    /// Clockwise-consistent quadrant visit
    Advanced,
    /// Fourth quadrant visited: one revolution completed, state reset
    Completed,
    /// Counter-clockwise or skipped quadrant: attempt aborted, state reset
    Aborted,
}

/// Result of [`QuadrantTracker::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Direction after processing the position
    pub direction: Direction,
    /// Quadrant of this transition, if determinate
    pub quadrant: Option<Quadrant>,
    /// Revolutions completed by this position (0 or 1)
    pub revolution_delta: u32,
    pub kind: TransitionKind,
}

impl Observation {
    fn new(kind: TransitionKind, direction: Direction, quadrant: Option<Quadrant>) -> Self {
        Self {
            direction,
            quadrant,
            revolution_delta: u32::from(kind == TransitionKind::Completed),
            kind,
        }
    }

    /// Whether this position ended the current attempt (revolution or abort)
    pub fn is_reset(&self) -> bool {
        matches!(self.kind, TransitionKind::Completed | TransitionKind::Aborted)
    }
}

/// Mutable state owned by a [`QuadrantTracker`].
///
/// `visited` only grows within one attempt and is emptied when a revolution
/// completes or a non-clockwise transition is seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingState {
    visited: VisitedQuadrants,
    last_position: Option<Position>,
    revolution_count: u64,
    direction: Direction,
    quadrant: Option<Quadrant>,
}

impl TrackingState {
    pub fn visited_quadrants(&self) -> VisitedQuadrants {
        self.visited
    }

    pub fn last_position(&self) -> Option<Position> {
        self.last_position
    }

    pub fn revolution_count(&self) -> u64 {
        self.revolution_count
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn quadrant(&self) -> Option<Quadrant> {
        self.quadrant
    }

    /// Abort the current attempt, keeping the revolution count
    fn clear_attempt(&mut self) {
        self.visited.clear();
        self.last_position = None;
        self.direction = Direction::Unknown;
        self.quadrant = None;
    }
}

/// Detects sustained clockwise motion across the four quadrants.
///
/// Clockwise validity is checked locally on every transition, without angle
/// tracking: a newly visited quadrant must follow a visited predecessor (or
/// open the attempt) and its successor must still be unvisited. Re-visiting
/// the current quadrant is tolerated.
///
/// # Example
///
/// ```
/// use contracts::Position;
/// use spin_engine::QuadrantTracker;
///
/// let mut tracker = QuadrantTracker::new();
/// for (x, y) in [(0.0, 0.0), (10.0, 10.0), (0.0, 20.0), (-10.0, 10.0), (0.0, 0.0)] {
///     tracker.observe(Position::new(x, y));
/// }
/// assert_eq!(tracker.revolution_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuadrantTracker {
    state: TrackingState,
}

impl QuadrantTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next accepted position
    #[instrument(level = "trace", name = "quadrant_tracker_observe", skip(self))]
    pub fn observe(&mut self, position: Position) -> Observation {
        let Some(last) = self.state.last_position else {
            self.state.last_position = Some(position);
            return Observation::new(TransitionKind::Anchored, Direction::Unknown, None);
        };

        let Some(quadrant) = determine_quadrant(&last, &position) else {
            self.state.last_position = Some(position);
            trace!("indeterminate transition");
            return Observation::new(
                TransitionKind::Indeterminate,
                self.state.direction,
                None,
            );
        };

        self.state.direction = Direction::from(quadrant);
        self.state.quadrant = Some(quadrant);
        self.state.visited.insert(quadrant);

        if self.state.visited.is_complete() {
            self.state.revolution_count += 1;
            self.state.clear_attempt();
            debug!(
                revolution_count = self.state.revolution_count,
                "revolution completed"
            );
            return Observation::new(TransitionKind::Completed, Direction::Unknown, Some(quadrant));
        }

        if !self.is_clockwise(quadrant) {
            debug!(
                %quadrant,
                visited = ?self.state.visited.iter().collect::<Vec<_>>(),
                "non-clockwise transition, attempt aborted"
            );
            self.state.clear_attempt();
            return Observation::new(TransitionKind::Aborted, Direction::Unknown, Some(quadrant));
        }

        self.state.last_position = Some(position);
        Observation::new(TransitionKind::Advanced, self.state.direction, Some(quadrant))
    }

    /// `quadrant` has already been marked visited.
    fn is_clockwise(&self, quadrant: Quadrant) -> bool {
        let visited = &self.state.visited;
        let opens_attempt = visited.len() == 1;
        let predecessor_ok = opens_attempt || visited.contains(quadrant.prev());
        let successor_free = !visited.contains(quadrant.next());

        predecessor_ok && successor_free && !visited.is_complete()
    }

    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn revolution_count(&self) -> u64 {
        self.state.revolution_count
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    /// Manual reset, including the revolution count
    pub fn reset(&mut self) {
        self.state = TrackingState::default();
    }
}
