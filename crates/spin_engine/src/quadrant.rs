//! Quadrant classification of pointer transitions.

use contracts::{Position, Quadrant};

/// Classify the transition `from → to` by the signs of its displacement.
///
/// Returns `None` when the transition is indeterminate: either axis did not
/// move (`dx == 0` or `dy == 0`), or a coordinate is NaN.
pub fn determine_quadrant(from: &Position, to: &Position) -> Option<Quadrant> {
    let (dx, dy) = from.displacement_to(to);

    if dx > 0.0 && dy > 0.0 {
        Some(Quadrant::Q1)
    } else if dx < 0.0 && dy > 0.0 {
        Some(Quadrant::Q2)
    } else if dx < 0.0 && dy < 0.0 {
        Some(Quadrant::Q3)
    } else if dx > 0.0 && dy < 0.0 {
        Some(Quadrant::Q4)
    } else {
        None
    }
}

/// Set of quadrants visited during one revolution attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitedQuadrants(u8);

impl VisitedQuadrants {
    #[inline]
    fn bit(quadrant: Quadrant) -> u8 {
        1 << quadrant.index()
    }

    /// Mark `quadrant` visited
    #[inline]
    pub fn insert(&mut self, quadrant: Quadrant) {
        self.0 |= Self::bit(quadrant);
    }

    #[inline]
    pub fn contains(&self, quadrant: Quadrant) -> bool {
        self.0 & Self::bit(quadrant) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.len() == Quadrant::ALL.len()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Visited quadrants in clockwise order
    pub fn iter(&self) -> impl Iterator<Item = Quadrant> + '_ {
        Quadrant::ALL.into_iter().filter(|q| self.contains(*q))
    }
}
