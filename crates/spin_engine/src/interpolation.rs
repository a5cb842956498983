//! Damped linear interpolation as a lazy, finite sequence.

use std::iter::FusedIterator;

/// Smallest damping accepted; lower values are clamped so a run always converges.
pub const MIN_DAMPING: f64 = 1e-6;

/// Smallest snap threshold accepted.
pub const MIN_THRESHOLD: f64 = 1e-9;

/// Linear interpolation between `start` and `end` by `amt`
#[inline]
pub fn lerp(start: f64, end: f64, amt: f64) -> f64 {
    (1.0 - amt) * start + amt * end
}

/// One interpolation run from a start value towards a target.
///
/// Every call to `next` applies `current = (1 - damping) * current + damping * target`.
/// Once the result lies within `threshold` of the target the run yields the
/// target itself and ends. The run cannot be restarted; a new target needs a
/// new `Interpolation`.
///
/// ```
/// use spin_engine::Interpolation;
///
/// let values: Vec<f64> = Interpolation::new(0.0, 10.0, 0.5, 0.01).collect();
/// assert_eq!(values.last(), Some(&10.0));
/// assert!(values.windows(2).all(|w| w[0] < w[1]));
/// ```
#[derive(Debug, Clone)]
pub struct Interpolation {
    current: f64,
    target: f64,
    damping: f64,
    threshold: f64,
    finished: bool,
}

impl Interpolation {
    /// `damping` is clamped into `[MIN_DAMPING, 1]`, `threshold` to at least `MIN_THRESHOLD`.
    pub fn new(start: f64, target: f64, damping: f64, threshold: f64) -> Self {
        let damping = if damping.is_finite() {
            damping.clamp(MIN_DAMPING, 1.0)
        } else {
            1.0
        };
        let threshold = if threshold.is_finite() {
            threshold.max(MIN_THRESHOLD)
        } else {
            MIN_THRESHOLD
        };

        Self {
            current: start,
            target,
            damping,
            threshold,
            finished: false,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for Interpolation {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.finished {
            return None;
        }

        let value = lerp(self.current, self.target, self.damping);

        // A step that no longer moves the value has stalled in floating point.
        if (value - self.target).abs() < self.threshold || value == self.current {
            self.current = self.target;
            self.finished = true;
        } else {
            self.current = value;
        }

        Some(self.current)
    }
}

impl FusedIterator for Interpolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert!((lerp(0.0, 10.0, 0.1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_convergence_bounds() {
        let values: Vec<f64> = Interpolation::new(0.0, 10.0, 0.1, 0.01).collect();

        // 0.9^n * 10 < 0.01  =>  n = 66
        assert_eq!(values.len(), 66);
        assert_eq!(*values.last().unwrap(), 10.0);
        assert!(values.windows(2).all(|w| w[0] < w[1]), "strictly increasing");
        assert!(values.iter().all(|v| *v > 0.0 && *v <= 10.0));
    }

    #[test]
    fn test_decreasing_towards_zero() {
        let values: Vec<f64> = Interpolation::new(5.0, 0.0, 0.1, 0.01).collect();

        assert_eq!(*values.last().unwrap(), 0.0);
        assert!(values.windows(2).all(|w| w[0] > w[1]));
        assert!(values.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_full_damping_is_single_step() {
        let values: Vec<f64> = Interpolation::new(3.0, 7.0, 1.0, 0.01).collect();
        assert_eq!(values, vec![7.0]);
    }

    #[test]
    fn test_already_at_target() {
        let values: Vec<f64> = Interpolation::new(2.0, 2.0, 0.1, 0.01).collect();
        assert_eq!(values, vec![2.0]);
    }

    #[test]
    fn test_fused_after_completion() {
        let mut run = Interpolation::new(0.0, 1.0, 1.0, 0.01);
        assert_eq!(run.next(), Some(1.0));
        assert!(run.is_finished());
        assert_eq!(run.next(), None);
        assert_eq!(run.next(), None);
    }

    #[test]
    fn test_out_of_range_parameters_still_terminate() {
        let mut slow = Interpolation::new(0.0, 1.0, 0.0, 0.01);
        assert!(slow.next().unwrap() > 0.0);
        assert_eq!(Interpolation::new(0.0, 1.0, f64::NAN, 0.01).count(), 1);
        // Tiny threshold on a large value: terminates via the stall check.
        let values: Vec<f64> = Interpolation::new(0.0, 1e12, 0.5, 0.0).collect();
        assert_eq!(*values.last().unwrap(), 1e12);
    }
}
