//! Gesture session: one tracking lifetime combining the rate gate, the
//! quadrant tracker and the speed smoother.

use std::time::Duration;

use contracts::{GestureSnapshot, PointerSample, SpinConfig};
use tracing::{debug, info, instrument, trace};

use crate::gate::SampleGate;
use crate::smoother::SpeedSmoother;
use crate::tracker::{Observation, QuadrantTracker, TransitionKind};

/// What happened to an offered sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// Processed by tracker and smoother
    Accepted {
        observation: Observation,
        snapshot: GestureSnapshot,
    },
    /// Rejected by the rate gate (or the session is shut down)
    Dropped,
}

impl SampleOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SampleOutcome::Accepted { .. })
    }
}

/// Per-session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub samples_accepted: u64,
    pub samples_dropped: u64,
    pub indeterminate_transitions: u64,
    pub aborted_attempts: u64,
    pub revolutions: u64,
}

/// A single tracking session.
///
/// Owns its `TrackingState` (inside the [`QuadrantTracker`]) and its
/// `SpeedState` (inside the [`SpeedSmoother`]); nothing else mutates them.
/// Time is supplied by the caller through sample timestamps and
/// [`advance`](Self::advance), so the same session runs in real time under an
/// async driver or instantly over a recorded trace.
///
/// ```
/// use contracts::{PointerSample, SpinConfig};
/// use spin_engine::GestureSession;
///
/// let mut session = GestureSession::new(SpinConfig::default());
/// let path = [(0.0, 0.0), (10.0, 10.0), (0.0, 20.0), (-10.0, 10.0), (0.0, 0.0)];
/// for (i, (x, y)) in path.into_iter().enumerate() {
///     session.offer(PointerSample::at_millis(i as u64 * 20, x, y));
/// }
/// assert_eq!(session.snapshot().revolution_count, 1);
/// ```
#[derive(Debug)]
pub struct GestureSession {
    config: SpinConfig,
    gate: SampleGate,
    tracker: QuadrantTracker,
    smoother: SpeedSmoother,
    last_accepted: Option<PointerSample>,
    now: Duration,
    stats: SessionStats,
    closed: bool,
}

impl GestureSession {
    pub fn new(config: SpinConfig) -> Self {
        info!(
            interval_ms = config.sampler.interval_ms,
            damping = config.smoother.damping,
            decay_delay_ms = config.smoother.decay_delay_ms,
            "gesture session started"
        );

        Self {
            gate: SampleGate::new(config.sampler.interval()),
            tracker: QuadrantTracker::new(),
            smoother: SpeedSmoother::new(config.smoother.clone()),
            last_accepted: None,
            now: Duration::ZERO,
            stats: SessionStats::default(),
            closed: false,
            config,
        }
    }

    /// Offer a sample in arrival order.
    ///
    /// Pending smoother work up to the sample's timestamp is settled first.
    #[instrument(
        level = "trace",
        name = "gesture_session_offer",
        skip(self, sample),
        fields(t_ms = sample.timestamp.as_millis() as u64)
    )]
    pub fn offer(&mut self, sample: PointerSample) -> SampleOutcome {
        if self.closed {
            return SampleOutcome::Dropped;
        }

        // A decay due exactly now yields to this sample.
        self.smoother.settle_before_sample(sample.timestamp);
        self.now = self.now.max(sample.timestamp);

        if !self.gate.try_accept(sample.timestamp) {
            self.stats.samples_dropped += 1;
            metrics::counter!("spin_samples_dropped_total").increment(1);
            trace!("sample dropped by rate gate");
            return SampleOutcome::Dropped;
        }
        self.stats.samples_accepted += 1;
        metrics::counter!("spin_samples_accepted_total").increment(1);

        let observation = self.tracker.observe(sample.position);
        self.record_observation(&observation);

        if observation.is_reset() && self.config.tracker.reset_speed_on_gesture_reset {
            debug!("gesture reset, zeroing speed");
            self.smoother.reset();
        }

        if let Some(previous) = self.last_accepted {
            let distance = previous.position.distance_to(&sample.position);
            let elapsed = sample.timestamp.saturating_sub(previous.timestamp);
            self.smoother.push_sample(distance, elapsed, sample.timestamp);
        }
        self.last_accepted = Some(sample);

        let snapshot = self.snapshot();
        metrics::gauge!("spin_current_speed").set(snapshot.speed);
        metrics::histogram!("spin_speed_hist").record(snapshot.speed);

        SampleOutcome::Accepted {
            observation,
            snapshot,
        }
    }

    fn record_observation(&mut self, observation: &Observation) {
        match observation.kind {
            TransitionKind::Indeterminate => self.stats.indeterminate_transitions += 1,
            TransitionKind::Aborted => {
                self.stats.aborted_attempts += 1;
                metrics::counter!("spin_aborted_attempts_total").increment(1);
            }
            TransitionKind::Completed => {
                self.stats.revolutions += u64::from(observation.revolution_delta);
                metrics::counter!("spin_revolutions_total")
                    .increment(u64::from(observation.revolution_delta));
            }
            TransitionKind::Anchored | TransitionKind::Advanced => {}
        }
    }

    /// Move session time forward, running due interpolation ticks and decay
    pub fn advance(&mut self, now: Duration) {
        if self.closed {
            return;
        }
        self.smoother.advance(now);
        self.now = self.now.max(now);
    }

    /// Next time the session has timer work, if any
    pub fn next_deadline(&self) -> Option<Duration> {
        if self.closed {
            None
        } else {
            self.smoother.next_deadline()
        }
    }

    pub fn snapshot(&self) -> GestureSnapshot {
        let tracking = self.tracker.state();
        GestureSnapshot {
            revolution_count: tracking.revolution_count(),
            speed: self.smoother.current_speed(),
            direction: tracking.direction(),
            quadrant: tracking.quadrant(),
            timestamp_ms: self.now.as_secs_f64() * 1000.0,
        }
    }

    pub fn tracker(&self) -> &QuadrantTracker {
        &self.tracker
    }

    pub fn smoother(&self) -> &SpeedSmoother {
        &self.smoother
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Manual reset: zero the revolution count and speed, keep the clock
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.smoother.reset();
        self.gate.reset();
        self.last_accepted = None;
        debug!("gesture session reset");
    }

    /// End the session, cancelling all pending timers.
    ///
    /// Returns the final snapshot; later calls are no-ops.
    pub fn shutdown(&mut self) -> GestureSnapshot {
        if !self.closed {
            self.smoother.cancel();
            self.closed = true;
            info!(
                revolutions = self.stats.revolutions,
                accepted = self.stats.samples_accepted,
                dropped = self.stats.samples_dropped,
                "gesture session stopped"
            );
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Direction, Quadrant, SmootherConfig, TrackerConfig};

    const CIRCLE: [(f64, f64); 5] = [
        (0.0, 0.0),
        (10.0, 10.0),
        (0.0, 20.0),
        (-10.0, 10.0),
        (0.0, 0.0),
    ];

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn feed_circle(session: &mut GestureSession, start_ms: u64) -> Vec<SampleOutcome> {
        CIRCLE
            .iter()
            .enumerate()
            .map(|(i, (x, y))| {
                session.offer(PointerSample::at_millis(start_ms + i as u64 * 20, *x, *y))
            })
            .collect()
    }

    #[test]
    fn test_circle_quadrants_and_revolution() {
        let mut session = GestureSession::new(SpinConfig::default());
        let outcomes = feed_circle(&mut session, 0);

        let quadrants: Vec<Option<Quadrant>> = outcomes
            .iter()
            .map(|o| match o {
                SampleOutcome::Accepted { observation, .. } => observation.quadrant,
                SampleOutcome::Dropped => panic!("sample dropped"),
            })
            .collect();
        assert_eq!(
            quadrants,
            vec![
                None,
                Some(Quadrant::Q1),
                Some(Quadrant::Q2),
                Some(Quadrant::Q3),
                Some(Quadrant::Q4)
            ]
        );

        let snapshot = session.snapshot();
        assert_eq!(snapshot.revolution_count, 1);
        assert_eq!(snapshot.direction, Direction::Unknown);
        assert_eq!(session.stats().revolutions, 1);
    }

    #[test]
    fn test_speed_non_zero_during_motion_then_decays() {
        let mut session = GestureSession::new(SpinConfig::default());
        let outcomes = feed_circle(&mut session, 0);

        for outcome in &outcomes[1..] {
            if let SampleOutcome::Accepted { snapshot, .. } = outcome {
                assert!(snapshot.speed > 0.0);
            }
        }

        // Still moving shortly after the last sample.
        session.advance(ms(100));
        assert!(session.snapshot().speed > 0.0);

        let mut t = 100;
        while let Some(deadline) = session.next_deadline() {
            t = deadline.as_millis() as u64;
            session.advance(deadline);
            assert!(t < 10_000, "decay did not terminate");
        }
        assert_eq!(session.snapshot().speed, 0.0);
        assert!(t >= 80 + 50, "decay cannot finish before the decay delay");
    }

    #[test]
    fn test_rate_gate_drops_fast_samples() {
        let mut session = GestureSession::new(SpinConfig::default());
        assert!(session.offer(PointerSample::at_millis(0, 0.0, 0.0)).is_accepted());
        assert!(!session.offer(PointerSample::at_millis(5, 1.0, 1.0)).is_accepted());
        assert!(!session.offer(PointerSample::at_millis(19, 2.0, 2.0)).is_accepted());
        assert!(session.offer(PointerSample::at_millis(20, 10.0, 10.0)).is_accepted());

        let stats = session.stats();
        assert_eq!(stats.samples_accepted, 2);
        assert_eq!(stats.samples_dropped, 2);
        // Dropped samples never reach the tracker.
        assert_eq!(session.tracker().state().quadrant(), Some(Quadrant::Q1));
    }

    #[test]
    fn test_elapsed_measured_between_accepted_samples() {
        let config = SpinConfig {
            smoother: SmootherConfig {
                damping: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut session = GestureSession::new(config);
        session.offer(PointerSample::at_millis(0, 0.0, 0.0));
        session.offer(PointerSample::at_millis(10, 50.0, 50.0));
        session.offer(PointerSample::at_millis(40, 30.0, 40.0));

        // (0,0) -> (30,40) over 40 ms
        assert!((session.snapshot().speed - 50.0 / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_abort_keeps_speed_when_reset_disabled() {
        let config = SpinConfig {
            smoother: SmootherConfig {
                damping: 1.0,
                ..Default::default()
            },
            tracker: TrackerConfig {
                reset_speed_on_gesture_reset: false,
            },
            ..Default::default()
        };
        let mut session = GestureSession::new(config);
        session.offer(PointerSample::at_millis(0, 0.0, 0.0));
        session.offer(PointerSample::at_millis(20, 10.0, 10.0));
        // Q1 -> Q3 aborts the attempt
        let outcome = session.offer(PointerSample::at_millis(40, 0.0, 0.0));

        match outcome {
            SampleOutcome::Accepted { observation, snapshot } => {
                assert_eq!(observation.kind, TransitionKind::Aborted);
                assert!(snapshot.speed > 0.0);
            }
            SampleOutcome::Dropped => panic!("sample dropped"),
        }
        assert_eq!(session.stats().aborted_attempts, 1);
    }

    #[test]
    fn test_abort_resets_speed() {
        let mut session = GestureSession::new(SpinConfig::default());
        session.offer(PointerSample::at_millis(0, 0.0, 0.0));
        session.offer(PointerSample::at_millis(20, 10.0, 10.0));
        session.advance(ms(35));
        let before = session.snapshot().speed;
        assert!(before > 0.0);

        // Abort: speed restarts from zero towards the new target.
        session.offer(PointerSample::at_millis(40, 0.0, 0.0));
        let after = session.snapshot().speed;
        assert!(after < before);
        assert!(after > 0.0);
    }

    #[test]
    fn test_revolution_resets_speed() {
        let mut session = GestureSession::new(SpinConfig::default());
        for (i, (x, y)) in CIRCLE[..4].iter().enumerate() {
            session.offer(PointerSample::at_millis(i as u64 * 20, *x, *y));
        }
        let before = session.snapshot().speed;
        session.advance(ms(75));
        let settled = session.snapshot().speed;
        assert!(settled > before);

        let outcome = session.offer(PointerSample::at_millis(80, 0.0, 0.0));
        let SampleOutcome::Accepted { observation, snapshot } = outcome else {
            panic!("sample dropped");
        };
        assert_eq!(observation.kind, TransitionKind::Completed);
        // First damped step from zero towards the chord speed
        let chord = (200.0f64).sqrt() / 20.0;
        assert!((snapshot.speed - 0.1 * chord).abs() < 1e-12);
        assert!(snapshot.speed < settled);
    }

    #[test]
    fn test_sample_on_decay_deadline_updates_speed() {
        let config = SpinConfig {
            smoother: SmootherConfig {
                damping: 0.5,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut session = GestureSession::new(config);
        session.offer(PointerSample::at_millis(0, 0.0, 0.0));
        session.offer(PointerSample::at_millis(20, 10.0, 10.0));
        session.advance(ms(65));
        let settled = session.snapshot().speed;
        assert!((settled - (200.0f64).sqrt() / 20.0).abs() < 1e-12);
        assert_eq!(session.next_deadline(), Some(ms(70)));

        // (10,10) -> (40,50) over 50 ms, right on the decay deadline:
        // the first step heads for 1.0 instead of zero
        session.offer(PointerSample::at_millis(70, 40.0, 50.0));
        assert!((session.snapshot().speed - (settled + 1.0) / 2.0).abs() < 1e-12);
        assert!((session.smoother().state().pending_target() - 1.0).abs() < 1e-12);
        assert_eq!(session.next_deadline(), Some(ms(75)));
    }

    #[test]
    fn test_shutdown_cancels_timers() {
        let mut session = GestureSession::new(SpinConfig::default());
        feed_circle(&mut session, 0);
        assert!(session.next_deadline().is_some());

        let last = session.shutdown();
        assert!(session.is_closed());
        assert_eq!(session.next_deadline(), None);
        assert!(!session.offer(PointerSample::at_millis(500, 1.0, 1.0)).is_accepted());

        session.advance(ms(10_000));
        assert_eq!(session.snapshot().speed, last.speed);
    }

    #[test]
    fn test_manual_reset() {
        let mut session = GestureSession::new(SpinConfig::default());
        feed_circle(&mut session, 0);
        session.reset();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.revolution_count, 0);
        assert_eq!(snapshot.speed, 0.0);
        assert_eq!(session.next_deadline(), None);
    }
}
