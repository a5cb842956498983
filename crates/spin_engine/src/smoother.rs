//! Speed smoother: damped interpolation towards the latest raw speed with
//! inactivity decay.
//!
//! The smoother is poll-based. It never reads a clock: every operation takes
//! the current session time, and [`SpeedSmoother::next_deadline`] tells the
//! host when it next needs to be advanced. This keeps the timing fully
//! deterministic under test.

use std::time::Duration;

use contracts::SmootherConfig;
use tracing::{debug, instrument, trace};

use crate::interpolation::Interpolation;

/// Mutable state owned by a [`SpeedSmoother`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedState {
    current_speed: f64,
    pending_target: f64,
    decay_timer_active: bool,
}

impl SpeedState {
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    /// Target of the most recently started interpolation
    pub fn pending_target(&self) -> f64 {
        self.pending_target
    }

    pub fn decay_timer_active(&self) -> bool {
        self.decay_timer_active
    }
}

/// Externally visible smoother state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmootherPhase {
    Idle,
    Interpolating,
}

#[derive(Debug)]
enum Run {
    Idle,
    Interpolating {
        run: Interpolation,
        next_tick: Duration,
    },
}

/// Smooths raw speed samples.
///
/// Only one interpolation runs at a time: a request that arrives while one is
/// in flight is ignored. The decay timer is re-armed by every sample; when it
/// expires the speed coasts to zero. An expiry that lands while an
/// interpolation is still running is deferred until that run finishes.
#[derive(Debug)]
pub struct SpeedSmoother {
    config: SmootherConfig,
    state: SpeedState,
    run: Run,
    decay_deadline: Option<Duration>,
    /// Time of the last processed event
    clock: Duration,
}

impl SpeedSmoother {
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            config,
            state: SpeedState::default(),
            run: Run::Idle,
            decay_deadline: None,
            clock: Duration::ZERO,
        }
    }

    /// Feed a raw sample: `distance` travelled over `elapsed`.
    ///
    /// Starts an interpolation towards `distance / elapsed_ms` (or zero when
    /// the pointer did not move) and re-arms the decay timer. A zero
    /// `elapsed` carries no speed information and the sample is ignored.
    ///
    /// A decay falling due exactly at `now` loses to the sample: the sample's
    /// target is applied and the decay timer is re-armed from `now`.
    ///
    /// Returns whether a new interpolation was started.
    #[instrument(level = "trace", name = "speed_smoother_push", skip(self))]
    pub fn push_sample(&mut self, distance: f64, elapsed: Duration, now: Duration) -> bool {
        self.settle_before_sample(now);

        if elapsed.is_zero() {
            trace!("zero elapsed time, sample ignored");
            return false;
        }

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let target = if distance > 0.0 {
            distance / elapsed_ms
        } else {
            0.0
        };

        self.decay_deadline = Some(now + self.config.decay_delay());
        self.state.decay_timer_active = true;

        self.start(target, self.config.damping, self.config.threshold, now)
    }

    /// Start interpolating towards `target`.
    ///
    /// No-op (returns `false`) while another interpolation is in flight.
    pub fn interpolate_towards(
        &mut self,
        target: f64,
        damping: f64,
        threshold: f64,
        now: Duration,
    ) -> bool {
        self.advance(now);
        self.start(target, damping, threshold, now)
    }

    fn start(&mut self, target: f64, damping: f64, threshold: f64, at: Duration) -> bool {
        if let Run::Interpolating { run, .. } = &self.run {
            trace!(
                in_flight_target = run.target(),
                requested_target = target,
                "interpolation in flight, request ignored"
            );
            return false;
        }

        self.begin(target, damping, threshold, at);
        self.advance(at);
        true
    }

    fn begin(&mut self, target: f64, damping: f64, threshold: f64, at: Duration) {
        let target = if target.is_finite() { target.max(0.0) } else { 0.0 };
        self.state.pending_target = target;
        self.run = Run::Interpolating {
            run: Interpolation::new(self.state.current_speed, target, damping, threshold),
            next_tick: at,
        };
    }

    /// Process every tick and decay expiry due at or before `now`, in order.
    pub fn advance(&mut self, now: Duration) {
        self.settle(now, true);
    }

    /// Like [`advance`](Self::advance), but a decay that would start exactly
    /// at `now` stays pending for the sample arriving at `now`.
    pub fn settle_before_sample(&mut self, now: Duration) {
        self.settle(now, false);
    }

    fn settle(&mut self, now: Duration, decay_at_now: bool) {
        loop {
            if let Run::Interpolating { run, next_tick } = &mut self.run {
                if *next_tick > now {
                    break;
                }
                let at = *next_tick;
                if let Some(value) = run.next() {
                    self.state.current_speed = value.max(0.0);
                }
                self.clock = self.clock.max(at);

                let finished = run.is_finished();
                if !finished {
                    *next_tick = at + self.config.tick();
                    continue;
                }
                trace!(speed = self.state.current_speed, "interpolation converged");
                self.run = Run::Idle;
                continue;
            }

            match self.decay_deadline {
                Some(deadline) if deadline <= now => {
                    let at = deadline.max(self.clock);
                    if at >= now && !decay_at_now {
                        break;
                    }
                    self.decay_deadline = None;
                    self.state.decay_timer_active = false;
                    debug!(
                        speed = self.state.current_speed,
                        at_ms = at.as_millis() as u64,
                        "no input, decaying speed"
                    );
                    self.begin(0.0, self.config.damping, self.config.threshold, at);
                }
                _ => break,
            }
        }

        self.clock = self.clock.max(now);
    }

    /// Earliest time at which [`advance`](Self::advance) has work to do
    pub fn next_deadline(&self) -> Option<Duration> {
        match &self.run {
            Run::Interpolating { next_tick, .. } => Some(*next_tick),
            Run::Idle => self.decay_deadline,
        }
    }

    pub fn current_speed(&self) -> f64 {
        self.state.current_speed
    }

    pub fn state(&self) -> &SpeedState {
        &self.state
    }

    pub fn phase(&self) -> SmootherPhase {
        match self.run {
            Run::Idle => SmootherPhase::Idle,
            Run::Interpolating { .. } => SmootherPhase::Interpolating,
        }
    }

    pub fn config(&self) -> &SmootherConfig {
        &self.config
    }

    /// Drop to zero speed and forget any running interpolation and decay timer
    pub fn reset(&mut self) {
        self.state = SpeedState::default();
        self.run = Run::Idle;
        self.decay_deadline = None;
    }

    /// Cancel every pending timer, freezing the current speed
    pub fn cancel(&mut self) {
        self.run = Run::Idle;
        self.decay_deadline = None;
        self.state.decay_timer_active = false;
    }
}
