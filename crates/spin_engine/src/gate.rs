//! Sample rate gate.

use std::time::Duration;

/// Accepts at most one sample per `interval`.
///
/// Samples arriving sooner than `interval` after the previously accepted one
/// are dropped, never queued. Samples with a timestamp earlier than the last
/// accepted one are dropped as well.
#[derive(Debug, Clone)]
pub struct SampleGate {
    interval: Duration,
    last_accepted: Option<Duration>,
}

impl SampleGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Returns whether a sample stamped `now` may be processed, and if so
    /// re-arms the gate from `now`.
    pub fn try_accept(&mut self, now: Duration) -> bool {
        let open = match self.last_accepted {
            None => true,
            Some(last) => now >= last && now - last >= self.interval,
        };

        if open {
            self.last_accepted = Some(now);
        }
        open
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_accepted(&self) -> Option<Duration> {
        self.last_accepted
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
