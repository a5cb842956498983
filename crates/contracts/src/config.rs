//! Spin tester configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Locale;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete tracker configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Input rate gate
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Speed smoothing
    #[serde(default)]
    pub smoother: SmootherConfig,

    /// Quadrant tracker behaviour
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Presentation settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sample rate gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Minimum gap between two accepted samples in milliseconds
    pub interval_ms: u64,
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { interval_ms: 20 }
    }
}

/// Speed smoother configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Interpolation step fraction, in (0, 1]
    pub damping: f64,
    /// Distance to target below which the value snaps to the target
    pub threshold: f64,
    /// Interval between interpolation steps in milliseconds
    pub tick_ms: u64,
    /// Inactivity delay before speed coasts down to zero, in milliseconds
    pub decay_delay_ms: u64,
}

impl SmootherConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn decay_delay(&self) -> Duration {
        Duration::from_millis(self.decay_delay_ms)
    }
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            damping: 0.1,
            threshold: 0.01,
            tick_ms: 5,
            decay_delay_ms: 50,
        }
    }
}

/// Quadrant tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Also zero the speed whenever the tracker performs a full state reset
    /// (completed revolution or non-clockwise abort)
    pub reset_speed_on_gesture_reset: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            reset_speed_on_gesture_reset: true,
        }
    }
}

/// Presentation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Direction label set
    pub locale: Locale,
}
