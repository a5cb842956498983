//! Run summaries and snapshot printing shared by `simulate` and `replay`.

use std::time::Duration;

use anyhow::{Context, Result};
use contracts::{GestureSnapshot, Locale};
use observability::{MetricsSummary, SessionMetricsAggregator};
use serde::Serialize;

/// Statistics from a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// `simulate` or `replay`
    pub mode: &'static str,

    /// Session time covered by the run
    pub duration_ms: f64,

    /// Snapshot after shutdown
    pub final_snapshot: GestureSnapshot,

    /// Final direction in the configured locale
    pub direction_label: String,

    pub samples_accepted: u64,
    pub samples_dropped: u64,
    pub drop_rate: f64,
    pub revolutions: u64,
    pub aborted_attempts: u64,
    pub indeterminate_transitions: u64,
    pub speed_mean: f64,
    pub speed_max: f64,

    /// Positions lost before reaching the session (live runs only)
    pub input_dropped: u64,

    #[serde(skip)]
    summary: MetricsSummary,
}

impl RunReport {
    pub fn new(
        mode: &'static str,
        duration: Duration,
        final_snapshot: GestureSnapshot,
        locale: Locale,
        metrics: &SessionMetricsAggregator,
        input_dropped: u64,
    ) -> Self {
        let summary = metrics.summary();
        Self {
            mode,
            duration_ms: duration.as_secs_f64() * 1000.0,
            direction_label: final_snapshot.direction.label(locale).to_string(),
            final_snapshot,
            samples_accepted: summary.samples_accepted,
            samples_dropped: summary.samples_dropped,
            drop_rate: summary.drop_rate,
            revolutions: summary.revolutions,
            aborted_attempts: summary.aborted_attempts,
            indeterminate_transitions: summary.indeterminate_transitions,
            speed_mean: summary.speed.mean,
            speed_max: summary.speed.max,
            input_dropped,
            summary,
        }
    }

    /// Revolutions per second over the run
    pub fn revolutions_per_sec(&self) -> f64 {
        if self.duration_ms > 0.0 {
            self.final_snapshot.revolution_count as f64 / (self.duration_ms / 1000.0)
        } else {
            0.0
        }
    }

    /// Print as pretty JSON or as a human readable block
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            let out = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
            println!("{}", out);
        } else {
            self.print_summary();
        }
        Ok(())
    }

    fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Spin Statistics                         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Mode: {}", self.mode);
        println!("   ├─ Duration: {:.1} ms", self.duration_ms);
        println!("   ├─ Revolutions: {}", self.final_snapshot.revolution_count);
        println!("   ├─ Revolutions/s: {:.2}", self.revolutions_per_sec());
        println!("   ├─ Final speed: {:.4} units/ms", self.final_snapshot.speed);
        println!("   ├─ Final direction: {}", self.direction_label);
        println!("   └─ Input dropped before session: {}", self.input_dropped);

        println!("\n{}", self.summary);
    }
}

/// Prints snapshots whose count, direction or quadrant differ from the last printed one
#[derive(Debug, Default)]
pub struct SnapshotPrinter {
    last: Option<GestureSnapshot>,
    locale: Locale,
    json: bool,
}

impl SnapshotPrinter {
    pub fn new(locale: Locale, json: bool) -> Self {
        Self {
            last: None,
            locale,
            json,
        }
    }

    /// Returns whether the snapshot was printed
    pub fn offer(&mut self, snapshot: &GestureSnapshot) -> Result<bool> {
        if let Some(last) = &self.last {
            if last.revolution_count == snapshot.revolution_count
                && last.direction == snapshot.direction
                && last.quadrant == snapshot.quadrant
            {
                return Ok(false);
            }
        }
        self.last = Some(*snapshot);

        if self.json {
            let line = serde_json::to_string(snapshot).context("Failed to serialize snapshot")?;
            println!("{}", line);
        } else {
            println!(
                "[{:>9.1} ms] revolutions={:<4} direction={:<12} speed={:.4}",
                snapshot.timestamp_ms,
                snapshot.revolution_count,
                snapshot.direction.label(self.locale),
                snapshot.speed
            );
        }
        Ok(true)
    }
}
