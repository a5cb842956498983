//! `replay` command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use contracts::{GestureSnapshot, PointerSample, SpinConfig};
use ingestion::TraceReader;
use observability::SessionMetricsAggregator;
use spin_engine::{GestureSession, SampleOutcome};
use tracing::{debug, info};

use super::load_config;
use crate::cli::ReplayArgs;
use crate::error::CliError;
use crate::report::{RunReport, SnapshotPrinter};

/// Result of driving a session over a recorded trace
struct ReplayOutcome {
    final_snapshot: GestureSnapshot,
    metrics: SessionMetricsAggregator,
    duration: Duration,
}

/// Execute the `replay` command
pub fn run_replay(args: &ReplayArgs) -> Result<()> {
    if !args.trace.exists() {
        return Err(CliError::trace_not_found(args.trace.display().to_string()).into());
    }
    let config = load_config(args.config.as_deref())?;
    let locale = config.output.locale;

    let samples = TraceReader::new()
        .read_path(&args.trace)
        .with_context(|| format!("Failed to read trace from {}", args.trace.display()))?;
    info!(
        trace = %args.trace.display(),
        samples = samples.len(),
        "Replaying trace"
    );

    let mut printer = SnapshotPrinter::new(locale, args.json);
    let outcome = replay_samples(
        config,
        &samples,
        args.settle_ms.map(Duration::from_millis),
        |snapshot| printer.offer(snapshot).map(|_| ()),
    )?;

    RunReport::new(
        "replay",
        outcome.duration,
        outcome.final_snapshot,
        locale,
        &outcome.metrics,
        0,
    )
    .print(args.json)
}

/// Feed `samples` in order, then let timers run for `settle` (or until idle).
fn replay_samples(
    config: SpinConfig,
    samples: &[PointerSample],
    settle: Option<Duration>,
    mut on_snapshot: impl FnMut(&GestureSnapshot) -> Result<()>,
) -> Result<ReplayOutcome> {
    let mut session = GestureSession::new(config);
    let mut metrics = SessionMetricsAggregator::new();

    for sample in samples {
        let outcome = session.offer(*sample);
        metrics.update(&outcome);
        if let SampleOutcome::Accepted { snapshot, .. } = outcome {
            on_snapshot(&snapshot)?;
        }
    }

    let end = settle.map(|settle| session.now() + settle);
    while let Some(deadline) = session.next_deadline() {
        if end.is_some_and(|end| deadline > end) {
            break;
        }
        session.advance(deadline);
        metrics.observe_speed(session.smoother().current_speed());
    }
    if let Some(end) = end {
        session.advance(end);
    }
    debug!(now_ms = session.now().as_millis() as u64, "replay settled");

    let final_snapshot = session.shutdown();
    on_snapshot(&final_snapshot)?;

    Ok(ReplayOutcome {
        final_snapshot,
        metrics,
        duration: session.now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn square_trace() -> Vec<PointerSample> {
        [
            (0, 0.0, 0.0),
            (20, 10.0, 10.0),
            (40, 0.0, 20.0),
            (60, -10.0, 10.0),
            (80, 0.0, 0.0),
        ]
        .into_iter()
        .map(|(t, x, y)| PointerSample::at_millis(t, x, y))
        .collect()
    }

    #[test]
    fn test_replay_counts_and_settles() {
        let mut seen = 0;
        let outcome = replay_samples(SpinConfig::default(), &square_trace(), None, |_| {
            seen += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(outcome.final_snapshot.revolution_count, 1);
        assert_eq!(outcome.final_snapshot.speed, 0.0);
        assert_eq!(outcome.metrics.samples_accepted, 5);
        assert!(outcome.duration > Duration::from_millis(130));
        // five accepted samples plus the final snapshot
        assert_eq!(seen, 6);
    }

    #[test]
    fn test_replay_bounded_settle() {
        let outcome =
            replay_samples(SpinConfig::default(), &square_trace(), Some(Duration::ZERO), |_| Ok(()))
                .unwrap();

        assert_eq!(outcome.duration, Duration::from_millis(80));
        assert!(outcome.final_snapshot.speed > 0.0);
    }

    #[test]
    fn test_run_replay_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "t_ms,x,y").unwrap();
        for sample in square_trace() {
            writeln!(
                file,
                "{},{},{}",
                sample.timestamp.as_millis(),
                sample.position.x,
                sample.position.y
            )
            .unwrap();
        }

        let args = ReplayArgs {
            trace: file.path().to_path_buf(),
            config: None,
            settle_ms: Some(500),
            json: true,
        };
        run_replay(&args).unwrap();
    }

    #[test]
    fn test_missing_trace() {
        let args = ReplayArgs {
            trace: PathBuf::from("/nonexistent/trace.csv"),
            config: None,
            settle_ms: None,
            json: false,
        };
        let err = run_replay(&args).unwrap_err();
        assert!(err.to_string().contains("Trace file not found"));
    }
}
