//! `simulate` command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ingestion::MockPointerSource;
use observability::{record_snapshot, SessionMetricsAggregator};
use session::SessionHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use super::load_config;
use crate::cli::SimulateArgs;
use crate::error::CliError;
use crate::report::{RunReport, SnapshotPrinter};

/// Execute the `simulate` command
pub async fn run_simulate(args: &SimulateArgs) -> Result<()> {
    check_args(args)?;
    let config = load_config(args.config.as_deref())?;
    let locale = config.output.locale;

    info!(
        radius = args.radius,
        period_ms = args.period_ms,
        clockwise = !args.counter_clockwise,
        rate_hz = args.rate_hz,
        duration_ms = args.duration_ms,
        "Starting simulation"
    );

    let mut handle = SessionHandle::spawn_with_capacity(config, args.buffer_size);
    let source = Arc::new(MockPointerSource::circle(
        "simulated_pointer",
        args.radius,
        Duration::from_millis(args.period_ms),
        !args.counter_clockwise,
        args.rate_hz,
    ));
    handle.attach(source);

    let mut updates = handle.subscribe();
    let mut printer = SnapshotPrinter::new(locale, args.json);
    let mut metrics = SessionMetricsAggregator::new();
    let started = Instant::now();

    let run_for = run_timer(args.duration_ms);
    tokio::pin!(run_for);
    let shutdown_signal = setup_shutdown_signal();
    tokio::pin!(shutdown_signal);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    warn!("Session worker stopped unexpectedly");
                    break;
                }
                let snapshot = *updates.borrow_and_update();
                record_snapshot(&snapshot);
                metrics.observe_speed(snapshot.speed);
                printer.offer(&snapshot)?;
            }
            _ = &mut run_for => {
                info!("Simulation duration reached");
                break;
            }
            _ = &mut shutdown_signal => {
                warn!("Received shutdown signal, stopping simulation...");
                break;
            }
        }
    }

    let report = handle.shutdown_with_report().await;
    metrics.absorb_session_stats(&report.stats);

    info!(
        revolutions = report.snapshot.revolution_count,
        accepted = report.stats.samples_accepted,
        dropped = report.stats.samples_dropped,
        "Simulation finished"
    );

    RunReport::new(
        "simulate",
        started.elapsed(),
        report.snapshot,
        locale,
        &metrics,
        report.input.positions_dropped,
    )
    .print(args.json)
}

fn check_args(args: &SimulateArgs) -> Result<()> {
    if !(args.radius.is_finite() && args.radius > 0.0) {
        return Err(CliError::invalid_argument("radius", "must be a positive number").into());
    }
    if args.period_ms == 0 {
        return Err(CliError::invalid_argument("period-ms", "must be > 0").into());
    }
    if !(args.rate_hz.is_finite() && args.rate_hz > 0.0) {
        return Err(CliError::invalid_argument("rate-hz", "must be a positive number").into());
    }
    Ok(())
}

/// Completes after `duration_ms`, or never when it is 0
async fn run_timer(duration_ms: u64) {
    if duration_ms == 0 {
        std::future::pending::<()>().await;
    } else {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
