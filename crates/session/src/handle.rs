//! SessionHandle - owns a gesture session running on its own worker task

use std::sync::Arc;

use contracts::{GestureSnapshot, PointerSample, PointerSource, Position, SpinConfig};
use ingestion::{ChannelForwarder, IngestionMetrics, MetricsSnapshot};
use spin_engine::{GestureSession, SessionStats};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Input queue size used by [`SessionHandle::spawn`]
pub const DEFAULT_INPUT_CAPACITY: usize = 256;

/// Final state of a session after shutdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionReport {
    pub snapshot: GestureSnapshot,
    pub stats: SessionStats,
    /// Positions emitted/dropped on the way into the session
    pub input: MetricsSnapshot,
}

/// Aborts the worker if the handle goes away without `shutdown`
struct WorkerGuard(Option<JoinHandle<(GestureSnapshot, SessionStats)>>);

impl WorkerGuard {
    fn take(&mut self) -> Option<JoinHandle<(GestureSnapshot, SessionStats)>> {
        self.0.take()
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if let Some(worker) = self.0.take() {
            worker.abort();
        }
    }
}

/// Stops every attached source when the handle goes away
#[derive(Default)]
struct SourceGuard(Vec<Arc<dyn PointerSource>>);

impl SourceGuard {
    fn push(&mut self, source: Arc<dyn PointerSource>) {
        self.0.push(source);
    }

    fn stop_all(&mut self) {
        for source in self.0.drain(..) {
            source.stop();
            debug!(source_id = %source.source_id(), "pointer source stopped");
        }
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.stop_all();
    }
}

/// Handle to a running session worker
pub struct SessionHandle {
    /// Channel to send positions to the worker
    tx: mpsc::Sender<Position>,
    /// Latest published snapshot
    snapshot_rx: watch::Receiver<GestureSnapshot>,
    /// Graceful stop signal
    shutdown_tx: oneshot::Sender<()>,
    /// Sources wired into `tx`
    sources: SourceGuard,
    /// Counts positions lost at the channel boundary
    input_metrics: Arc<IngestionMetrics>,
    worker: WorkerGuard,
}

impl SessionHandle {
    /// Create a new session and spawn its worker task
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: SpinConfig) -> Self {
        Self::spawn_with_capacity(config, DEFAULT_INPUT_CAPACITY)
    }

    pub fn spawn_with_capacity(config: SpinConfig, input_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(input_capacity.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(GestureSnapshot::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = tokio::spawn(session_worker(config, rx, shutdown_rx, snapshot_tx));

        Self {
            tx,
            snapshot_rx,
            shutdown_tx,
            sources: SourceGuard::default(),
            input_metrics: Arc::new(IngestionMetrics::new()),
            worker: WorkerGuard(Some(worker)),
        }
    }

    /// Sender for feeding positions directly
    ///
    /// Positions are stamped with the session clock when the worker receives them.
    pub fn sender(&self) -> mpsc::Sender<Position> {
        self.tx.clone()
    }

    /// Receiver that observes every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<GestureSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GestureSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Wire a pointer source into the session.
    ///
    /// The source's callback never blocks; positions that do not fit in the
    /// input queue are dropped and counted.
    pub fn attach(&mut self, source: Arc<dyn PointerSource>) {
        let forwarder =
            ChannelForwarder::new(source.source_id(), self.tx.clone(), self.input_metrics.clone());
        source.listen(forwarder.into_callback());
        info!(source_id = %source.source_id(), "pointer source attached");
        self.sources.push(source);
    }

    pub fn input_metrics(&self) -> MetricsSnapshot {
        self.input_metrics.snapshot()
    }

    /// Stop sources, drain queued input, cancel timers and return the final snapshot
    pub async fn shutdown(self) -> GestureSnapshot {
        self.shutdown_with_report().await.snapshot
    }

    #[instrument(name = "session_handle_shutdown", skip(self))]
    pub async fn shutdown_with_report(self) -> SessionReport {
        let SessionHandle {
            tx,
            snapshot_rx,
            shutdown_tx,
            mut sources,
            input_metrics,
            mut worker,
        } = self;

        sources.stop_all();
        drop(tx);
        // Worker may already be gone if it panicked
        let _ = shutdown_tx.send(());

        let (snapshot, stats) = match worker.take() {
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(error = ?e, "session worker failed");
                    (*snapshot_rx.borrow(), SessionStats::default())
                }
            },
            None => (*snapshot_rx.borrow(), SessionStats::default()),
        };

        debug!("SessionHandle shutdown complete");
        SessionReport {
            snapshot,
            stats,
            input: input_metrics.snapshot(),
        }
    }
}

/// Worker task that owns the session and serializes input with timer ticks
#[instrument(name = "session_worker_loop", skip_all)]
async fn session_worker(
    config: SpinConfig,
    mut rx: mpsc::Receiver<Position>,
    mut shutdown_rx: oneshot::Receiver<()>,
    snapshot_tx: watch::Sender<GestureSnapshot>,
) -> (GestureSnapshot, SessionStats) {
    let origin = Instant::now();
    let mut session = GestureSession::new(config);
    debug!("session worker started");

    loop {
        let deadline = session.next_deadline().map(|d| origin + d);

        tokio::select! {
            biased;

            _ = &mut shutdown_rx => {
                // Close the input and settle what already arrived
                rx.close();
                while let Ok(position) = rx.try_recv() {
                    session.offer(PointerSample::new(position, origin.elapsed()));
                }
                break;
            }
            maybe = rx.recv() => match maybe {
                Some(position) => {
                    session.offer(PointerSample::new(position, origin.elapsed()));
                }
                None => break,
            },
            _ = sleep_until_deadline(deadline) => {
                session.advance(origin.elapsed());
                trace!(speed = session.smoother().current_speed(), "timer tick");
            }
        }

        let next = session.snapshot();
        snapshot_tx.send_if_modified(|current| {
            if *current != next {
                *current = next;
                true
            } else {
                false
            }
        });
    }

    let last = session.shutdown();
    snapshot_tx.send_replace(last);
    debug!("session worker stopped");
    (last, session.stats())
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
