//! Callback → channel bridge
//!
//! Sources deliver positions through a synchronous callback; the session
//! consumes an `mpsc` channel. The bridge never blocks the source: when the
//! channel is full the position is dropped and counted.

use std::sync::Arc;

use contracts::{PointerCallback, Position};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{trace, warn};

use crate::error::{IngestionError, Result};
use crate::metrics::IngestionMetrics;

/// Forwards positions of one source into a bounded channel
#[derive(Debug, Clone)]
pub struct ChannelForwarder {
    source_id: String,
    tx: mpsc::Sender<Position>,
    metrics: Arc<IngestionMetrics>,
}

impl ChannelForwarder {
    pub fn new(
        source_id: impl Into<String>,
        tx: mpsc::Sender<Position>,
        metrics: Arc<IngestionMetrics>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            tx,
            metrics,
        }
    }

    /// Try to forward one position.
    ///
    /// Returns `Ok(false)` when the channel is full and the position was dropped.
    ///
    /// # Errors
    /// [`IngestionError::ChannelClosed`] once the receiving side is gone.
    pub fn forward(&self, position: Position) -> Result<bool> {
        match self.tx.try_send(position) {
            Ok(()) => {
                trace!(source_id = %self.source_id, "position forwarded");
                Ok(true)
            }
            Err(TrySendError::Full(_)) => {
                self.metrics.record_dropped();
                warn!(source_id = %self.source_id, "input channel full, position dropped");
                Ok(false)
            }
            Err(TrySendError::Closed(_)) => {
                self.metrics.record_dropped();
                Err(IngestionError::ChannelClosed {
                    source_id: self.source_id.clone(),
                })
            }
        }
    }

    /// Wrap into a [`PointerCallback`] suitable for `PointerSource::listen`
    pub fn into_callback(self) -> PointerCallback {
        Arc::new(move |position| {
            if let Err(e) = self.forward(position) {
                trace!(error = %e, "position discarded");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forward_until_full() {
        let (tx, mut rx) = mpsc::channel(2);
        let metrics = Arc::new(IngestionMetrics::new());
        let forwarder = ChannelForwarder::new("src", tx, metrics.clone());

        assert!(forwarder.forward(Position::new(1.0, 1.0)).unwrap());
        assert!(forwarder.forward(Position::new(2.0, 2.0)).unwrap());
        assert!(!forwarder.forward(Position::new(3.0, 3.0)).unwrap());
        assert_eq!(metrics.snapshot().positions_dropped, 1);

        assert_eq!(rx.recv().await, Some(Position::new(1.0, 1.0)));
        assert_eq!(rx.recv().await, Some(Position::new(2.0, 2.0)));
    }

    #[tokio::test]
    async fn test_forward_after_close() {
        let (tx, rx) = mpsc::channel(2);
        drop(rx);
        let forwarder = ChannelForwarder::new("src", tx, Arc::new(IngestionMetrics::new()));

        let err = forwarder.forward(Position::default()).unwrap_err();
        assert!(matches!(err, IngestionError::ChannelClosed { ref source_id } if source_id == "src"));
    }

    #[tokio::test]
    async fn test_callback_forwards() {
        let (tx, mut rx) = mpsc::channel(4);
        let callback =
            ChannelForwarder::new("src", tx, Arc::new(IngestionMetrics::new())).into_callback();

        callback(Position::new(4.0, 2.0));
        assert_eq!(rx.recv().await, Some(Position::new(4.0, 2.0)));
    }
}
