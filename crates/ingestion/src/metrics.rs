//! Ingestion counters shared between sources and the channel bridge

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Positions produced by sources
    pub positions_emitted: AtomicU64,

    /// Positions lost because the downstream channel was full or closed
    pub positions_dropped: AtomicU64,

    /// Trace rows rejected while reading
    pub parse_errors: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record position emitted
    pub fn record_emitted(&self) {
        self.positions_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record position dropped
    pub fn record_dropped(&self) {
        self.positions_dropped.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("spin_input_dropped_total").increment(1);
    }

    /// Record parse error
    pub fn record_parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            positions_emitted: self.positions_emitted.load(Ordering::Relaxed),
            positions_dropped: self.positions_dropped.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub positions_emitted: u64,
    pub positions_dropped: u64,
    pub parse_errors: u64,
}
