//! # Ingestion
//!
//! Pointer input collaborators.
//!
//! Responsibilities:
//! - Synthetic pointer motion for tests and demos (`MockPointerSource`)
//! - Reading recorded traces from JSON / JSONL / CSV (`TraceReader`)
//! - Bridging callback-based sources into a bounded channel (`ChannelForwarder`)
//!
//! ## Mock Testing
//!
//! ```ignore
//! use ingestion::MockPointerSource;
//! use std::time::Duration;
//!
//! let source = MockPointerSource::circle("demo", 100.0, Duration::from_millis(800), true, 60.0);
//! let mut rx = source.start(64)?;
//! while let Some(position) = rx.recv().await {
//!     // feed the session
//! }
//! ```

mod bridge;
mod error;
mod metrics;
mod mock;
mod trace;

// Re-exports
pub use bridge::ChannelForwarder;
pub use error::{IngestionError, Result};
pub use metrics::{IngestionMetrics, MetricsSnapshot};
pub use mock::{MockPath, MockPointerConfig, MockPointerSource};
pub use trace::{TraceFormat, TraceReader, TraceRecord};
