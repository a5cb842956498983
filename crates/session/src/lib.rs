//! # Session
//!
//! Async runtime around [`spin_engine::GestureSession`].
//!
//! A single worker task owns the session. Positions arrive through an
//! `mpsc` channel, smoother timers are driven by `sleep_until` on the
//! session's next deadline, and every change is published on a `watch`
//! channel. Input handling and timer ticks therefore never interleave.
//!
//! ```ignore
//! let mut handle = SessionHandle::spawn(SpinConfig::default());
//! handle.attach(Arc::new(MockPointerSource::new(MockPointerConfig::default())));
//!
//! let mut updates = handle.subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("{:?}", *updates.borrow());
//! }
//! let report = handle.shutdown_with_report().await;
//! ```

mod handle;

pub use handle::{SessionHandle, SessionReport, DEFAULT_INPUT_CAPACITY};
