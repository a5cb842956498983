//! PointerSource trait - pointer input abstraction
//!
//! Defines a unified interface for pointer position sources, decoupling the
//! tracking session from concrete input implementations (synthetic motion,
//! recorded traces, a real input device bridge).

use std::sync::Arc;

use crate::Position;

/// Pointer data callback type
///
/// Uses `Arc` to allow callback sharing across multiple contexts.
pub type PointerCallback = Arc<dyn Fn(Position) + Send + Sync>;

/// Pointer data source trait
///
/// Sources may deliver positions faster than the session needs them; rate
/// gating is the session's job, not the source's.
///
/// # Example
///
/// ```ignore
/// let source: Box<dyn PointerSource> = get_pointer_source();
/// source.listen(Arc::new(|position| {
///     println!("pointer at {:?}", position);
/// }));
/// // ... use source ...
/// source.stop();
/// ```
pub trait PointerSource: Send + Sync {
    /// Get source ID
    fn source_id(&self) -> &str;

    /// Register data callback
    ///
    /// If already listening, repeated calls are idempotent (won't register multiple callbacks).
    fn listen(&self, callback: PointerCallback);

    /// Stop delivering positions
    ///
    /// After `stop` returns no further callback invocations start.
    fn stop(&self);

    /// Check if currently listening
    fn is_listening(&self) -> bool;
}
