//! # Spin Engine
//!
//! Clockwise pointer-gesture classifier.
//!
//! 负责：
//! - 象限划分与顺时针校验 (`QuadrantTracker`)
//! - 圈数统计
//! - 阻尼插值速度平滑与无输入衰减 (`SpeedSmoother`)
//! - 采样限速 (`SampleGate`)
//!
//! Everything here is synchronous and clock-free: time enters only through
//! sample timestamps and explicit `advance` calls.
//!
//! ## 使用示例
//!
//! ```
//! use spin_engine::{GestureSession, PointerSample, SampleOutcome, SpinConfig};
//!
//! let mut session = GestureSession::new(SpinConfig::default());
//!
//! // Offer samples as they arrive
//! let sample = PointerSample::at_millis(0, 10.0, 10.0);
//! if let SampleOutcome::Accepted { snapshot, .. } = session.offer(sample) {
//!     println!("{} revolutions", snapshot.revolution_count);
//! }
//!
//! // Between samples, wake up at the next deadline
//! if let Some(deadline) = session.next_deadline() {
//!     session.advance(deadline);
//! }
//! ```

mod gate;
mod interpolation;
mod quadrant;
mod session;
mod smoother;
mod tracker;

pub use gate::SampleGate;
pub use interpolation::{lerp, Interpolation, MIN_DAMPING, MIN_THRESHOLD};
pub use quadrant::{determine_quadrant, VisitedQuadrants};
pub use session::{GestureSession, SampleOutcome, SessionStats};
pub use smoother::{SmootherPhase, SpeedSmoother, SpeedState};
pub use tracker::{Observation, QuadrantTracker, TrackingState, TransitionKind};

// Re-export contracts types
pub use contracts::{
    Direction, GestureSnapshot, PointerSample, Position, Quadrant, SmootherConfig, SpinConfig,
};
