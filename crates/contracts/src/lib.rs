//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the spin tester.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Coordinate & Time Model
//! - Positions are 2D points in one consistent space (page coordinates for a pointer)
//! - Sample timestamps are `Duration`s measured from the start of a tracking session
//! - Speeds are expressed in position units per millisecond

mod config;
mod error;
mod geometry;
mod gesture;
mod pointer_source;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use gesture::*;
pub use pointer_source::{PointerCallback, PointerSource};
