//! telemetry/mod.rs
//! Stage timing and immutable estimate snapshots.
//!
//! - `timers`: stopwatch cycles and the measured time of each completed stage
//! - `snapshot`: serializable view of an estimator at one moment

pub mod snapshot;
pub mod timers;

pub use snapshot::*;
pub use timers::*;
