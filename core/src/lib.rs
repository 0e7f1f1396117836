//! eta-core
//!
//! Adaptive remaining-time estimation for staged pipelines.
//! No Python, no PyO3, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;
pub mod utils;

// Value types
pub mod duration;
pub mod stage;
pub mod telemetry;

// Estimation
pub mod baseline;
pub mod estimator;
pub mod monitor;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::baseline::{BaselineTable, BuiltinProfiles, ConfiguredProfiles, FixedTable, ProfileKind, ProfileSelector};
    pub use crate::config::{EstimatorConfig, MonitorConfig, PipelineConfig};
    pub use crate::duration::{Duration, DurationParseError};
    pub use crate::estimator::{Estimator, EstimatorBuilder};
    pub use crate::monitor::Monitor;
    pub use crate::stage::Stage;
    pub use crate::telemetry::{EstimateSnapshot, StageTimes, Stopwatch};
    pub use crate::types::EtaError;
    pub use crate::utils::{estimate_log_line, parse_estimate_line};
}
