//! estimator/mod.rs
//! Adaptive remaining-time estimation.
//!
//! - `ratio`: the pure algorithm (ratio correction over the remaining baseline)
//! - `core`: the shared estimator handle driven by the pipeline
//! - `types`: observer/supplier hooks

pub mod core;
pub mod ratio;
pub mod types;

pub use self::core::{Estimator, EstimatorBuilder};
pub use ratio::{estimate_remaining, ActualTimes, EstimateInputs};
pub use types::{ActualTimesSupplier, Observer};
