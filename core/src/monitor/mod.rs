//! monitor/mod.rs
//! Stage timing driver wrapped around a shared estimator.

pub mod core;

pub use self::core::Monitor;
