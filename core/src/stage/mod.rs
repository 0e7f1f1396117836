//! stage/mod.rs
//! Closed, ordinal-ordered set of pipeline stages.

pub mod types;

pub use types::*;
