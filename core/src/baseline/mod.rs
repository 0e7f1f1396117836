//! baseline/mod.rs
//! Baseline stage durations and the profile selectors producing them.

pub mod profiles;
pub mod selector;
pub mod types;

pub use profiles::builtin_table;
pub use selector::*;
pub use types::*;
