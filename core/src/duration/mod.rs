//! duration/mod.rs
//! Millisecond time spans and their `HH:MM:SS.mmm` text form.

pub mod parse;
pub mod types;

pub use parse::*;
pub use types::*;
