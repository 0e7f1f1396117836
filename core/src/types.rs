use std::io;

use thiserror::Error;

use crate::duration::DurationParseError;

/// Unified crate error covering parsing, lookup and configuration loading.
/// - `From<T>` impls enable `?` across config loading and bindings.
/// - None of these ever reach pipeline control flow: estimates are advisory.
#[derive(Debug, Error)]
pub enum EtaError {
    /// Malformed `HH:MM:SS.mmm` text.
    #[error("duration error: {0}")]
    Duration(#[from] DurationParseError),

    /// Stage name that is not part of the pipeline.
    #[error("unknown stage: {0:?}")]
    UnknownStage(String),

    /// Profile name outside the closed set of baseline profiles.
    #[error("unknown profile: {0:?}")]
    UnknownProfile(String),

    /// Semantically invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading a configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration document is not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
