//! constants.rs
//! Fixed strings and unit conversions shared across the estimator.

/// Prefix of every estimate log line. Supervising processes scan child logs
/// for this exact prefix (see `utils::parse_estimate_line`).
pub const LOG_PREFIX: &str = "Estimated time remaining: ";

/// `tracing` target used for estimate and stage-finished lines.
pub const LOG_TARGET: &str = "stitcher";

/// Separator between a finished stage and its measured duration.
pub const STAGE_FINISHED_INFIX: &str = " finished in ";

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const MINUTES_PER_HOUR: i64 = 60;

/// Ratio used whenever a completed stage carries no usable information.
pub const NEUTRAL_RATIO: f64 = 1.0;
