use crate::constants::{LOG_PREFIX, STAGE_FINISHED_INFIX};
use crate::duration::{Duration, DurationParseError};
use crate::stage::Stage;

/// Line emitted on every estimate change: `Estimated time remaining: HH:MM:SS.mmm`.
pub fn estimate_log_line(estimate: Duration) -> String {
    format!("{LOG_PREFIX}{}", estimate.str(true))
}

/// Line emitted when the monitor closes a stage: `<Stage> finished in HH:MM:SS.mmm`.
pub fn stage_finished_line(stage: Stage, elapsed: Duration) -> String {
    format!("{stage}{STAGE_FINISHED_INFIX}{}", elapsed.str(true))
}

/// Find an estimate line inside arbitrary log output.
///
/// Returns `None` when the line carries no estimate, `Some(Err(..))` when the
/// prefix is present but the duration is malformed. Anything after the first
/// whitespace following the duration is ignored, so decorated loggers still work.
pub fn parse_estimate_line(line: &str) -> Option<Result<Duration, DurationParseError>> {
    let (_, rest) = line.split_once(LOG_PREFIX)?;
    let token = rest.split_whitespace().next().unwrap_or("");
    Some(Duration::parse(token))
}
