//! duration/parse.rs
//! Parser for the `HH:MM:SS[.mmm]` duration text form.
//!
//! Grammar:
//! - optional leading `-`
//! - hours: two or more digits (unbounded, never wrapped at 24)
//! - `:` minutes: exactly two digits, below 60
//! - `:` seconds: exactly two digits, below 60
//! - optional `.` followed by one or more digits, read as a millisecond count
//!   (more than three digits are kept, not truncated)

use thiserror::Error;

use crate::constants::{MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::duration::types::Duration;

/// Malformed duration text. Always a caller integration bug, never silently zero.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("duration text is empty")]
    Empty,

    #[error("malformed duration {input:?}: {reason}")]
    Malformed { input: String, reason: &'static str },

    #[error("{field} value {value} out of range in {input:?}")]
    OutOfRange {
        input: String,
        field: &'static str,
        value: i64,
    },

    #[error("duration {input:?} does not fit in 64-bit milliseconds")]
    Overflow { input: String },
}

fn malformed(input: &str, reason: &'static str) -> DurationParseError {
    DurationParseError::Malformed { input: input.to_string(), reason }
}

fn digits(input: &str, segment: &str, reason: &'static str) -> Result<i64, DurationParseError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(input, reason));
    }
    segment
        .parse::<i64>()
        .map_err(|_| DurationParseError::Overflow { input: input.to_string() })
}

pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    if input.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (clock, fraction) = match body.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (body, None),
    };

    let mut parts = clock.split(':');
    let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        _ => return Err(malformed(input, "expected HH:MM:SS")),
    };

    if hours.len() < 2 {
        return Err(malformed(input, "hours need at least two digits"));
    }
    if minutes.len() != 2 {
        return Err(malformed(input, "minutes need exactly two digits"));
    }
    if seconds.len() != 2 {
        return Err(malformed(input, "seconds need exactly two digits"));
    }

    let hours = digits(input, hours, "hours are not numeric")?;
    let minutes = digits(input, minutes, "minutes are not numeric")?;
    let seconds = digits(input, seconds, "seconds are not numeric")?;
    let millis = match fraction {
        Some(f) => digits(input, f, "milliseconds are not numeric")?,
        None => 0,
    };

    if minutes >= 60 {
        return Err(DurationParseError::OutOfRange {
            input: input.to_string(),
            field: "minutes",
            value: minutes,
        });
    }
    if seconds >= 60 {
        return Err(DurationParseError::OutOfRange {
            input: input.to_string(),
            field: "seconds",
            value: seconds,
        });
    }

    // Magnitude is summed wide so `i64::MIN` survives negation.
    let magnitude = i128::from(hours) * i128::from(MS_PER_HOUR)
        + i128::from(minutes) * i128::from(MS_PER_MINUTE)
        + i128::from(seconds) * i128::from(MS_PER_SECOND)
        + i128::from(millis);
    let signed = if negative { -magnitude } else { magnitude };

    i64::try_from(signed)
        .map(Duration::from_milliseconds)
        .map_err(|_| DurationParseError::Overflow { input: input.to_string() })
}
