//! duration/types.rs
//! Millisecond-resolution time span used for baselines, measurements and estimates.
//!
//! Design notes:
//! - Stored as a signed count of milliseconds; arithmetic saturates instead of panicking.
//! - Scalar multiplication/division truncates toward zero at millisecond granularity.
//! - Text form is `HH:MM:SS.mmm` with unbounded hours (see `duration::parse`).

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{
    MINUTES_PER_HOUR, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, SECONDS_PER_MINUTE,
};
use crate::duration::parse::{parse_duration, DurationParseError};

/// Immutable span of time with millisecond resolution.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    ms: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { ms: 0 };

    pub const fn from_hours(hours: i64) -> Self {
        Self { ms: hours.saturating_mul(MS_PER_HOUR) }
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self { ms: minutes.saturating_mul(MS_PER_MINUTE) }
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self { ms: seconds.saturating_mul(MS_PER_SECOND) }
    }

    pub const fn from_milliseconds(milliseconds: i64) -> Self {
        Self { ms: milliseconds }
    }

    /// Build a span from its `(hours, minutes, seconds, milliseconds)` components.
    pub fn from_values(hours: i64, minutes: i64, seconds: i64, milliseconds: i64) -> Self {
        Self::from_hours(hours)
            + Self::from_minutes(minutes)
            + Self::from_seconds(seconds)
            + Self::from_milliseconds(milliseconds)
    }

    /// Parse the `HH:MM:SS[.mmm]` text form.
    pub fn parse(text: &str) -> Result<Self, DurationParseError> {
        parse_duration(text)
    }

    /// Total milliseconds.
    pub const fn as_millis(&self) -> i64 {
        self.ms
    }

    pub const fn is_zero(&self) -> bool {
        self.ms == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.ms > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.ms < 0
    }

    /// Hours have no parent unit: both forms return the total hour count.
    pub fn hours(&self, _remainder_only: bool) -> i64 {
        self.ms / MS_PER_HOUR
    }

    /// Minutes; `remainder_only` keeps only the 0–59 part below the hour.
    pub fn minutes(&self, remainder_only: bool) -> i64 {
        let total = self.ms / MS_PER_MINUTE;
        if remainder_only {
            total % MINUTES_PER_HOUR
        } else {
            total
        }
    }

    /// Seconds; `remainder_only` keeps only the 0–59 part below the minute.
    pub fn seconds(&self, remainder_only: bool) -> i64 {
        let total = self.ms / MS_PER_SECOND;
        if remainder_only {
            total % SECONDS_PER_MINUTE
        } else {
            total
        }
    }

    /// Milliseconds; `remainder_only` keeps only the 0–999 part below the second.
    pub fn milliseconds(&self, remainder_only: bool) -> i64 {
        if remainder_only {
            self.ms % MS_PER_SECOND
        } else {
            self.ms
        }
    }

    /// Render as `HH:MM:SS.mmm`, or `HH:MM:SS` without milliseconds.
    pub fn str(&self, include_milliseconds: bool) -> String {
        let sign = if self.ms < 0 { "-" } else { "" };
        let abs = self.ms.unsigned_abs();
        let ms_per_hour = MS_PER_HOUR as u64;
        let ms_per_minute = MS_PER_MINUTE as u64;
        let ms_per_second = MS_PER_SECOND as u64;

        let hours = abs / ms_per_hour;
        let minutes = (abs % ms_per_hour) / ms_per_minute;
        let seconds = (abs % ms_per_minute) / ms_per_second;
        let millis = abs % ms_per_second;

        if include_milliseconds {
            format!("{sign}{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
        } else {
            format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
        }
    }

    /// `self / other` as a plain ratio, or `None` when `other` is not positive.
    pub fn ratio_to(&self, other: Duration) -> Option<f64> {
        if other.is_positive() {
            Some(*self / other)
        } else {
            None
        }
    }

    /// Convert to `std::time::Duration`; negative spans have no std counterpart.
    pub fn to_std(&self) -> Option<std::time::Duration> {
        u64::try_from(self.ms).ok().map(std::time::Duration::from_millis)
    }
}

impl From<std::time::Duration> for Duration {
    fn from(d: std::time::Duration) -> Self {
        Self { ms: i64::try_from(d.as_millis()).unwrap_or(i64::MAX) }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str(true))
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration { ms: self.ms.saturating_add(rhs.ms) }
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration { ms: self.ms.saturating_sub(rhs.ms) }
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Duration) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;

    /// Truncates toward zero; `as` saturates on overflow and maps NaN to zero.
    fn mul(self, rhs: f64) -> Duration {
        Duration { ms: (self.ms as f64 * rhs) as i64 }
    }
}

impl MulAssign<f64> for Duration {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Div<f64> for Duration {
    type Output = Duration;

    fn div(self, rhs: f64) -> Duration {
        Duration { ms: (self.ms as f64 / rhs) as i64 }
    }
}

impl DivAssign<f64> for Duration {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl Div for Duration {
    type Output = f64;

    fn div(self, rhs: Duration) -> f64 {
        self.ms as f64 / rhs.ms as f64
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Self {
        iter.fold(Duration::ZERO, |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Duration> for Duration {
    fn sum<I: Iterator<Item = &'a Duration>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
