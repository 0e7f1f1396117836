//! telemetry/timers.rs
//! Stopwatch and per-stage measured times.
//!
//! Summary: `Stopwatch` measures one start/stop cycle with the monotonic clock;
//! `StageTimes` keeps the measured duration of each completed stage.

use std::collections::{btree_map, BTreeMap};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::stage::Stage;

/// Start/stop wall-clock measurement. No pause/resume: each cycle is a fresh start.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    start_time: Option<Instant>,
    stop_time: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a cycle and forget the previous stop.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.stop_time = None;
    }

    /// Record the end of the cycle. Calling it again re-measures from the same start.
    pub fn stop(&mut self) {
        self.stop_time = Some(Instant::now());
    }

    /// `stop - start`; zero unless both calls happened.
    pub fn elapsed(&self) -> Duration {
        match (self.start_time, self.stop_time) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start).into(),
            _ => Duration::ZERO,
        }
    }

    pub fn str(&self) -> String {
        self.elapsed().str(true)
    }
}

/// Measured duration per completed stage, in stage order.
///
/// Grows monotonically: a stage that is recorded twice keeps its first measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageTimes {
    times: BTreeMap<Stage, Duration>,
}

impl StageTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stage measurement. Returns false when the stage was already recorded.
    pub fn record(&mut self, stage: Stage, dur: Duration) -> bool {
        match self.times.entry(stage) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(dur);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Merge another set of measurements; existing entries win.
    pub fn merge(&mut self, other: &StageTimes) {
        for (stage, dur) in other {
            self.record(*stage, *dur);
        }
    }

    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.times.get(&stage).copied()
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.times.contains_key(&stage)
    }

    /// Sum all stage durations.
    pub fn total(&self) -> Duration {
        self.times.values().sum()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stage, &Duration)> {
        self.times.iter()
    }
}

impl FromIterator<(Stage, Duration)> for StageTimes {
    /// First occurrence of a stage wins, as with `record`.
    fn from_iter<I: IntoIterator<Item = (Stage, Duration)>>(iter: I) -> Self {
        let mut times = StageTimes::new();
        for (stage, dur) in iter {
            times.record(stage, dur);
        }
        times
    }
}

/// Allow iteration over owned StageTimes.
impl IntoIterator for StageTimes {
    type Item = (Stage, Duration);
    type IntoIter = btree_map::IntoIter<Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.into_iter()
    }
}

/// Allow iteration over borrowed StageTimes.
impl<'a> IntoIterator for &'a StageTimes {
    type Item = (&'a Stage, &'a Duration);
    type IntoIter = btree_map::Iter<'a, Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}
