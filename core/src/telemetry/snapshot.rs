//! telemetry/snapshot.rs
//! Immutable view of the estimator for UIs, logs and supervising processes.
//!
//! Design notes:
//! - Taken under one lock so every field describes the same moment.
//! - Durations serialize as `HH:MM:SS.mmm` strings, stages by name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::baseline::ProfileKind;
use crate::duration::Duration;
use crate::stage::Stage;
use crate::telemetry::timers::StageTimes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSnapshot {
    pub stage: Stage,
    pub progress: f64,
    pub profile: ProfileKind,
    pub remaining: Duration,
    pub total: Duration,
    pub ratio: f64,
    pub ratios: BTreeMap<Stage, f64>,
    pub manual_estimate: Option<Duration>,
    pub completed: StageTimes,
}

impl EstimateSnapshot {
    /// Fraction of the baseline total still ahead, in `[0, 1]` for unscaled runs.
    pub fn remaining_fraction(&self) -> f64 {
        self.remaining.ratio_to(self.total).unwrap_or(0.0)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "stage={} progress={:.0}% remaining={} total={} ratio={:.3}",
            self.stage,
            self.progress * 100.0,
            self.remaining,
            self.total,
            self.ratio
        )
    }
}
