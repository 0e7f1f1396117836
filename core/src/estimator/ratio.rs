//! estimator/ratio.rs
//! Adaptive remaining-time computation.
//!
//! The model assumes the pipeline's relative slowness is roughly stable across
//! stages: one averaged actual/baseline ratio scales everything still to run.
//! Stages without usable data count as "baseline was exact" (ratio 1.0), never
//! as a penalty.

use std::collections::BTreeMap;

use crate::baseline::BaselineTable;
use crate::constants::NEUTRAL_RATIO;
use crate::duration::Duration;
use crate::stage::Stage;
use crate::telemetry::StageTimes;

/// Where completed-stage measurements come from.
#[derive(Debug, Clone, Copy)]
pub enum ActualTimes<'a> {
    /// Returned by an installed supplier: ratios are actual / baseline.
    Supplied(&'a StageTimes),
    /// The estimator's own bookkeeping only: completed stages count as exact.
    Recorded(&'a StageTimes),
}

/// Everything `estimate_remaining` reads.
#[derive(Debug, Clone, Copy)]
pub struct EstimateInputs<'a> {
    pub baselines: &'a BaselineTable,
    pub current: Stage,
    pub progress: f64,
    pub manual: Option<Duration>,
    pub actual: ActualTimes<'a>,
}

/// Whether any stage has completed in a way the estimator can see.
pub fn has_actual_data(actual: ActualTimes<'_>, current: Stage) -> bool {
    match actual {
        ActualTimes::Supplied(times) => !times.is_empty(),
        ActualTimes::Recorded(times) => !times.is_empty() || !current.is_initial(),
    }
}

/// actual / baseline when both are strictly positive, else 1.0.
/// A stage missing from the baseline is measured against itself.
pub fn stage_ratio(actual: Duration, baseline: Option<Duration>) -> f64 {
    let baseline = baseline.unwrap_or(actual);
    if !actual.is_positive() {
        return NEUTRAL_RATIO;
    }
    match actual.ratio_to(baseline) {
        Some(ratio) if ratio.is_finite() && ratio > 0.0 => ratio,
        _ => NEUTRAL_RATIO,
    }
}

/// Per-stage ratios for every stage strictly before `current`.
pub fn stage_ratios(
    baselines: &BaselineTable,
    actual: ActualTimes<'_>,
    current: Stage,
) -> BTreeMap<Stage, f64> {
    match actual {
        ActualTimes::Supplied(times) => times
            .iter()
            .filter(|(stage, _)| **stage < current)
            .map(|(stage, elapsed)| (*stage, stage_ratio(*elapsed, baselines.get(*stage))))
            .collect(),
        ActualTimes::Recorded(times) => baselines
            .stages()
            .chain(times.iter().map(|(stage, _)| *stage))
            .filter(|stage| *stage < current)
            .map(|stage| (stage, NEUTRAL_RATIO))
            .collect(),
    }
}

/// Mean of the ratios; 1.0 when empty or when the mean is not a positive number.
pub fn average_ratio(ratios: &BTreeMap<Stage, f64>) -> f64 {
    if ratios.is_empty() {
        return NEUTRAL_RATIO;
    }
    let mean = ratios.values().sum::<f64>() / ratios.len() as f64;
    if mean.is_finite() && mean > 0.0 {
        mean
    } else {
        NEUTRAL_RATIO
    }
}

/// Progress is the caller's responsibility; out-of-range values are clamped, NaN is 0.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Unscaled baseline still to run: current stage scaled by `1 - progress`,
/// later stages in full.
pub fn remaining_baseline(baselines: &BaselineTable, current: Stage, progress: f64) -> Duration {
    let left = 1.0 - clamp_progress(progress);
    baselines
        .iter()
        .filter(|(stage, _)| *stage >= current)
        .map(|(stage, estimate)| if stage == current { estimate * left } else { estimate })
        .sum()
}

pub fn estimate_remaining(inputs: &EstimateInputs<'_>) -> Duration {
    // A supervising process pinned the value.
    if let Some(manual) = inputs.manual.filter(Duration::is_positive) {
        return manual;
    }

    if !has_actual_data(inputs.actual, inputs.current) {
        return inputs.baselines.total();
    }

    let ratio = average_ratio(&stage_ratios(inputs.baselines, inputs.actual, inputs.current));
    remaining_baseline(inputs.baselines, inputs.current, inputs.progress) * ratio
}
