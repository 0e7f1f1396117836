//! estimator/types.rs
//! Collaborator hooks and the state behind the shared estimator handle.

use std::sync::Arc;

use crate::baseline::{BaselineTable, ProfileKind, ProfileSelector};
use crate::duration::Duration;
use crate::estimator::ratio::{estimate_remaining, ActualTimes, EstimateInputs};
use crate::stage::Stage;
use crate::telemetry::StageTimes;

/// Zero-argument notification fired after every applied mutation.
pub type Observer = Arc<dyn Fn() + Send + Sync>;

/// Pull-based source of measured stage times.
pub type ActualTimesSupplier = Arc<dyn Fn() -> StageTimes + Send + Sync>;

pub(crate) struct EstimatorState {
    pub(crate) enabled: bool,
    pub(crate) log_enabled: bool,
    pub(crate) current_stage: Stage,
    pub(crate) progress: f64,
    pub(crate) manual_estimate: Option<Duration>,
    pub(crate) profile: ProfileKind,
    pub(crate) baselines: BaselineTable,
    pub(crate) recorded: StageTimes,
    pub(crate) last_estimate: Duration,
    pub(crate) selector: Arc<dyn ProfileSelector>,
    pub(crate) supplier: Option<ActualTimesSupplier>,
    pub(crate) observers: Vec<Observer>,
}

impl EstimatorState {
    pub(crate) fn new(
        selector: Arc<dyn ProfileSelector>,
        profile: ProfileKind,
        enabled: bool,
        log_enabled: bool,
    ) -> Self {
        let baselines = selector.select(profile);
        let last_estimate = baselines.total();
        Self {
            enabled: enabled || log_enabled,
            log_enabled,
            current_stage: Stage::FIRST,
            progress: 0.0,
            manual_estimate: None,
            profile,
            baselines,
            recorded: StageTimes::new(),
            last_estimate,
            selector,
            supplier: None,
            observers: Vec::new(),
        }
    }

    /// Supplied times win over the estimator's own bookkeeping.
    pub(crate) fn actual_times<'a>(&'a self, supplied: Option<&'a StageTimes>) -> ActualTimes<'a> {
        match supplied {
            Some(times) => ActualTimes::Supplied(times),
            None => ActualTimes::Recorded(&self.recorded),
        }
    }

    pub(crate) fn inputs<'a>(&'a self, supplied: Option<&'a StageTimes>) -> EstimateInputs<'a> {
        EstimateInputs {
            baselines: &self.baselines,
            current: self.current_stage,
            progress: self.progress,
            manual: self.manual_estimate,
            actual: self.actual_times(supplied),
        }
    }

    pub(crate) fn compute(&self, supplied: Option<&StageTimes>) -> Duration {
        estimate_remaining(&self.inputs(supplied))
    }
}
