//! estimator/core.rs
//! Shared, adaptive remaining-time estimator.
//!
//! Design notes:
//! - `Estimator` is a cheap-clone handle over one shared state: a monitor, a
//!   supervising process and a UI can hold the same estimator.
//! - Single writer at a time: every call takes the lock for its own duration.
//!   Suppliers, selectors and observers always run with the lock released, so
//!   an observer may query the estimator it is observing.
//! - Disabled estimators ignore every mutation and answer queries with the last
//!   computed value, so a pipeline can create one unconditionally.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::baseline::{BaselineTable, BuiltinProfiles, ProfileKind, ProfileSelector};
use crate::constants::LOG_TARGET;
use crate::duration::{Duration, DurationParseError};
use crate::estimator::ratio::{average_ratio, stage_ratios};
use crate::estimator::types::{EstimatorState, Observer};
use crate::stage::Stage;
use crate::telemetry::{EstimateSnapshot, StageTimes};
use crate::utils::{estimate_log_line, parse_estimate_line};

#[derive(Clone)]
pub struct Estimator {
    state: Arc<Mutex<EstimatorState>>,
}

/// Builder for [`Estimator`]; defaults to the built-in profiles, enabled, logging off.
pub struct EstimatorBuilder {
    profile: ProfileKind,
    selector: Arc<dyn ProfileSelector>,
    enabled: bool,
    log_enabled: bool,
}

impl Default for EstimatorBuilder {
    fn default() -> Self {
        Self {
            profile: ProfileKind::Unknown,
            selector: Arc::new(BuiltinProfiles),
            enabled: true,
            log_enabled: false,
        }
    }
}

impl EstimatorBuilder {
    pub fn profile(mut self, profile: ProfileKind) -> Self {
        self.profile = profile;
        self
    }

    pub fn selector(mut self, selector: impl ProfileSelector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// Use one table regardless of profile.
    pub fn baselines(self, table: BaselineTable) -> Self {
        self.selector(crate::baseline::FixedTable(table))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Logging implies enabled.
    pub fn log_enabled(mut self, log_enabled: bool) -> Self {
        self.log_enabled = log_enabled;
        self
    }

    pub fn build(self) -> Estimator {
        Estimator {
            state: Arc::new(Mutex::new(EstimatorState::new(
                self.selector,
                self.profile,
                self.enabled,
                self.log_enabled,
            ))),
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Estimator::builder().build()
    }
}

impl fmt::Debug for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Estimator")
            .field("enabled", &state.enabled)
            .field("log_enabled", &state.log_enabled)
            .field("stage", &state.current_stage)
            .field("progress", &state.progress)
            .field("profile", &state.profile)
            .field("manual_estimate", &state.manual_estimate)
            .field("observers", &state.observers.len())
            .finish()
    }
}

impl Estimator {
    pub fn builder() -> EstimatorBuilder {
        EstimatorBuilder::default()
    }

    /// Enabled estimator over the built-in tables for `profile`.
    pub fn new(profile: ProfileKind) -> Self {
        Estimator::builder().profile(profile).build()
    }

    /// A panicking observer must not take the estimate down with it.
    fn state(&self) -> MutexGuard<'_, EstimatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the state together with freshly supplied times.
    /// The supplier is called before the lock is taken.
    fn with_actual_times<R>(&self, f: impl FnOnce(&mut EstimatorState, Option<&StageTimes>) -> R) -> R {
        let supplier = self.state().supplier.clone();
        let supplied = supplier.map(|supply| supply());
        let mut state = self.state();
        f(&mut *state, supplied.as_ref())
    }

    // -------------------------------------------------------------------------
    // Toggles
    // -------------------------------------------------------------------------

    pub fn enable(&self) {
        self.state().enabled = true;
    }

    /// Freezes the current estimate; logging goes off with it.
    pub fn disable(&self) {
        let frozen = self.estimated_time_remaining();
        let mut state = self.state();
        state.last_estimate = frozen;
        state.enabled = false;
        state.log_enabled = false;
    }

    pub fn enable_log(&self) {
        let mut state = self.state();
        state.log_enabled = true;
        state.enabled = true;
    }

    pub fn disable_log(&self) {
        self.state().log_enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    pub fn is_log_enabled(&self) -> bool {
        self.state().log_enabled
    }

    // -------------------------------------------------------------------------
    // Collaborators
    // -------------------------------------------------------------------------

    /// Install the pull-based source of measured stage times.
    pub fn set_actual_times_supplier<F>(&self, supplier: F)
    where
        F: Fn() -> StageTimes + Send + Sync + 'static,
    {
        self.state().supplier = Some(Arc::new(supplier));
    }

    pub fn clear_actual_times_supplier(&self) {
        self.state().supplier = None;
    }

    pub fn has_actual_times_supplier(&self) -> bool {
        self.state().supplier.is_some()
    }

    pub fn add_observer<F>(&self, observer: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state().observers.push(Arc::new(observer));
    }

    pub fn clear_observers(&self) {
        self.state().observers.clear();
    }

    /// The profile became known (or changed); applied at the next stage change.
    pub fn set_profile(&self, profile: ProfileKind) {
        let mut state = self.state();
        if state.enabled {
            state.profile = profile;
        }
    }

    // -------------------------------------------------------------------------
    // Pipeline signals
    // -------------------------------------------------------------------------

    pub fn change_stage(&self, stage: Stage) {
        self.change_stage_with_times(stage, &StageTimes::new())
    }

    /// Stage change carrying measurements of the stages completed so far.
    pub fn change_stage_with_times(&self, stage: Stage, times: &StageTimes) {
        let (selector, profile) = {
            let state = self.state();
            if !state.enabled {
                return;
            }
            (state.selector.clone(), state.profile)
        };
        let baselines = selector.select(profile);

        {
            let mut state = self.state();
            if stage < state.current_stage {
                warn!(
                    target: LOG_TARGET,
                    from = %state.current_stage,
                    to = %stage,
                    "stage moved backwards; earlier measurements are kept"
                );
            }
            state.recorded.merge(times);
            state.progress = 0.0;
            state.current_stage = stage;
            state.baselines = baselines;
        }
        debug!(target: LOG_TARGET, %stage, %profile, "stage changed");

        self.log();
        self.notify();
    }

    /// Fraction of the current stage already done, nominally in `[0, 1]`.
    pub fn update_progress(&self, fraction: f64) {
        {
            let mut state = self.state();
            if !state.enabled {
                return;
            }
            state.progress = fraction;
        }
        self.log();
        self.notify();
    }

    /// Record a measured stage time without publishing; the next stage change publishes.
    pub fn record_stage_time(&self, stage: Stage, elapsed: Duration) {
        let mut state = self.state();
        if state.enabled {
            state.recorded.record(stage, elapsed);
        }
    }

    // -------------------------------------------------------------------------
    // Manual override
    // -------------------------------------------------------------------------

    /// Pin the estimate to an externally known value (`HH:MM:SS.mmm`).
    pub fn set_manual_estimate(&self, formatted: &str) -> Result<(), DurationParseError> {
        let estimate = Duration::parse(formatted)?;
        self.set_manual_estimate_duration(estimate);
        Ok(())
    }

    /// A non-positive value leaves the computed estimate in charge.
    pub fn set_manual_estimate_duration(&self, estimate: Duration) {
        {
            let mut state = self.state();
            if !state.enabled {
                return;
            }
            state.manual_estimate = Some(estimate);
        }
        self.notify();
    }

    pub fn clear_manual_estimate(&self) {
        {
            let mut state = self.state();
            if !state.enabled || state.manual_estimate.is_none() {
                return;
            }
            state.manual_estimate = None;
        }
        self.notify();
    }

    pub fn manual_estimate(&self) -> Option<Duration> {
        self.state().manual_estimate
    }

    /// Relay an estimate found in a nested pipeline's log output.
    /// Returns `Ok(false)` when the line carries no estimate.
    pub fn apply_estimate_line(&self, line: &str) -> Result<bool, DurationParseError> {
        match parse_estimate_line(line) {
            None => Ok(false),
            Some(parsed) => {
                self.set_manual_estimate_duration(parsed?);
                Ok(true)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn estimated_time_remaining(&self) -> Duration {
        {
            let state = self.state();
            if !state.enabled {
                return state.last_estimate;
            }
        }
        self.with_actual_times(|state, supplied| {
            let estimate = state.compute(supplied);
            state.last_estimate = estimate;
            estimate
        })
    }

    pub fn current_estimate(&self) -> Duration {
        self.estimated_time_remaining()
    }

    /// Sum of the current baseline table.
    pub fn estimated_time_total(&self) -> Duration {
        self.state().baselines.total()
    }

    /// actual / baseline for each completed stage.
    pub fn elapsed_to_estimate_ratios(&self) -> BTreeMap<Stage, f64> {
        self.with_actual_times(|state, supplied| {
            stage_ratios(&state.baselines, state.actual_times(supplied), state.current_stage)
        })
    }

    /// Averaged correction ratio applied to the remaining baseline.
    pub fn elapsed_to_estimate_ratio(&self) -> f64 {
        average_ratio(&self.elapsed_to_estimate_ratios())
    }

    pub fn current_stage(&self) -> Stage {
        self.state().current_stage
    }

    pub fn progress(&self) -> f64 {
        self.state().progress
    }

    pub fn profile(&self) -> ProfileKind {
        self.state().profile
    }

    pub fn baselines(&self) -> BaselineTable {
        self.state().baselines.clone()
    }

    /// Measurements fed in by a monitor.
    pub fn recorded_times(&self) -> StageTimes {
        self.state().recorded.clone()
    }

    pub fn snapshot(&self) -> EstimateSnapshot {
        let enabled = self.is_enabled();
        self.with_actual_times(|state, supplied| {
            let ratios = stage_ratios(&state.baselines, state.actual_times(supplied), state.current_stage);
            let remaining = if enabled { state.compute(supplied) } else { state.last_estimate };
            EstimateSnapshot {
                stage: state.current_stage,
                progress: state.progress,
                profile: state.profile,
                remaining,
                total: state.baselines.total(),
                ratio: average_ratio(&ratios),
                ratios,
                manual_estimate: state.manual_estimate,
                completed: supplied.cloned().unwrap_or_else(|| state.recorded.clone()),
            }
        })
    }

    // -------------------------------------------------------------------------
    // Publishing
    // -------------------------------------------------------------------------

    fn log(&self) {
        if !self.is_log_enabled() {
            return;
        }
        let line = estimate_log_line(self.estimated_time_remaining());
        info!(target: LOG_TARGET, "{}", line);
    }

    fn notify(&self) {
        let observers: Vec<Observer> = self.state().observers.clone();
        for observer in observers {
            observer();
        }
    }
}
