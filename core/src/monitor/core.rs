//! monitor/core.rs
//! Times each pipeline stage and keeps the shared estimator in step.
//!
//! Summary: on every stage change the monitor stops its stopwatch, records the
//! elapsed time against the stage that just finished, forwards the transition
//! to the estimator and starts a fresh stopwatch cycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::config::MonitorConfig;
use crate::constants::LOG_TARGET;
use crate::estimator::Estimator;
use crate::stage::Stage;
use crate::telemetry::{StageTimes, Stopwatch};
use crate::utils::stage_finished_line;

/// Owns the stopwatch and the accumulated stage times; shares the estimator.
///
/// Its enable/log toggles are independent of the estimator's: a disabled monitor
/// leaves an estimator that is driven by another source untouched.
#[derive(Debug)]
pub struct Monitor {
    estimator: Estimator,
    stopwatch: Stopwatch,
    stage_times: Arc<Mutex<StageTimes>>,
    current: Option<Stage>,
    enabled: bool,
    log_enabled: bool,
}

impl Monitor {
    /// Enabled monitor, logging off.
    pub fn new(estimator: Estimator) -> Self {
        Self::with_flags(estimator, true, false)
    }

    /// Logging implies enabled.
    pub fn with_flags(estimator: Estimator, enabled: bool, log_enabled: bool) -> Self {
        Self {
            estimator,
            stopwatch: Stopwatch::new(),
            stage_times: Arc::new(Mutex::new(StageTimes::new())),
            current: None,
            enabled: enabled || log_enabled,
            log_enabled,
        }
    }

    pub fn from_config(estimator: Estimator, config: &MonitorConfig) -> Self {
        Self::with_flags(estimator, config.enabled, config.log_enabled)
    }

    fn times(&self) -> MutexGuard<'_, StageTimes> {
        self.stage_times.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn change_stage(&mut self, stage: Stage) {
        if !self.enabled {
            return;
        }

        // Time is charged to the stage that was running, even when the driver skipped some.
        let finished = match self.current {
            Some(running) if running < stage => Some(running),
            Some(running) => {
                debug!(target: LOG_TARGET, from = %running, to = %stage, "stage re-entered; nothing measured");
                None
            }
            None => stage.previous(),
        };

        if let Some(finished) = finished {
            self.stopwatch.stop();
            let elapsed = self.stopwatch.elapsed();

            if self.times().record(finished, elapsed) {
                if self.log_enabled {
                    info!(target: LOG_TARGET, "{}", stage_finished_line(finished, elapsed));
                }
            } else {
                debug!(target: LOG_TARGET, stage = %finished, "stage already measured; keeping first measurement");
            }
        }

        let times = self.stage_times();
        self.estimator.change_stage_with_times(stage, &times);
        self.current = Some(stage);
        self.stopwatch.start();
    }

    pub fn update_progress(&self, fraction: f64) {
        if !self.enabled {
            return;
        }
        self.estimator.update_progress(fraction);
    }

    /// Progress as `done / total` items; ignored when `total` is zero.
    pub fn update_progress_step(&self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.update_progress(done as f64 / total as f64);
    }

    /// Read-only copy of the measured stage times.
    pub fn stage_times(&self) -> StageTimes {
        self.times().clone()
    }

    /// Supplier closure over the accumulated times, for `Estimator::set_actual_times_supplier`.
    pub fn times_supplier(&self) -> impl Fn() -> StageTimes + Send + Sync + 'static {
        let times = Arc::clone(&self.stage_times);
        move || times.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Make the estimator correct its baselines against this monitor's measurements.
    pub fn install_as_supplier(&self) {
        self.estimator.set_actual_times_supplier(self.times_supplier());
    }

    /// Last stage passed to `change_stage`.
    pub fn current_stage(&self) -> Option<Stage> {
        self.current
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.log_enabled = false;
    }

    pub fn enable_log(&mut self) {
        self.log_enabled = true;
        self.enabled = true;
    }

    pub fn disable_log(&mut self) {
        self.log_enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_log_enabled(&self) -> bool {
        self.log_enabled
    }
}
