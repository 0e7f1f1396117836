//! ffi.rs
//! Python-facing wrappers. Durations cross the boundary as `HH:MM:SS.mmm`
//! strings or integer milliseconds, stages and profiles by name.

use std::fmt::Display;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use eta_core::config::PipelineConfig;
use eta_core::constants::LOG_PREFIX;
use eta_core::prelude::*;

fn value_error(err: impl Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_stage(name: &str) -> PyResult<Stage> {
    name.parse::<Stage>().map_err(value_error)
}

fn parse_profile(name: &str) -> PyResult<ProfileKind> {
    name.parse::<ProfileKind>().map_err(value_error)
}

#[pyfunction]
fn parse_duration_ms(text: &str) -> PyResult<i64> {
    Duration::parse(text).map(|d| d.as_millis()).map_err(value_error)
}

#[pyfunction]
#[pyo3(signature = (ms, include_milliseconds = true))]
fn format_duration(ms: i64, include_milliseconds: bool) -> String {
    Duration::from_milliseconds(ms).str(include_milliseconds)
}

#[pyfunction]
fn stage_names() -> Vec<&'static str> {
    Stage::ALL.iter().map(|s| s.name()).collect()
}

// -----------------------------------------------------------------------------
// Estimator
// -----------------------------------------------------------------------------

#[pyclass(name = "Estimator")]
pub struct PyEstimator {
    inner: Estimator,
}

#[pymethods]
impl PyEstimator {
    #[new]
    #[pyo3(signature = (profile = "unknown", enabled = true, log_enabled = false))]
    fn new(profile: &str, enabled: bool, log_enabled: bool) -> PyResult<Self> {
        let inner = Estimator::builder()
            .profile(parse_profile(profile)?)
            .enabled(enabled)
            .log_enabled(log_enabled)
            .build();
        Ok(Self { inner })
    }

    /// Build from a JSON pipeline configuration document.
    #[staticmethod]
    fn from_json(text: &str) -> PyResult<Self> {
        let config = PipelineConfig::from_json_str(text).map_err(value_error)?;
        Ok(Self { inner: Estimator::from_config(&config.estimator) })
    }

    fn change_stage(&self, stage: &str) -> PyResult<()> {
        self.inner.change_stage(parse_stage(stage)?);
        Ok(())
    }

    fn update_progress(&self, fraction: f64) {
        self.inner.update_progress(fraction);
    }

    /// Measured time of a stage timed outside a Monitor.
    fn record_stage_time(&self, stage: &str, elapsed_ms: i64) -> PyResult<()> {
        self.inner
            .record_stage_time(parse_stage(stage)?, Duration::from_milliseconds(elapsed_ms));
        Ok(())
    }

    fn set_profile(&self, profile: &str) -> PyResult<()> {
        self.inner.set_profile(parse_profile(profile)?);
        Ok(())
    }

    fn set_manual_estimate(&self, text: &str) -> PyResult<()> {
        self.inner.set_manual_estimate(text).map_err(value_error)
    }

    fn clear_manual_estimate(&self) {
        self.inner.clear_manual_estimate();
    }

    fn apply_estimate_line(&self, line: &str) -> PyResult<bool> {
        self.inner.apply_estimate_line(line).map_err(value_error)
    }

    /// Called with no arguments after every applied change. Exceptions are printed, not raised.
    fn add_observer(&self, callback: PyObject) {
        self.inner.add_observer(move || {
            Python::with_gil(|py| {
                if let Err(err) = callback.call0(py) {
                    err.print(py);
                }
            })
        });
    }

    fn clear_observers(&self) {
        self.inner.clear_observers();
    }

    fn estimated_time_remaining(&self) -> String {
        self.inner.estimated_time_remaining().str(true)
    }

    fn estimated_time_remaining_ms(&self) -> i64 {
        self.inner.estimated_time_remaining().as_millis()
    }

    fn estimated_time_total_ms(&self) -> i64 {
        self.inner.estimated_time_total().as_millis()
    }

    fn elapsed_to_estimate_ratio(&self) -> f64 {
        self.inner.elapsed_to_estimate_ratio()
    }

    fn current_stage(&self) -> &'static str {
        self.inner.current_stage().name()
    }

    fn snapshot_json(&self) -> PyResult<String> {
        self.inner.snapshot().to_json().map_err(value_error)
    }

    fn enable(&self) {
        self.inner.enable();
    }

    fn disable(&self) {
        self.inner.disable();
    }

    fn enable_log(&self) {
        self.inner.enable_log();
    }

    fn disable_log(&self) {
        self.inner.disable_log();
    }

    fn is_enabled(&self) -> bool {
        self.inner.is_enabled()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}

// -----------------------------------------------------------------------------
// Monitor
// -----------------------------------------------------------------------------

#[pyclass(name = "Monitor")]
pub struct PyMonitor {
    inner: Monitor,
}

#[pymethods]
impl PyMonitor {
    /// Shares `estimator`; measured times are installed as its supplier when `supply` is set.
    #[new]
    #[pyo3(signature = (estimator, enabled = true, log_enabled = false, supply = true))]
    fn new(estimator: PyRef<'_, PyEstimator>, enabled: bool, log_enabled: bool, supply: bool) -> Self {
        let inner = Monitor::with_flags(estimator.inner.clone(), enabled, log_enabled);
        if supply {
            inner.install_as_supplier();
        }
        Self { inner }
    }

    fn change_stage(&mut self, stage: &str) -> PyResult<()> {
        self.inner.change_stage(parse_stage(stage)?);
        Ok(())
    }

    fn update_progress(&self, fraction: f64) {
        self.inner.update_progress(fraction);
    }

    fn update_progress_step(&self, done: usize, total: usize) {
        self.inner.update_progress_step(done, total);
    }

    /// Measured stage times as `(stage name, milliseconds)` pairs in stage order.
    fn stage_times_ms(&self) -> Vec<(&'static str, i64)> {
        self.inner
            .stage_times()
            .iter()
            .map(|(stage, elapsed)| (stage.name(), elapsed.as_millis()))
            .collect()
    }

    fn enable(&mut self) {
        self.inner.enable();
    }

    fn disable(&mut self) {
        self.inner.disable();
    }
}

pub fn register(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEstimator>()?;
    m.add_class::<PyMonitor>()?;
    m.add_function(wrap_pyfunction!(parse_duration_ms, m)?)?;
    m.add_function(wrap_pyfunction!(format_duration, m)?)?;
    m.add_function(wrap_pyfunction!(stage_names, m)?)?;
    m.add("LOG_PREFIX", LOG_PREFIX)?;
    Ok(())
}
