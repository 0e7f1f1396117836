//! config.rs
//! JSON configuration for the estimator and its monitor.
//!
//! ```json
//! {
//!   "estimator": {
//!     "enabled": true,
//!     "log_enabled": true,
//!     "profile": "fisheye",
//!     "baselines": { "fisheye": { "FindSeams": "00:01:40.000" } }
//!   },
//!   "monitor": { "enabled": true, "log_enabled": false }
//! }
//! ```
//!
//! Every field is optional. Profiles without a table fall back to the built-in one.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::baseline::{BaselineTable, ConfiguredProfiles, ProfileKind};
use crate::constants::LOG_TARGET;
use crate::estimator::Estimator;
use crate::monitor::Monitor;
use crate::types::EtaError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub enabled: bool,
    pub log_enabled: bool,
    pub profile: ProfileKind,
    /// Per-profile overrides of the built-in tables.
    pub baselines: BTreeMap<ProfileKind, BaselineTable>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_enabled: false,
            profile: ProfileKind::Unknown,
            baselines: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub log_enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { enabled: true, log_enabled: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub estimator: EstimatorConfig,
    pub monitor: MonitorConfig,
}

impl PipelineConfig {
    pub fn from_json_str(text: &str) -> Result<Self, EtaError> {
        let config: PipelineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EtaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(target: LOG_TARGET, path = %path.display(), "loading estimator configuration");
        Self::from_json_str(&text)
    }

    /// Baselines are durations a stage is expected to take; negatives are rejected.
    pub fn validate(&self) -> Result<(), EtaError> {
        for (profile, table) in &self.estimator.baselines {
            if let Some((stage, estimate)) = table.iter().find(|(_, estimate)| estimate.is_negative()) {
                return Err(EtaError::Config(format!(
                    "negative baseline {estimate} for stage {stage} in profile {profile}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, EtaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Estimator and monitor sharing one estimate, as configured.
    pub fn build(&self) -> (Estimator, Monitor) {
        let estimator = Estimator::from_config(&self.estimator);
        let monitor = Monitor::from_config(estimator.clone(), &self.monitor);
        (estimator, monitor)
    }
}

impl Estimator {
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Estimator::builder()
            .profile(config.profile)
            .selector(ConfiguredProfiles::new(config.baselines.clone()))
            .enabled(config.enabled)
            .log_enabled(config.log_enabled)
            .build()
    }
}
