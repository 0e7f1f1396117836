//! baseline/types.rs
//! Baseline tables and the closed set of profile kinds that select them.

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::stage::Stage;
use crate::types::EtaError;

/// Which baseline profile applies to a run.
///
/// Chosen by the camera subsystem from the distortion model in use; `Unknown`
/// covers cameras without a distortion model or with one we have no timings for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Pinhole (narrow field of view) distortion model.
    Pinhole,
    /// Wide-angle / fisheye (Scaramuzza) distortion model.
    #[serde(alias = "scaramuzza", alias = "wide-angle")]
    Fisheye,
    /// No distortion model known.
    #[default]
    #[serde(alias = "default")]
    Unknown,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 3] = [ProfileKind::Pinhole, ProfileKind::Fisheye, ProfileKind::Unknown];

    pub fn name(self) -> &'static str {
        match self {
            ProfileKind::Pinhole => "pinhole",
            ProfileKind::Fisheye => "fisheye",
            ProfileKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileKind {
    type Err = EtaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pinhole" => Ok(ProfileKind::Pinhole),
            "fisheye" | "scaramuzza" | "wide-angle" => Ok(ProfileKind::Fisheye),
            "unknown" | "default" => Ok(ProfileKind::Unknown),
            _ => Err(EtaError::UnknownProfile(s.to_string())),
        }
    }
}

/// Expected duration per stage, iterated in stage order.
///
/// Keys need not cover every stage: a missing stage means "no prior knowledge",
/// which is different from a zero baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineTable {
    estimates: BTreeMap<Stage, Duration>,
}

impl BaselineTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, stage: Stage, estimate: Duration) -> Self {
        self.insert(stage, estimate);
        self
    }

    pub fn insert(&mut self, stage: Stage, estimate: Duration) -> Option<Duration> {
        self.estimates.insert(stage, estimate)
    }

    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.estimates.get(&stage).copied()
    }

    pub fn contains(&self, stage: Stage) -> bool {
        self.estimates.contains_key(&stage)
    }

    /// Sum of every baseline: the remaining time when nothing has started.
    pub fn total(&self) -> Duration {
        self.estimates.values().sum()
    }

    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.estimates.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, Duration)> + '_ {
        self.estimates.iter().map(|(s, d)| (*s, *d))
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<Stage, Duration> {
        &self.estimates
    }
}

impl FromIterator<(Stage, Duration)> for BaselineTable {
    fn from_iter<I: IntoIterator<Item = (Stage, Duration)>>(iter: I) -> Self {
        Self { estimates: iter.into_iter().collect() }
    }
}

impl IntoIterator for BaselineTable {
    type Item = (Stage, Duration);
    type IntoIter = btree_map::IntoIter<Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.estimates.into_iter()
    }
}
