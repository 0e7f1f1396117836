//! stage/types.rs
//! Ordered pipeline stages.
//!
//! Design notes:
//! - Every variant carries an explicit ordinal (`#[repr(u8)]` discriminant); reordering
//!   the declarations never changes the order.
//! - Ordering and equality go through `ordinal()` only, never through names.
//! - `num_enum` provides the checked ordinal -> stage conversion.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::types::EtaError;

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize)]
pub enum Stage {
    Start                       = 0,
    UndistortImages             = 1,
    FindFeatures                = 2,
    MatchFeatures               = 3,
    EstimateCameraParameters    = 4,
    AdjustCameraParameters      = 5,
    PrepareExposureCompensation = 6,
    FindSeams                   = 7,
    Compose                     = 8,
    Complete                    = 9,
}

impl Stage {
    pub const COUNT: usize = 10;

    /// Pipeline entry point.
    pub const FIRST: Stage = Stage::Start;

    /// Terminal marker.
    pub const LAST: Stage = Stage::Complete;

    /// All stages in ordinal order.
    pub const ALL: [Stage; Stage::COUNT] = [
        Stage::Start,
        Stage::UndistortImages,
        Stage::FindFeatures,
        Stage::MatchFeatures,
        Stage::EstimateCameraParameters,
        Stage::AdjustCameraParameters,
        Stage::PrepareExposureCompensation,
        Stage::FindSeams,
        Stage::Compose,
        Stage::Complete,
    ];

    pub fn ordinal(self) -> u8 {
        self.into()
    }

    pub fn value(self) -> Stage {
        self
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Stage> {
        Stage::try_from_primitive(ordinal).ok()
    }

    /// Successor; `None` at the terminal stage.
    pub fn next(self) -> Option<Stage> {
        self.ordinal().checked_add(1).and_then(Stage::from_ordinal)
    }

    /// Predecessor; `None` at the entry stage.
    pub fn previous(self) -> Option<Stage> {
        self.ordinal().checked_sub(1).and_then(Stage::from_ordinal)
    }

    pub fn is_initial(self) -> bool {
        self == Stage::FIRST
    }

    pub fn is_terminal(self) -> bool {
        self == Stage::LAST
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Start                       => "Start",
            Stage::UndistortImages             => "UndistortImages",
            Stage::FindFeatures                => "FindFeatures",
            Stage::MatchFeatures               => "MatchFeatures",
            Stage::EstimateCameraParameters    => "EstimateCameraParameters",
            Stage::AdjustCameraParameters      => "AdjustCameraParameters",
            Stage::PrepareExposureCompensation => "PrepareExposureCompensation",
            Stage::FindSeams                   => "FindSeams",
            Stage::Compose                     => "Compose",
            Stage::Complete                    => "Complete",
        }
    }
}

impl PartialOrd for Stage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Stage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::FIRST
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = EtaError;

    /// Case-insensitive match on the stage name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EtaError::UnknownStage(s.to_string()))
    }
}
