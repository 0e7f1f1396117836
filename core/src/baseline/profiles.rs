//! baseline/profiles.rs
//! Built-in baseline tables measured on the stitching pipeline.
//!
//! Timings per distortion model:
//! - pinhole: cheap undistortion, feature matching dominates the early stages
//! - fisheye: undistortion and camera adjustment are expensive, features are skipped
//! - unknown: conservative defaults

use crate::baseline::types::{BaselineTable, ProfileKind};
use crate::duration::Duration;
use crate::stage::Stage;

/// Baseline table for a profile kind.
pub fn builtin_table(kind: ProfileKind) -> BaselineTable {
    match kind {
        ProfileKind::Pinhole => pinhole(),
        ProfileKind::Fisheye => fisheye(),
        ProfileKind::Unknown => unknown(),
    }
}

fn pinhole() -> BaselineTable {
    BaselineTable::new()
        .with(Stage::Start, Duration::from_milliseconds(2500))
        .with(Stage::UndistortImages, Duration::from_milliseconds(400))
        .with(Stage::FindFeatures, Duration::from_milliseconds(500))
        .with(Stage::MatchFeatures, Duration::from_milliseconds(1500))
        .with(Stage::EstimateCameraParameters, Duration::ZERO)
        .with(Stage::AdjustCameraParameters, Duration::from_seconds(3))
        .with(Stage::PrepareExposureCompensation, Duration::from_milliseconds(2500))
        .with(Stage::FindSeams, Duration::from_seconds(70))
        .with(Stage::Compose, Duration::from_seconds(100))
        .with(Stage::Complete, Duration::from_seconds(10))
}

fn fisheye() -> BaselineTable {
    BaselineTable::new()
        .with(Stage::Start, Duration::from_milliseconds(1500))
        .with(Stage::UndistortImages, Duration::from_seconds(30))
        .with(Stage::FindFeatures, Duration::ZERO)
        .with(Stage::MatchFeatures, Duration::ZERO)
        .with(Stage::EstimateCameraParameters, Duration::ZERO)
        .with(Stage::AdjustCameraParameters, Duration::from_seconds(30))
        .with(Stage::PrepareExposureCompensation, Duration::from_seconds(10))
        .with(Stage::FindSeams, Duration::from_seconds(100))
        .with(Stage::Compose, Duration::from_seconds(100))
        .with(Stage::Complete, Duration::from_seconds(10))
}

fn unknown() -> BaselineTable {
    BaselineTable::new()
        .with(Stage::Start, Duration::from_milliseconds(1500))
        .with(Stage::UndistortImages, Duration::from_milliseconds(400))
        .with(Stage::FindFeatures, Duration::ZERO)
        .with(Stage::MatchFeatures, Duration::from_milliseconds(500))
        .with(Stage::EstimateCameraParameters, Duration::ZERO)
        .with(Stage::AdjustCameraParameters, Duration::from_seconds(3))
        .with(Stage::PrepareExposureCompensation, Duration::from_milliseconds(2500))
        .with(Stage::FindSeams, Duration::from_seconds(70))
        .with(Stage::Compose, Duration::from_seconds(100))
        .with(Stage::Complete, Duration::from_seconds(10))
}
