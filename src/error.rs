//! Errors for the fallible edges of the engine (config parsing, validation)
//!
//! The simulation itself never fails; only loading settings, tuning and
//! snapshots can.

use thiserror::Error;

/// An unrecognised track type name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown track type '{0}' (expected oval, speedway, figure8 or roadcourse)")]
pub struct TrackTypeParseError(pub String);

/// Errors raised when race settings or tuning invariants are violated.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("lane count must be between 1 and {max} (got {value})")]
    LaneCount { value: u32, max: u32 },
    #[error("target laps must be at least 1")]
    TargetLaps,
    #[error("canvas must have positive finite size (got {width}x{height})")]
    Canvas { width: f32, height: f32 },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
}
