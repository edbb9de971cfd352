//! Lane Racer - deterministic racing engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track geometry, car physics, race state)
//! - `tuning`: Data-driven physics balance
//! - `settings`: Race setup (track, lanes, laps, canvas)
//! - `platform`: Browser/native platform abstraction
//! - `web`: wasm-bindgen handle for browser front-ends

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{SettingsError, TrackTypeParseError};
pub use settings::RaceSettings;
pub use tuning::Tuning;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Distance between neighbouring lane centerlines (pixels)
    pub const LANE_SPACING: f32 = 30.0;
    /// Extra width added around the lanes (pixels)
    pub const TRACK_PADDING: f32 = 40.0;
    /// Largest lane count accepted by settings validation
    pub const MAX_LANES: u32 = 8;

    /// Oval radii as fractions of the canvas size
    pub const OVAL_RADIUS_X_FACTOR: f32 = 0.42;
    pub const OVAL_RADIUS_Y_FACTOR: f32 = 0.38;

    /// Speedway sampling
    pub const SPEEDWAY_STRAIGHT_SAMPLES: usize = 100;
    pub const SPEEDWAY_ARC_SAMPLES: usize = 140;
    /// Turn radius floor: half the track width plus this clearance
    pub const SPEEDWAY_TURN_CLEARANCE: f32 = 30.0;
    pub const SPEEDWAY_MIN_HALF_STRAIGHT: f32 = 20.0;

    /// Figure-8 (lemniscate of Gerono) sampling
    pub const FIGURE8_SAMPLES: usize = 320;

    /// Road course spline sampling
    pub const ROAD_SAMPLES_PER_SPAN: usize = 64;
    /// Target spacing of the arc-length resampled road course (pixels)
    pub const ROAD_RESAMPLE_SPACING: f32 = 5.0;
    /// Centripetal Catmull-Rom parameter
    pub const CATMULL_ROM_ALPHA: f32 = 0.5;

    /// Reference frame length (ms) for frame-rate independent damping
    pub const DAMPING_FRAME_MS: f32 = 16.0;
    /// Steering angles below this snap to zero
    pub const STEERING_SNAP_EPSILON: f32 = 0.001;
    /// Slowest speed fraction used when scaling the turn rate
    pub const MIN_TURN_SPEED_FACTOR: f32 = 0.3;

    /// Checkpoint thresholds (fractions of a lap)
    pub const CHECKPOINT_ONE: f32 = 0.25;
    pub const CHECKPOINT_TWO: f32 = 0.75;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = ((angle % TAU) + TAU) % TAU;
    // Rounding can land exactly on TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Normalize a progress value to [0, 1)
#[inline]
pub fn wrap_progress(progress: f32) -> f32 {
    let wrapped = progress % 1.0;
    let wrapped = if wrapped < 0.0 { wrapped + 1.0 } else { wrapped };
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) around a center to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}
