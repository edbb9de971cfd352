//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Time only advances by the `dt` passed in
//! - Seeded RNG only
//! - Stable iteration order (car order as configured)
//! - No rendering or platform dependencies (besides the finish timestamp)

pub mod ai;
pub mod physics;
pub mod segment;
pub mod spline;
pub mod standings;
pub mod state;
pub mod tick;
pub mod track;

pub use ai::get_ai_input;
pub use physics::{create_car, update_car};
pub use segment::PathSegment;
pub use standings::{calculate_positions, compare_standings};
pub use state::{Car, CarConfig, CarInput, Checkpoint, PlayerInputs, Race, assign_lanes};
pub use tick::{RaceUpdate, player_input, update_race_state, update_race_state_at};
pub use track::{
    TrackDimensions, TrackPath, TrackType, calculate_track_dimensions, get_position_and_rotation,
    get_position_on_track, get_rotation_at_position, oval_rotation, track_width_for_lanes,
};
