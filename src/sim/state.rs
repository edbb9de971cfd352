//! Race state and core simulation types
//!
//! All state that must be persisted for resume/determinism lives here.

use std::collections::HashMap;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::create_car;
use super::track::{TrackDimensions, calculate_track_dimensions};
use crate::error::SettingsError;
use crate::settings::RaceSettings;

/// Per-car setup chosen before the race
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarConfig {
    pub id: String,
    pub color: String,
    pub number: u32,
    #[serde(rename = "isAI", alias = "isAi")]
    pub is_ai: bool,
    /// Which human player drives this car (ignored for AI cars)
    #[serde(default)]
    pub player_index: Option<usize>,
}

impl CarConfig {
    pub fn human(id: impl Into<String>, number: u32, player_index: usize) -> Self {
        Self {
            id: id.into(),
            color: String::from("#e53935"),
            number,
            is_ai: false,
            player_index: Some(player_index),
        }
    }

    pub fn ai(id: impl Into<String>, number: u32) -> Self {
        Self {
            id: id.into(),
            color: String::from("#1e88e5"),
            number,
            is_ai: true,
            player_index: None,
        }
    }
}

/// Checkpoint progress within the current lap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Checkpoint {
    /// Lap started (or just credited)
    #[default]
    Start,
    /// Passed the first quarter
    Quarter,
    /// Passed three quarters; the next wrap counts as a lap
    ThreeQuarter,
}

impl From<Checkpoint> for u8 {
    fn from(c: Checkpoint) -> u8 {
        match c {
            Checkpoint::Start => 0,
            Checkpoint::Quarter => 1,
            Checkpoint::ThreeQuarter => 2,
        }
    }
}

impl TryFrom<u8> for Checkpoint {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Checkpoint::Start),
            1 => Ok(Checkpoint::Quarter),
            2 => Ok(Checkpoint::ThreeQuarter),
            _ => Err(format!("invalid checkpoint {v}")),
        }
    }
}

/// A car's full kinematic and race state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(flatten)]
    pub config: CarConfig,
    /// Fraction of the lap in [0, 1)
    pub track_progress: f32,
    pub lane: u32,
    /// Lateral drift from the lane centerline (pixels)
    pub lane_offset: f32,
    /// Progress per millisecond
    pub speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub laps_completed: u32,
    pub last_checkpoint: Checkpoint,
    pub finished: bool,
    /// 1-based finishing order
    pub finish_position: Option<u32>,
    /// Wall-clock ms when the car finished
    pub finish_time: Option<f64>,
    pub steering_angle: f32,
    /// Accumulated turning, [0, 2π)
    pub heading: f32,
    /// 1-based standing, only set by the standings calculator
    #[serde(default)]
    pub position: Option<u32>,
}

impl Car {
    #[inline]
    pub fn id(&self) -> &str {
        &self.config.id
    }

    #[inline]
    pub fn is_ai(&self) -> bool {
        self.config.is_ai
    }
}

/// Control input for one car for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarInput {
    pub accelerate: bool,
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Human inputs keyed by player index
pub type PlayerInputs = HashMap<usize, CarInput>;

/// Lane assignment at the grid: car i starts in lane `i % lane_count`
pub fn assign_lanes(car_count: usize, lane_count: u32) -> Vec<u32> {
    let lanes = lane_count.max(1);
    (0..car_count).map(|i| i as u32 % lanes).collect()
}

/// A complete race session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG shared by car creation and AI decisions
    pub rng: Pcg32,
    pub settings: RaceSettings,
    pub dimensions: TrackDimensions,
    pub cars: Vec<Car>,
    /// Simulated time since the start (ms)
    pub elapsed_ms: f64,
    pub tick_count: u64,
    pub finished: bool,
    /// Number of cars that have finished so far
    pub finish_order: u32,
}

impl Race {
    /// Create a race with a fresh random seed
    pub fn new(settings: RaceSettings, configs: &[CarConfig]) -> Result<Self, SettingsError> {
        Self::with_seed(settings, configs, rand::random())
    }

    /// Create a race with the given seed
    pub fn with_seed(
        settings: RaceSettings,
        configs: &[CarConfig],
        seed: u64,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;

        let dimensions = calculate_track_dimensions(
            settings.canvas_width,
            settings.canvas_height,
            settings.lane_count,
            settings.track_type,
        );

        let mut rng = Pcg32::seed_from_u64(seed);
        let lanes = assign_lanes(configs.len(), settings.lane_count);
        let cars = configs
            .iter()
            .zip(lanes)
            .map(|(config, lane)| {
                create_car(config.clone(), lane, config.is_ai, &settings.tuning, &mut rng)
            })
            .collect();

        log::debug!(
            "New race: seed={} track={} lanes={} laps={} cars={}",
            seed,
            settings.track_type,
            settings.lane_count,
            settings.target_laps,
            configs.len()
        );

        Ok(Self {
            seed,
            rng,
            settings,
            dimensions,
            cars,
            elapsed_ms: 0.0,
            tick_count: 0,
            finished: false,
            finish_order: 0,
        })
    }

    /// Serialize the whole session, RNG position included
    pub fn snapshot_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a session produced by [`Race::snapshot_json`]
    pub fn restore_json(json: &str) -> Result<Self, SettingsError> {
        let race: Self = serde_json::from_str(json)?;
        race.settings.validate()?;
        log::debug!(
            "Restored race: seed={} tick={} finished={}",
            race.seed,
            race.tick_count,
            race.finished
        );
        Ok(race)
    }
}
