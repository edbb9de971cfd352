//! Race tick
//!
//! Advances every car one frame: picks each car's input (AI or human),
//! integrates it, and stamps finishers in order.

use glam::Vec2;
use rand::Rng;

use super::ai::get_ai_input;
use super::physics::update_car;
use super::standings::calculate_positions;
use super::state::{Car, CarInput, PlayerInputs, Race};
use super::track::get_position_and_rotation;
use crate::platform::now_ms;
use crate::tuning::Tuning;

/// Result of one race tick
#[derive(Debug, Clone)]
pub struct RaceUpdate {
    pub cars: Vec<Car>,
    /// Every car has finished
    pub finished: bool,
    /// Number of finishers so far (the last finish position handed out)
    pub finish_order: u32,
}

/// Input registered for a human car; cars without one coast
pub fn player_input(car: &Car, player_inputs: &PlayerInputs) -> CarInput {
    car.config
        .player_index
        .and_then(|i| player_inputs.get(&i))
        .copied()
        .unwrap_or_default()
}

/// Advance the race by `dt` milliseconds, stamping finishers with the wall clock
pub fn update_race_state<R: Rng + ?Sized>(
    cars: &[Car],
    dt: f32,
    player_inputs: &PlayerInputs,
    target_laps: u32,
    tuning: &Tuning,
    rng: &mut R,
) -> RaceUpdate {
    update_race_state_at(cars, dt, player_inputs, target_laps, tuning, rng, now_ms())
}

/// [`update_race_state`] with an explicit finish timestamp
pub fn update_race_state_at<R: Rng + ?Sized>(
    cars: &[Car],
    dt: f32,
    player_inputs: &PlayerInputs,
    target_laps: u32,
    tuning: &Tuning,
    rng: &mut R,
    now: f64,
) -> RaceUpdate {
    let mut finish_order = cars.iter().filter(|c| c.finished).count() as u32;

    let cars: Vec<Car> = cars
        .iter()
        .map(|car| {
            if car.finished {
                return car.clone();
            }

            let input = if car.is_ai() {
                get_ai_input(car, tuning, rng)
            } else {
                player_input(car, player_inputs)
            };

            let mut updated = update_car(car, dt, &input, tuning).into_owned();
            if updated.laps_completed >= target_laps {
                finish_order += 1;
                updated.finished = true;
                updated.finish_position = Some(finish_order);
                updated.finish_time = Some(now);
                log::info!(
                    "Car {} (#{}) finished in position {}",
                    updated.id(),
                    updated.config.number,
                    finish_order
                );
            }
            updated
        })
        .collect();

    let finished = cars.iter().all(|c| c.finished);

    RaceUpdate {
        cars,
        finished,
        finish_order,
    }
}

impl Race {
    /// Advance the session by `dt` milliseconds; no-op once every car finished
    pub fn tick(&mut self, dt: f32, player_inputs: &PlayerInputs) {
        if self.finished {
            return;
        }

        let update = update_race_state(
            &self.cars,
            dt,
            player_inputs,
            self.settings.target_laps,
            &self.settings.tuning,
            &mut self.rng,
        );

        self.cars = update.cars;
        self.finish_order = update.finish_order;
        self.elapsed_ms += f64::from(dt);
        self.tick_count += 1;

        if update.finished {
            self.finished = true;
            log::info!(
                "Race finished after {} ticks ({:.1}s simulated)",
                self.tick_count,
                self.elapsed_ms / 1000.0
            );
        }
    }

    /// Current standings with positions filled in
    pub fn standings(&self) -> Vec<Car> {
        calculate_positions(&self.cars)
    }

    /// World position and rotation of every car, in car order
    pub fn car_poses(&self) -> Vec<(Vec2, f32)> {
        self.cars
            .iter()
            .map(|car| {
                get_position_and_rotation(
                    car.track_progress,
                    car.lane,
                    &self.dimensions,
                    car.lane_offset,
                )
            })
            .collect()
    }
}
