//! Car creation and per-tick kinematics
//!
//! `update_car` is a pure function of (car, dt, input). Time is in
//! milliseconds, speed in lap fractions per millisecond.

use std::borrow::Cow;

use rand::Rng;

use super::state::{Car, CarConfig, CarInput, Checkpoint};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::wrap_angle;

/// Create a car on the grid.
///
/// Every car gets a symmetric top-speed jitter. AI cars additionally run at
/// `ai_speed_factor` of the base speed, with a small non-negative jitter on top.
pub fn create_car<R: Rng + ?Sized>(
    config: CarConfig,
    lane: u32,
    is_ai: bool,
    tuning: &Tuning,
    rng: &mut R,
) -> Car {
    let speed_variation = (rng.random::<f32>() - 0.5) * tuning.speed_variation * 2.0;
    let mut max_speed = tuning.base_max_speed + speed_variation;

    if is_ai {
        let ai_speed_variation = rng.random::<f32>() * tuning.ai_speed_variation;
        max_speed -= tuning.base_max_speed * (1.0 - tuning.ai_speed_factor);
        max_speed += ai_speed_variation;
    }

    Car {
        config,
        track_progress: 0.0,
        lane,
        lane_offset: 0.0,
        speed: 0.0,
        max_speed: max_speed.max(0.0),
        acceleration: tuning.acceleration,
        deceleration: tuning.deceleration,
        laps_completed: 0,
        last_checkpoint: Checkpoint::Start,
        finished: false,
        finish_position: None,
        finish_time: None,
        steering_angle: 0.0,
        heading: 0.0,
        position: None,
    }
}

/// Advance one car by `dt` milliseconds.
///
/// A finished car is returned borrowed and untouched.
pub fn update_car<'a>(car: &'a Car, dt: f32, input: &CarInput, tuning: &Tuning) -> Cow<'a, Car> {
    if car.finished {
        return Cow::Borrowed(car);
    }

    // Throttle / brake / drag
    let mut speed = car.speed;
    if input.accelerate {
        speed += car.acceleration * dt;
    } else if input.brake {
        speed -= car.deceleration * dt;
    } else {
        speed -= tuning.coast_deceleration * dt;
    }
    let speed = speed.clamp(0.0, car.max_speed);

    // Slower cars turn sharper
    let speed_factor = if car.max_speed > 0.0 {
        (speed / car.max_speed).max(MIN_TURN_SPEED_FACTOR)
    } else {
        1.0
    };
    let turn_rate = tuning.heading_turn_rate / speed_factor;

    let mut lane_offset = car.lane_offset;
    let mut steering_angle = car.steering_angle;
    let mut heading = car.heading;

    if input.turn_left {
        lane_offset -= tuning.turn_speed * dt;
        steering_angle = (steering_angle - tuning.steering_speed * dt).max(-tuning.max_turn_angle);
        heading -= turn_rate * dt;
    } else if input.turn_right {
        lane_offset += tuning.turn_speed * dt;
        steering_angle = (steering_angle + tuning.steering_speed * dt).min(tuning.max_turn_angle);
        heading += turn_rate * dt;
    } else {
        steering_angle *= tuning.steering_damping.powf(dt / DAMPING_FRAME_MS);
        if steering_angle.abs() < STEERING_SNAP_EPSILON {
            steering_angle = 0.0;
        }
    }

    let heading = wrap_angle(heading);
    let max_offset = tuning.max_lane_offset();
    let lane_offset = lane_offset.clamp(-max_offset, max_offset);

    // Checkpoints are judged on where the car was before this tick's move
    let mut last_checkpoint = car.last_checkpoint;
    if car.track_progress > CHECKPOINT_TWO && last_checkpoint == Checkpoint::Quarter {
        last_checkpoint = Checkpoint::ThreeQuarter;
    } else if car.track_progress > CHECKPOINT_ONE
        && car.track_progress < CHECKPOINT_TWO
        && last_checkpoint == Checkpoint::Start
    {
        last_checkpoint = Checkpoint::Quarter;
    }

    let mut laps_completed = car.laps_completed;
    let mut track_progress = car.track_progress + speed * dt;
    if track_progress >= 1.0 {
        if last_checkpoint == Checkpoint::ThreeQuarter {
            laps_completed += 1;
            last_checkpoint = Checkpoint::Start;
        }
        track_progress %= 1.0;
    }
    // f32 modulo of a value just under a whole lap can round up to 1.0
    if !(0.0..1.0).contains(&track_progress) {
        track_progress = 0.0;
    }

    Cow::Owned(Car {
        track_progress,
        lane_offset,
        speed,
        laps_completed,
        last_checkpoint,
        steering_angle,
        heading,
        ..car.clone()
    })
}
