//! Computer-controlled driving
//!
//! AI cars hunt around 85 to 95% of their top speed (the target is re-rolled
//! every tick) and steer back toward the lane centerline outside a small
//! dead zone. They never brake on purpose.

use rand::Rng;

use super::state::{Car, CarInput};
use crate::tuning::Tuning;

pub fn get_ai_input<R: Rng + ?Sized>(car: &Car, tuning: &Tuning, rng: &mut R) -> CarInput {
    let target_speed = car.max_speed
        * (tuning.ai_target_speed_min + rng.random::<f32>() * tuning.ai_target_speed_spread);

    CarInput {
        accelerate: car.speed < target_speed,
        brake: false,
        turn_left: car.lane_offset > tuning.ai_lane_dead_zone,
        turn_right: car.lane_offset < -tuning.ai_lane_dead_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::create_car;
    use crate::sim::state::CarConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ai_car(rng: &mut Pcg32) -> Car {
        create_car(CarConfig::ai("cpu", 9), 1, true, &Tuning::default(), rng)
    }

    #[test]
    fn test_accelerates_below_target() {
        let mut rng = Pcg32::seed_from_u64(5);
        let car = ai_car(&mut rng);
        let input = get_ai_input(&car, &Tuning::default(), &mut rng);
        assert!(input.accelerate);
        assert!(!input.brake);
    }

    #[test]
    fn test_lifts_above_target_band() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut car = ai_car(&mut rng);
        car.speed = car.max_speed * 0.96;
        for _ in 0..50 {
            assert!(!get_ai_input(&car, &Tuning::default(), &mut rng).accelerate);
        }
    }

    #[test]
    fn test_lane_centering_dead_zone() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut car = ai_car(&mut rng);

        car.lane_offset = 6.0;
        let input = get_ai_input(&car, &tuning, &mut rng);
        assert!(input.turn_left && !input.turn_right);

        car.lane_offset = -6.0;
        let input = get_ai_input(&car, &tuning, &mut rng);
        assert!(input.turn_right && !input.turn_left);

        car.lane_offset = 4.9;
        let input = get_ai_input(&car, &tuning, &mut rng);
        assert!(!input.turn_left && !input.turn_right);
    }
}
