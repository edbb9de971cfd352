//! Data-driven physics balance
//!
//! Every constant the car physics and AI read lives here so a race can be
//! rebalanced from JSON without touching code. Speeds are in track progress
//! per millisecond, lateral values in pixels.

use serde::{Deserialize, Serialize};

use crate::consts::LANE_SPACING;
use crate::error::SettingsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Top speed before per-car variation
    pub base_max_speed: f32,
    /// Half-width of the symmetric top speed jitter every car gets
    pub speed_variation: f32,
    /// AI cars run at this fraction of the base top speed
    pub ai_speed_factor: f32,
    /// Upper bound of the extra (non-negative) AI speed jitter
    pub ai_speed_variation: f32,
    /// Throttle (progress/ms²)
    pub acceleration: f32,
    /// Brake (progress/ms²)
    pub deceleration: f32,
    /// Passive drag when neither throttle nor brake is held
    pub coast_deceleration: f32,
    /// Lateral drift while steering (px/ms)
    pub turn_speed: f32,
    /// Steering wheel rate (rad/ms)
    pub steering_speed: f32,
    pub max_turn_angle: f32,
    /// Heading rotation at full speed (rad/ms)
    pub heading_turn_rate: f32,
    /// Steering decay per reference frame when not turning
    pub steering_damping: f32,
    /// Only bounds lateral drift; lane geometry always uses `LANE_SPACING`
    pub lane_width: f32,
    /// Lane offset is clamped to ±lane_width × this
    pub max_lane_offset_multiplier: f32,
    /// AI target speed = max_speed × (min + rand × spread)
    pub ai_target_speed_min: f32,
    pub ai_target_speed_spread: f32,
    /// AI ignores lane offsets smaller than this
    pub ai_lane_dead_zone: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_max_speed: 0.000_12,
            speed_variation: 0.000_008,
            ai_speed_factor: 0.92,
            ai_speed_variation: 0.000_006,
            acceleration: 0.000_000_2,
            deceleration: 0.000_000_4,
            coast_deceleration: 0.000_000_05,
            turn_speed: 0.08,
            steering_speed: 0.004,
            max_turn_angle: 0.5,
            heading_turn_rate: 0.002,
            steering_damping: 0.9,
            lane_width: LANE_SPACING,
            max_lane_offset_multiplier: 0.4,
            ai_target_speed_min: 0.85,
            ai_target_speed_spread: 0.1,
            ai_lane_dead_zone: 5.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Largest lateral deviation from a lane centerline
    #[inline]
    pub fn max_lane_offset(&self) -> f32 {
        self.lane_width * self.max_lane_offset_multiplier
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("base_max_speed", self.base_max_speed),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("turn_speed", self.turn_speed),
            ("steering_speed", self.steering_speed),
            ("max_turn_angle", self.max_turn_angle),
            ("heading_turn_rate", self.heading_turn_rate),
            ("lane_width", self.lane_width),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::OutOfRange {
                    field,
                    min: 0.0,
                    max: f32::MAX,
                    value,
                });
            }
        }

        let non_negative = [
            ("speed_variation", self.speed_variation),
            ("ai_speed_variation", self.ai_speed_variation),
            ("coast_deceleration", self.coast_deceleration),
            ("max_lane_offset_multiplier", self.max_lane_offset_multiplier),
            ("ai_target_speed_spread", self.ai_target_speed_spread),
            ("ai_lane_dead_zone", self.ai_lane_dead_zone),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::OutOfRange {
                    field,
                    min: 0.0,
                    max: f32::MAX,
                    value,
                });
            }
        }

        let unit = [
            ("ai_speed_factor", self.ai_speed_factor),
            ("steering_damping", self.steering_damping),
            ("ai_target_speed_min", self.ai_target_speed_min),
        ];
        for (field, value) in unit {
            if !(value > 0.0 && value < 1.0) {
                return Err(SettingsError::OutOfRange {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TrackType, calculate_track_dimensions};

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        assert!((Tuning::default().max_lane_offset() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_lane_width_only_bounds_drift() {
        let tuning = Tuning::from_json(r#"{ "lane_width": 60.0 }"#).unwrap();
        assert!((tuning.max_lane_offset() - 24.0).abs() < 1e-4);
        let dims = calculate_track_dimensions(1200.0, 800.0, 4, TrackType::Oval);
        assert!((dims.lane_offset(1) - dims.lane_offset(0) - LANE_SPACING).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "turn_speed": 0.2 }"#).unwrap();
        assert_eq!(tuning.turn_speed, 0.2);
        assert_eq!(tuning.base_max_speed, Tuning::default().base_max_speed);
    }

    #[test]
    fn test_rejects_bad_damping() {
        let err = Tuning::from_json(r#"{ "steering_damping": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "steering_damping",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_speed() {
        let tuning = Tuning {
            base_max_speed: -1.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
