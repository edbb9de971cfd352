//! Race setup and preferences
//!
//! Persisted as JSON by the front-end; every field has a default so older
//! or partial files still load.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LANES;
use crate::error::SettingsError;
use crate::sim::TrackType;
use crate::tuning::Tuning;

/// Race settings chosen on the setup screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    pub track_type: TrackType,
    pub lane_count: u32,
    /// Laps needed to finish
    pub target_laps: u32,
    /// Canvas size in pixels
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Physics balance
    pub tuning: Tuning,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            track_type: TrackType::Oval,
            lane_count: 4,
            target_laps: 3,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            tuning: Tuning::default(),
        }
    }
}

/// Clamp a requested lane count into the supported range
#[inline]
pub fn clamp_lane_count(lanes: u32) -> u32 {
    lanes.clamp(1, MAX_LANES)
}

impl RaceSettings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings JSON, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded race settings ({})", settings.track_type);
                settings
            }
            Err(e) => {
                log::warn!("Invalid race settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.lane_count == 0 || self.lane_count > MAX_LANES {
            return Err(SettingsError::LaneCount {
                value: self.lane_count,
                max: MAX_LANES,
            });
        }
        if self.target_laps == 0 {
            return Err(SettingsError::TargetLaps);
        }
        let canvas_ok = |v: f32| v.is_finite() && v > 0.0;
        if !canvas_ok(self.canvas_width) || !canvas_ok(self.canvas_height) {
            return Err(SettingsError::Canvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        self.tuning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(RaceSettings::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_partial() {
        let settings =
            RaceSettings::from_json(r#"{ "track_type": "figure8", "lane_count": 6 }"#).unwrap();
        assert_eq!(settings.track_type, TrackType::Figure8);
        assert_eq!(settings.lane_count, 6);
        assert_eq!(settings.target_laps, 3);

        let json = settings.to_json().unwrap();
        assert_eq!(RaceSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_unknown_track_rejected() {
        let err = RaceSettings::from_json(r#"{ "track_type": "moebius" }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn test_lane_count_validation() {
        let settings = RaceSettings {
            lane_count: 9,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::LaneCount { value: 9, max: 8 })
        ));
        assert_eq!(clamp_lane_count(0), 1);
        assert_eq!(clamp_lane_count(12), MAX_LANES);
    }

    #[test]
    fn test_bad_canvas_rejected() {
        let settings = RaceSettings {
            canvas_width: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::Canvas { .. })));
    }

    #[test]
    fn test_fallback_to_default() {
        assert_eq!(
            RaceSettings::from_json_or_default("not json"),
            RaceSettings::default()
        );
    }
}
