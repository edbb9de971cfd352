//! Path segment primitives for non-oval tracks
//!
//! A track path is an ordered list of straights and circular curves. Each
//! segment maps a local fraction `t ∈ [0, 1]` to a point and a facing angle,
//! with lateral offsets applied along the left-hand normal of travel.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// One primitive of a track path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathSegment {
    Straight {
        start: Vec2,
        end: Vec2,
        length: f32,
    },
    Curve {
        center: Vec2,
        radius: f32,
        /// Radians; travel runs from start to end, either direction
        start_angle: f32,
        end_angle: f32,
        length: f32,
    },
}

impl PathSegment {
    pub fn straight(start: Vec2, end: Vec2) -> Self {
        Self::Straight {
            start,
            end,
            length: start.distance(end),
        }
    }

    pub fn curve(center: Vec2, radius: f32, start_angle: f32, end_angle: f32) -> Self {
        Self::Curve {
            center,
            radius,
            start_angle,
            end_angle,
            length: radius.abs() * (end_angle - start_angle).abs(),
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        match self {
            Self::Straight { length, .. } | Self::Curve { length, .. } => *length,
        }
    }

    /// Point where travel along this segment begins
    pub fn start_point(&self) -> Vec2 {
        match *self {
            Self::Straight { start, .. } => start,
            Self::Curve {
                center,
                radius,
                start_angle,
                ..
            } => polar_to_cartesian(center, radius, start_angle),
        }
    }

    /// Position and rotation at local fraction `t`, shifted `offset` pixels
    /// along the left-hand normal.
    ///
    /// Degenerate geometry (zero-length straights, zero-radius curves) falls
    /// back to the segment's start point with no offset.
    pub fn position_and_rotation(&self, t: f32, offset: f32) -> (Vec2, f32) {
        match *self {
            Self::Straight { start, end, .. } => {
                let delta = end - start;
                let len = delta.length();
                let base = start + delta * t;
                let rotation = delta.y.atan2(delta.x);
                let perp = Vec2::new(-delta.y / len, delta.x / len);
                let position = base + perp * offset;

                if position.is_finite() && rotation.is_finite() && len > 0.0 {
                    (position, rotation)
                } else {
                    (start, 0.0)
                }
            }
            Self::Curve {
                center,
                radius,
                start_angle,
                end_angle,
                ..
            } => {
                let angle = start_angle + (end_angle - start_angle) * t;
                let base = polar_to_cartesian(center, radius, angle);
                let dir = if end_angle >= start_angle { 1.0 } else { -1.0 };
                let tangent = Vec2::new(-angle.sin(), angle.cos()) * dir;
                let rotation = tangent.y.atan2(tangent.x);
                let perp = Vec2::new(-tangent.y, tangent.x);
                let position = base + perp * offset;

                if position.is_finite() && rotation.is_finite() && radius != 0.0 {
                    (position, rotation)
                } else {
                    (polar_to_cartesian(center, radius, start_angle), 0.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_straight_midpoint_and_rotation() {
        let seg = PathSegment::straight(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0));
        assert_eq!(seg.length(), 100.0);

        let (pos, rot) = seg.position_and_rotation(0.5, 0.0);
        assert!((pos - Vec2::new(50.0, 0.0)).length() < 1e-4);
        assert!(rot.abs() < 1e-6);
    }

    #[test]
    fn test_straight_left_hand_offset() {
        // Travelling +x, the left-hand normal is +y
        let seg = PathSegment::straight(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        let (pos, _) = seg.position_and_rotation(0.0, 5.0);
        assert!((pos - Vec2::new(0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_zero_length_straight_falls_back() {
        let p = Vec2::new(3.0, 4.0);
        let seg = PathSegment::straight(p, p);
        let (pos, rot) = seg.position_and_rotation(0.5, 10.0);
        assert_eq!(pos, p);
        assert_eq!(rot, 0.0);
    }

    #[test]
    fn test_curve_length_and_endpoints() {
        let seg = PathSegment::curve(Vec2::ZERO, 10.0, 0.0, PI);
        assert!((seg.length() - 10.0 * PI).abs() < 1e-4);

        let (start, rot) = seg.position_and_rotation(0.0, 0.0);
        assert!((start - Vec2::new(10.0, 0.0)).length() < 1e-4);
        // Counter-clockwise in math coordinates: heading +y at angle 0
        assert!((rot - FRAC_PI_2).abs() < 1e-5);

        let (end, _) = seg.position_and_rotation(1.0, 0.0);
        assert!((end - Vec2::new(-10.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_curve_direction_sign() {
        let seg = PathSegment::curve(Vec2::ZERO, 10.0, PI, 0.0);
        let (_, rot) = seg.position_and_rotation(0.0, 0.0);
        // Running backwards from angle π, the tangent points +y
        assert!((rot - FRAC_PI_2).abs() < 1e-5);

        // Left-hand normal of +y is -x, i.e. outward at angle π
        let (pos, _) = seg.position_and_rotation(0.0, 2.0);
        assert!((pos - Vec2::new(-12.0, 0.0)).length() < 1e-4);
    }
}
