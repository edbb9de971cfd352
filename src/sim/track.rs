//! Track geometry for the four circuit layouts
//!
//! The oval is evaluated analytically. Every other layout is flattened into
//! a [`TrackPath`]: an ordered list of [`PathSegment`]s plus the prefix sums
//! of their lengths, so progress → position is a binary search followed by
//! a segment-local interpolation.
//!
//! Screen coordinates are used throughout (y grows downward). Progress 0 is
//! the start/finish line and increasing progress runs clockwise on screen.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::segment::PathSegment;
use super::spline::{resample_closed, sample_closed_catmull_rom};
use crate::consts::*;
use crate::error::TrackTypeParseError;
use crate::wrap_progress;

/// Circuit layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    #[default]
    Oval,
    Speedway,
    Figure8,
    RoadCourse,
}

impl TrackType {
    pub const ALL: [TrackType; 4] = [
        TrackType::Oval,
        TrackType::Speedway,
        TrackType::Figure8,
        TrackType::RoadCourse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Oval => "oval",
            TrackType::Speedway => "speedway",
            TrackType::Figure8 => "figure8",
            TrackType::RoadCourse => "roadcourse",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackType {
    type Err = TrackTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "oval" => Ok(TrackType::Oval),
            "speedway" | "stadium" => Ok(TrackType::Speedway),
            "figure8" | "figureeight" => Ok(TrackType::Figure8),
            "roadcourse" | "road" => Ok(TrackType::RoadCourse),
            _ => Err(TrackTypeParseError(s.to_string())),
        }
    }
}

/// A flattened closed path with cumulative distances for lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPath {
    pub segments: Vec<PathSegment>,
    pub total_length: f32,
    /// Prefix sums of segment lengths: `len == segments.len() + 1`, first is 0
    pub cumulative_distances: Vec<f32>,
    /// Closed outline (segment start points) for drawing the track surface
    pub points: Vec<Vec2>,
}

impl TrackPath {
    /// Build from segments, dropping any with zero length
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        let segments: Vec<PathSegment> = segments
            .into_iter()
            .filter(|s| s.length() > 0.0 && s.length().is_finite())
            .collect();

        let mut cumulative_distances = Vec::with_capacity(segments.len() + 1);
        let mut total = 0.0;
        cumulative_distances.push(total);
        for segment in &segments {
            total += segment.length();
            cumulative_distances.push(total);
        }

        let points = segments.iter().map(PathSegment::start_point).collect();

        Self {
            segments,
            total_length: total,
            cumulative_distances,
            points,
        }
    }

    /// Connect consecutive points with straights, closing back to the first
    pub fn from_closed_points(points: &[Vec2]) -> Self {
        let n = points.len();
        let segments = (0..n)
            .map(|i| PathSegment::straight(points[i], points[(i + 1) % n]))
            .collect();
        Self::from_segments(segments)
    }

    /// Index of the segment containing `distance` along the path.
    ///
    /// Lower-bound search: the first prefix sum `>= distance` marks the end of
    /// the containing segment, so a distance exactly on a boundary belongs to
    /// the segment that ends there.
    pub fn segment_index(&self, distance: f32) -> usize {
        let upper = self
            .cumulative_distances
            .partition_point(|&d| d < distance);
        upper
            .saturating_sub(1)
            .min(self.segments.len().saturating_sub(1))
    }

    /// Position and rotation at `progress` (any real, wrapped into [0, 1))
    pub fn position_and_rotation(&self, progress: f32, offset: f32) -> (Vec2, f32) {
        if self.segments.is_empty() {
            return (Vec2::ZERO, 0.0);
        }

        let target = wrap_progress(progress) * self.total_length;
        let index = self.segment_index(target);
        let segment = &self.segments[index];
        let local = if segment.length() > 0.0 {
            ((target - self.cumulative_distances[index]) / segment.length()).clamp(0.0, 1.0)
        } else {
            0.0
        };

        segment.position_and_rotation(local, offset)
    }
}

/// Everything a renderer and the physics lookup need to know about a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDimensions {
    pub track_type: TrackType,
    pub center_x: f32,
    pub center_y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
    pub track_width: f32,
    pub lane_count: u32,
    /// `None` for the analytic oval
    pub path: Option<TrackPath>,
}

impl TrackDimensions {
    /// A path track built from custom segments
    pub fn from_segments(
        center: Vec2,
        radius_x: f32,
        radius_y: f32,
        lane_count: u32,
        segments: Vec<PathSegment>,
        track_type: TrackType,
    ) -> Self {
        Self {
            track_type,
            center_x: center.x,
            center_y: center.y,
            radius_x,
            radius_y,
            track_width: track_width_for_lanes(lane_count),
            lane_count,
            path: Some(TrackPath::from_segments(segments)),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }

    /// Lateral offset of a lane's centerline from the track centerline
    #[inline]
    pub fn lane_offset(&self, lane: u32) -> f32 {
        (lane as f32 - (self.lane_count as f32 - 1.0) / 2.0) * LANE_SPACING
    }

    /// Path length in pixels (ellipse perimeter approximation for the oval)
    pub fn total_length(&self) -> f32 {
        match &self.path {
            Some(path) => path.total_length,
            None => {
                // Ramanujan's approximation
                let (a, b) = (self.radius_x, self.radius_y);
                let h = ((a - b) * (a - b)) / ((a + b) * (a + b));
                PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
            }
        }
    }

    /// Inner and outer end of the start/finish line across the full width
    pub fn start_line(&self) -> (Vec2, Vec2) {
        let half = self.track_width / 2.0;
        let (a, _) = get_position_and_rotation(0.0, 0, self, -self.lane_offset(0) - half);
        let (b, _) = get_position_and_rotation(0.0, 0, self, -self.lane_offset(0) + half);
        (a, b)
    }
}

/// Track width grows with lane count so every racer has room
#[inline]
pub fn track_width_for_lanes(lane_count: u32) -> f32 {
    lane_count as f32 * LANE_SPACING + TRACK_PADDING
}

/// Build the geometry for a canvas of the given size
pub fn calculate_track_dimensions(
    canvas_width: f32,
    canvas_height: f32,
    lane_count: u32,
    track_type: TrackType,
) -> TrackDimensions {
    let center = Vec2::new(canvas_width / 2.0, canvas_height / 2.0);
    let track_width = track_width_for_lanes(lane_count);

    let path = match track_type {
        TrackType::Oval => None,
        TrackType::Speedway => Some(TrackPath::from_closed_points(&speedway_points(
            center,
            canvas_width,
            canvas_height,
            track_width,
        ))),
        TrackType::Figure8 => Some(TrackPath::from_closed_points(&figure8_points(
            center,
            canvas_width,
            canvas_height,
        ))),
        TrackType::RoadCourse => Some(TrackPath::from_closed_points(&road_course_points(
            canvas_width,
            canvas_height,
        ))),
    };

    if let Some(path) = &path {
        log::info!(
            "Built {} track: {} segments, length {:.1}px, width {:.0}px",
            track_type,
            path.segments.len(),
            path.total_length,
            track_width
        );
    } else {
        log::info!("Built oval track, width {:.0}px", track_width);
    }

    TrackDimensions {
        track_type,
        center_x: center.x,
        center_y: center.y,
        radius_x: canvas_width * OVAL_RADIUS_X_FACTOR,
        radius_y: canvas_height * OVAL_RADIUS_Y_FACTOR,
        track_width,
        lane_count,
        path,
    }
}

/// Stadium: top straight left→right, right turn, bottom straight, left turn
fn speedway_points(center: Vec2, width: f32, height: f32, track_width: f32) -> Vec<Vec2> {
    let turn_radius = (width.min(height) * 0.18).max(track_width / 2.0 + SPEEDWAY_TURN_CLEARANCE);
    let half_straight =
        (width * OVAL_RADIUS_X_FACTOR - turn_radius).max(SPEEDWAY_MIN_HALF_STRAIGHT);

    let right = center + Vec2::new(half_straight, 0.0);
    let left = center - Vec2::new(half_straight, 0.0);
    let top_y = center.y - turn_radius;
    let bottom_y = center.y + turn_radius;

    let mut points =
        Vec::with_capacity(2 * (SPEEDWAY_STRAIGHT_SAMPLES + SPEEDWAY_ARC_SAMPLES));

    let straight = |points: &mut Vec<Vec2>, from: Vec2, to: Vec2| {
        for i in 0..SPEEDWAY_STRAIGHT_SAMPLES {
            points.push(from.lerp(to, i as f32 / SPEEDWAY_STRAIGHT_SAMPLES as f32));
        }
    };
    let arc = |points: &mut Vec<Vec2>, c: Vec2, from: f32| {
        for i in 0..SPEEDWAY_ARC_SAMPLES {
            let a = from + PI * (i as f32 / SPEEDWAY_ARC_SAMPLES as f32);
            points.push(c + Vec2::new(a.cos(), a.sin()) * turn_radius);
        }
    };

    straight(
        &mut points,
        Vec2::new(left.x, top_y),
        Vec2::new(right.x, top_y),
    );
    arc(&mut points, right, -FRAC_PI_2);
    straight(
        &mut points,
        Vec2::new(right.x, bottom_y),
        Vec2::new(left.x, bottom_y),
    );
    arc(&mut points, left, FRAC_PI_2);

    points
}

/// Lemniscate of Gerono: crosses itself at the canvas center
fn figure8_points(center: Vec2, width: f32, height: f32) -> Vec<Vec2> {
    let a = width * 0.38;
    let b = height * 0.76;
    (0..FIGURE8_SAMPLES)
        .map(|i| {
            let t = TAU * i as f32 / FIGURE8_SAMPLES as f32;
            center + Vec2::new(a * t.sin(), b * t.sin() * t.cos())
        })
        .collect()
}

/// Hand-placed road course control points, as fractions of the canvas
const ROAD_COURSE_CONTROLS: [(f32, f32); 11] = [
    (0.50, 0.14),
    (0.76, 0.12),
    (0.88, 0.26),
    (0.84, 0.44),
    (0.68, 0.52),
    (0.80, 0.70),
    (0.68, 0.87),
    (0.42, 0.85),
    (0.20, 0.78),
    (0.13, 0.52),
    (0.24, 0.24),
];

fn road_course_points(width: f32, height: f32) -> Vec<Vec2> {
    let controls: Vec<Vec2> = ROAD_COURSE_CONTROLS
        .iter()
        .map(|&(x, y)| Vec2::new(x * width, y * height))
        .collect();
    let dense = sample_closed_catmull_rom(&controls, ROAD_SAMPLES_PER_SPAN, CATMULL_ROM_ALPHA);
    resample_closed(&dense, ROAD_RESAMPLE_SPACING)
}

/// World position and facing angle for a car.
///
/// `additional_offset` is added to the lane's own offset (steering drift).
pub fn get_position_and_rotation(
    progress: f32,
    lane: u32,
    dimensions: &TrackDimensions,
    additional_offset: f32,
) -> (Vec2, f32) {
    let offset = dimensions.lane_offset(lane) + additional_offset;

    match &dimensions.path {
        Some(path) => path.position_and_rotation(progress, offset),
        None => oval_position_and_rotation(progress, dimensions, offset),
    }
}

fn oval_position_and_rotation(
    progress: f32,
    dimensions: &TrackDimensions,
    offset: f32,
) -> (Vec2, f32) {
    let (rx, ry) = (dimensions.radius_x, dimensions.radius_y);
    let angle = progress * TAU - FRAC_PI_2;
    let (sin, cos) = angle.sin_cos();
    let base = dimensions.center() + Vec2::new(rx * cos, ry * sin);

    // Left-hand normal of the clockwise tangent (driver's right, y down)
    let normal = Vec2::new(-ry * cos, -rx * sin);
    let len = normal.length();
    let position = if len > 0.0 {
        base + normal / len * offset
    } else {
        base
    };
    let rotation = angle + FRAC_PI_2;

    if position.is_finite() {
        (position, rotation)
    } else {
        (base, rotation)
    }
}

/// Position only
pub fn get_position_on_track(
    progress: f32,
    lane: u32,
    dimensions: &TrackDimensions,
    additional_offset: f32,
) -> Vec2 {
    get_position_and_rotation(progress, lane, dimensions, additional_offset).0
}

/// Rotation only; without dimensions the analytic oval formula is used
pub fn get_rotation_at_position(progress: f32, dimensions: Option<&TrackDimensions>) -> f32 {
    match dimensions {
        Some(dims) => get_position_and_rotation(progress, 0, dims, 0.0).1,
        None => oval_rotation(progress),
    }
}

/// Facing angle on the analytic oval
#[inline]
pub fn oval_rotation(progress: f32) -> f32 {
    progress * TAU
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 1200.0;
    const H: f32 = 800.0;

    #[test]
    fn test_track_type_parse() {
        assert_eq!("Figure-8".parse::<TrackType>(), Ok(TrackType::Figure8));
        assert_eq!("road_course".parse::<TrackType>(), Ok(TrackType::RoadCourse));
        assert!("moebius".parse::<TrackType>().is_err());
        for t in TrackType::ALL {
            assert_eq!(t.as_str().parse::<TrackType>(), Ok(t));
        }
    }

    #[test]
    fn test_track_width_grows_with_lanes() {
        assert_eq!(track_width_for_lanes(1), 70.0);
        assert_eq!(track_width_for_lanes(4), 160.0);
    }

    #[test]
    fn test_oval_has_no_path() {
        let dims = calculate_track_dimensions(W, H, 4, TrackType::Oval);
        assert!(dims.path.is_none());
        assert!((dims.radius_x - 504.0).abs() < 1e-3);
        assert!((dims.radius_y - 304.0).abs() < 1e-3);
    }

    #[test]
    fn test_oval_progress_zero_is_top() {
        let dims = calculate_track_dimensions(W, H, 3, TrackType::Oval);
        let (pos, rot) = get_position_and_rotation(0.0, 1, &dims, 0.0);
        assert!((pos - Vec2::new(600.0, 400.0 - 304.0)).length() < 1e-2);
        assert!(rot.abs() < 1e-6);

        // Quarter lap: rightmost point
        let pos = get_position_on_track(0.25, 1, &dims, 0.0);
        assert!((pos - Vec2::new(600.0 + 504.0, 400.0)).length() < 1e-2);
    }

    #[test]
    fn test_oval_lane_zero_is_outside() {
        let dims = calculate_track_dimensions(W, H, 3, TrackType::Oval);
        let (outer, _) = get_position_and_rotation(0.0, 0, &dims, 0.0);
        let (inner, _) = get_position_and_rotation(0.0, 2, &dims, 0.0);
        assert!(outer.y < inner.y);
    }

    #[test]
    fn test_positive_drift_moves_to_drivers_right() {
        for track in TrackType::ALL {
            let dims = calculate_track_dimensions(W, H, 3, track);
            for progress in [0.1, 0.4, 0.8] {
                let (base, rot) = get_position_and_rotation(progress, 1, &dims, 0.0);
                let (drifted, _) = get_position_and_rotation(progress, 1, &dims, 10.0);
                let right = Vec2::new(-rot.sin(), rot.cos());
                let side = (drifted - base).dot(right);
                assert!(side > 9.0, "{track} at {progress}: {side}");
            }
        }
    }

    #[test]
    fn test_path_prefix_sums() {
        for track in [TrackType::Speedway, TrackType::Figure8, TrackType::RoadCourse] {
            let dims = calculate_track_dimensions(W, H, 4, track);
            let path = dims.path.as_ref().unwrap();
            assert_eq!(path.cumulative_distances.len(), path.segments.len() + 1);
            assert_eq!(path.cumulative_distances[0], 0.0);
            assert!(path.cumulative_distances.windows(2).all(|w| w[0] <= w[1]));
            let last = *path.cumulative_distances.last().unwrap();
            assert_eq!(last, path.total_length);
            assert_eq!(path.points.len(), path.segments.len());
        }
    }

    #[test]
    fn test_speedway_sample_count() {
        let dims = calculate_track_dimensions(W, H, 4, TrackType::Speedway);
        let path = dims.path.unwrap();
        assert_eq!(path.segments.len(), 2 * (100 + 140));
    }

    #[test]
    fn test_speedway_turn_radius_floor() {
        // Eight lanes on a small canvas: turn radius must clear half the track
        let dims = calculate_track_dimensions(400.0, 300.0, 8, TrackType::Speedway);
        let path = dims.path.as_ref().unwrap();
        let min_y = path.points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let turn_radius = dims.center_y - min_y;
        assert!(turn_radius >= dims.track_width / 2.0 + 30.0 - 1e-3);
    }

    #[test]
    fn test_figure8_crosses_center() {
        let dims = calculate_track_dimensions(W, H, 2, TrackType::Figure8);
        let path = dims.path.unwrap();
        assert_eq!(path.segments.len(), 320);
        assert!((path.points[0] - Vec2::new(600.0, 400.0)).length() < 1e-3);
        assert!((path.points[160] - Vec2::new(600.0, 400.0)).length() < 1e-2);
    }

    #[test]
    fn test_road_course_uniform_spacing() {
        let dims = calculate_track_dimensions(W, H, 4, TrackType::RoadCourse);
        let path = dims.path.unwrap();
        let mean = path.total_length / path.segments.len() as f32;
        assert!((mean - 5.0).abs() < 0.1);
        for seg in &path.segments {
            // Chords of an evenly resampled curve never exceed the spacing
            assert!(seg.length() <= 5.1);
            assert!(seg.length() > 4.0);
        }
    }

    #[test]
    fn test_segment_index_lower_bound() {
        let path = TrackPath::from_segments(vec![
            PathSegment::straight(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)),
            PathSegment::straight(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)),
            PathSegment::straight(Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0)),
        ]);
        assert_eq!(path.segment_index(0.0), 0);
        assert_eq!(path.segment_index(5.0), 0);
        // Exactly on the boundary belongs to the segment ending there
        assert_eq!(path.segment_index(10.0), 0);
        assert_eq!(path.segment_index(10.5), 1);
        assert_eq!(path.segment_index(path.total_length), 2);
    }

    #[test]
    fn test_zero_length_segments_dropped() {
        let p = Vec2::new(1.0, 1.0);
        let path = TrackPath::from_closed_points(&[p, p, Vec2::new(5.0, 1.0), Vec2::new(5.0, 5.0)]);
        assert_eq!(path.segments.len(), 3);
    }

    #[test]
    fn test_negative_progress_wraps() {
        let dims = calculate_track_dimensions(W, H, 4, TrackType::RoadCourse);
        let (a, _) = get_position_and_rotation(-0.25, 1, &dims, 0.0);
        let (b, _) = get_position_and_rotation(0.75, 1, &dims, 0.0);
        assert!((a - b).length() < 1e-2);
    }

    #[test]
    fn test_custom_curve_track() {
        // Circle of radius 100 as two half-circle curves
        let c = Vec2::new(200.0, 200.0);
        let dims = TrackDimensions::from_segments(
            c,
            100.0,
            100.0,
            1,
            vec![
                PathSegment::curve(c, 100.0, -FRAC_PI_2, FRAC_PI_2),
                PathSegment::curve(c, 100.0, FRAC_PI_2, 3.0 * FRAC_PI_2),
            ],
            TrackType::Speedway,
        );
        for i in 0..16 {
            let p = i as f32 / 16.0;
            let (pos, _) = get_position_and_rotation(p, 0, &dims, 0.0);
            assert!((pos.distance(c) - 100.0).abs() < 1e-2);
        }
        let (top, rot) = get_position_and_rotation(0.0, 0, &dims, 0.0);
        assert!((top - Vec2::new(200.0, 100.0)).length() < 1e-2);
        assert!(rot.abs() < 1e-5);
    }

    #[test]
    fn test_start_line_spans_track_width() {
        for track in TrackType::ALL {
            let dims = calculate_track_dimensions(W, H, 4, track);
            let (a, b) = dims.start_line();
            assert!((a.distance(b) - dims.track_width).abs() < 1e-2, "{track}");
        }
    }

    #[test]
    fn test_rotation_without_dimensions() {
        assert_eq!(get_rotation_at_position(0.0, None), 0.0);
        assert!((get_rotation_at_position(0.5, None) - PI).abs() < 1e-6);
        let dims = calculate_track_dimensions(W, H, 1, TrackType::Oval);
        let r = get_rotation_at_position(0.25, Some(&dims));
        assert!((r - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_total_length_oval_circle() {
        let dims = calculate_track_dimensions(1000.0, 1000.0 * 0.42 / 0.38, 1, TrackType::Oval);
        // radii equal -> circumference 2πr
        assert!((dims.total_length() - TAU * 420.0).abs() < 0.5);
    }
}
