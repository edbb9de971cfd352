//! Closed centripetal Catmull-Rom splines and arc-length resampling
//!
//! Parametric sampling of a Catmull-Rom spline bunches points on tight
//! spans and spreads them on long ones. The road course is therefore
//! sampled densely first, then resampled at equal distances so that a
//! progress fraction maps linearly onto track length.

use glam::Vec2;

/// Knot interval floor so coincident control points don't divide by zero
const MIN_KNOT_STEP: f32 = 1e-4;

/// Sample a closed centripetal Catmull-Rom spline through `controls`.
///
/// Each span between consecutive control points yields `samples_per_span`
/// points (span end excluded), so the result has
/// `controls.len() * samples_per_span` points and does not repeat the first.
pub fn sample_closed_catmull_rom(
    controls: &[Vec2],
    samples_per_span: usize,
    alpha: f32,
) -> Vec<Vec2> {
    let n = controls.len();
    if n < 3 || samples_per_span == 0 {
        return controls.to_vec();
    }

    let mut points = Vec::with_capacity(n * samples_per_span);
    for i in 0..n {
        let p0 = controls[(i + n - 1) % n];
        let p1 = controls[i];
        let p2 = controls[(i + 1) % n];
        let p3 = controls[(i + 2) % n];

        let t0 = 0.0;
        let t1 = t0 + knot_step(p0, p1, alpha);
        let t2 = t1 + knot_step(p1, p2, alpha);
        let t3 = t2 + knot_step(p2, p3, alpha);

        for s in 0..samples_per_span {
            let t = t1 + (t2 - t1) * (s as f32 / samples_per_span as f32);
            points.push(barry_goldman(p0, p1, p2, p3, t0, t1, t2, t3, t));
        }
    }
    points
}

#[inline]
fn knot_step(a: Vec2, b: Vec2, alpha: f32) -> f32 {
    a.distance(b).powf(alpha).max(MIN_KNOT_STEP)
}

/// Barry-Goldman pyramidal evaluation of one Catmull-Rom span
#[allow(clippy::too_many_arguments)]
fn barry_goldman(
    p0: Vec2,
    p1: Vec2,
    p2: Vec2,
    p3: Vec2,
    t0: f32,
    t1: f32,
    t2: f32,
    t3: f32,
    t: f32,
) -> Vec2 {
    let a1 = p0 * ((t1 - t) / (t1 - t0)) + p1 * ((t - t0) / (t1 - t0));
    let a2 = p1 * ((t2 - t) / (t2 - t1)) + p2 * ((t - t1) / (t2 - t1));
    let a3 = p2 * ((t3 - t) / (t3 - t2)) + p3 * ((t - t2) / (t3 - t2));

    let b1 = a1 * ((t2 - t) / (t2 - t0)) + a2 * ((t - t0) / (t2 - t0));
    let b2 = a2 * ((t3 - t) / (t3 - t1)) + a3 * ((t - t1) / (t3 - t1));

    b1 * ((t2 - t) / (t2 - t1)) + b2 * ((t - t1) / (t2 - t1))
}

/// Perimeter of a closed polyline, closing edge included
pub fn closed_length(points: &[Vec2]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.distance(*b))
        .sum()
}

/// Resample a closed polyline at (approximately) `spacing` pixel intervals.
///
/// The point count is `round(perimeter / spacing)` (at least 3) and the
/// actual spacing is stretched so the last interval closes the loop exactly.
/// The first output point equals the first input point.
pub fn resample_closed(points: &[Vec2], spacing: f32) -> Vec<Vec2> {
    let total = closed_length(points);
    if points.len() < 3 || total <= 0.0 || spacing <= 0.0 {
        return points.to_vec();
    }

    let count = ((total / spacing).round() as usize).max(3);
    let step = total / count as f32;

    let mut out = Vec::with_capacity(count);
    let mut edge = 0;
    let mut edge_start_dist = 0.0;
    let n = points.len();

    for k in 0..count {
        let target = k as f32 * step;
        // Advance to the edge containing `target`
        loop {
            let a = points[edge];
            let b = points[(edge + 1) % n];
            let len = a.distance(b);
            if target <= edge_start_dist + len || edge == n - 1 {
                let t = if len > 0.0 {
                    ((target - edge_start_dist) / len).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                out.push(a.lerp(b, t));
                break;
            }
            edge_start_dist += len;
            edge += 1;
        }
    }
    out
}
