//! Stroke simplification applied when a stroke is committed.
//!
//! Two passes with the same tolerance:
//!
//! 1. **Radial**: drops every point within `tolerance` of the last kept
//!    point. Coincident points are always dropped, so a stroke that never left
//!    its starting point collapses to a single point. Otherwise the final
//!    input point always ends the output, standing in for the last kept one.
//! 2. **Ramer–Douglas–Peucker**: drops interior points whose distance to the
//!    chord of their span does not exceed `tolerance` (near-collinear runs).

#[cfg(test)]
#[path = "simplify_test.rs"]
mod simplify_test;

use crate::geom::{Point, closest_point_on_segment};

/// Simplify `points` with the given tolerance. Negative tolerances act as zero.
#[must_use]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    let tolerance = tolerance.max(0.0);
    let radial = radial_pass(points, tolerance);
    douglas_peucker(&radial, tolerance)
}

/// Keep a point only when it lies farther than `tolerance` from the last kept one.
#[must_use]
pub fn radial_pass(points: &[Point], tolerance: f64) -> Vec<Point> {
    let tol_sq = tolerance * tolerance;
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points {
        match out.last() {
            Some(last) if last.distance_squared(point) <= tol_sq => {}
            _ => out.push(point),
        }
    }
    // The stroke must still end where the pen lifted.
    if out.len() >= 2 {
        if let (Some(last), Some(&end)) = (out.last_mut(), points.last()) {
            *last = end;
        }
    }
    out
}

/// Ramer–Douglas–Peucker over `points`; endpoints are always kept.
#[must_use]
pub fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    let last = points.len() - 1;
    keep[0] = true;
    keep[last] = true;
    rdp_span(points, tolerance, 0, last, &mut keep);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn rdp_span(points: &[Point], tolerance: f64, start: usize, end: usize, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let (a, b) = (points[start], points[end]);
    let mut max_idx = start;
    let mut max_dist = -1.0;
    for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = closest_point_on_segment(p, a, b).distance(p);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        keep[max_idx] = true;
        rdp_span(points, tolerance, start, max_idx, keep);
        rdp_span(points, tolerance, max_idx, end, keep);
    }
}
