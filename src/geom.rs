//! Geometry primitives: axis-aligned boxes and sphere intersection tests.
//!
//! Every eraser query goes through these two tests. The box test is the cheap
//! rejection layer; the segment test is exact.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use glam::DVec3;

use crate::consts::DEGENERATE_SEGMENT_EPSILON_SQ;

/// A point in world space.
pub type Point = DVec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Point,
    max: Point,
}

impl Aabb {
    /// Box spanning exactly `min..=max`.
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Zero-volume box around a single point.
    #[must_use]
    pub fn at(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Tight box around `points`, or `None` when the slice is empty.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(Self::at(*first), |b, p| b.expanded_to_contain(*p)))
    }

    #[must_use]
    pub fn expanded_to_contain(self, point: Point) -> Self {
        Self::new(self.min.min(point), self.max.max(point))
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[must_use]
    pub fn min(&self) -> Point {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Point {
        self.max
    }

    #[must_use]
    pub fn intersects_sphere(&self, center: Point, radius: f64) -> bool {
        sphere_intersects_box(center, radius, self.min, self.max)
    }
}

/// Separating-interval test between a sphere and a box.
///
/// Conservative: the sphere is treated as its own bounding cube, so corners
/// can report a hit the exact test would reject. Touching counts as a hit.
#[must_use]
pub fn sphere_intersects_box(center: Point, radius: f64, box_min: Point, box_max: Point) -> bool {
    if center.x + radius < box_min.x || center.x - radius > box_max.x {
        return false;
    }
    if center.y + radius < box_min.y || center.y - radius > box_max.y {
        return false;
    }
    if center.z + radius < box_min.z || center.z - radius > box_max.z {
        return false;
    }
    true
}

/// Whether the sphere touches the segment `a..b`.
///
/// Uses the closest point on the segment, not on the infinite line. A
/// degenerate segment is tested as the single point `a`.
#[must_use]
pub fn sphere_intersects_segment(center: Point, radius: f64, a: Point, b: Point) -> bool {
    closest_point_on_segment(center, a, b).distance_squared(center) <= radius * radius
}

/// Closest point to `p` on the segment `a..b`.
#[must_use]
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= DEGENERATE_SEGMENT_EPSILON_SQ {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Iterate the consecutive segments of a point sequence.
pub fn segments(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    points.windows(2).map(|w| (w[0], w[1]))
}

/// Whether any segment of `points` touches the sphere.
#[must_use]
pub fn polyline_intersects_sphere(points: &[Point], center: Point, radius: f64) -> bool {
    segments(points).any(|(a, b)| sphere_intersects_segment(center, radius, a, b))
}
