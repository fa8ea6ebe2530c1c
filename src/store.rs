//! Polyline store: the committed strokes and their cached bounds.
//!
//! Lines are kept in insertion order, and that order is part of the
//! contract: every search walks the lines front to back and the first hit
//! wins, so when an eraser touches two overlapping strokes the older one is
//! the one affected.
//!
//! Every mutation marks the affected color's render buffer dirty; buffers are
//! rebuilt lazily on read or eagerly through [`PolylineStore::rebuild_dirty`].

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use uuid::Uuid;

use crate::buffer::BufferBuilder;
use crate::consts::BREAK_SENTINEL;
use crate::geom::{self, Aabb, Point};

/// Unique identifier for a committed polyline.
pub type PolylineId = Uuid;

/// One committed stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    id: PolylineId,
    color_index: usize,
    points: Vec<Point>,
    bounds: Aabb,
}

impl Polyline {
    /// Build a live polyline; `None` when fewer than two points are given.
    #[must_use]
    pub fn new(points: Vec<Point>, color_index: usize) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let bounds = Aabb::from_points(&points)?;
        Some(Self { id: Uuid::new_v4(), color_index, points, bounds })
    }

    #[must_use]
    pub fn id(&self) -> PolylineId {
        self.id
    }

    #[must_use]
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Fewer than two points; such a line must be pruned before anyone sees it.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.points.len() < 2
    }

    /// Cheap bounds rejection followed by the exact per-segment test.
    #[must_use]
    pub fn intersects_sphere(&self, center: Point, radius: f64) -> bool {
        self.bounds.intersects_sphere(center, radius) && geom::polyline_intersects_sphere(&self.points, center, radius)
    }
}

/// Ordered store of committed polylines plus their render buffers.
#[derive(Debug, Clone)]
pub struct PolylineStore {
    lines: Vec<Polyline>,
    buffers: BufferBuilder,
}

impl PolylineStore {
    /// Empty store with `color_count` color slots.
    #[must_use]
    pub fn new(color_count: usize) -> Self {
        Self { lines: Vec::new(), buffers: BufferBuilder::new(color_count) }
    }

    #[must_use]
    pub fn color_count(&self) -> usize {
        self.buffers.color_count()
    }

    /// Clamp a requested color index into `[0, color_count)`.
    #[must_use]
    pub fn clamp_color(&self, color_index: usize) -> usize {
        color_index.min(self.color_count().saturating_sub(1))
    }

    /// Append a polyline. Returns `None` (and stores nothing) for fewer than
    /// two points, non-finite coordinates, or points equal to the break
    /// sentinel. Out-of-range colors are clamped.
    pub fn add(&mut self, points: Vec<Point>, color_index: usize) -> Option<PolylineId> {
        if self.color_count() == 0 {
            return None;
        }
        if points.iter().any(|p| !p.is_finite() || *p == BREAK_SENTINEL) {
            tracing::debug!("rejecting stroke with non-finite or sentinel coordinates");
            return None;
        }
        let color = self.clamp_color(color_index);
        if color != color_index {
            tracing::debug!(requested = color_index, clamped = color, "color index clamped");
        }
        let line = Polyline::new(points, color)?;
        let id = line.id;
        tracing::debug!(line = %id, color, points = line.points.len(), "polyline added");
        self.lines.push(line);
        self.buffers.invalidate(color);
        Some(id)
    }

    /// Remove the polyline at `index`, preserving the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> Option<Polyline> {
        if index >= self.lines.len() {
            return None;
        }
        let line = self.lines.remove(index);
        self.buffers.invalidate(line.color_index);
        tracing::debug!(line = %line.id, color = line.color_index, "polyline removed");
        Some(line)
    }

    /// Index of the first polyline (in store order) with a segment touching
    /// the sphere.
    #[must_use]
    pub fn find_first_intersecting(&self, center: Point, radius: f64) -> Option<usize> {
        self.lines.iter().position(|line| line.intersects_sphere(center, radius))
    }

    /// Remove every polyline and invalidate every buffer. Returns how many
    /// lines were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.lines.len();
        self.lines.clear();
        self.buffers.invalidate_all();
        tracing::debug!(removed, "store cleared");
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Polyline> {
        self.lines.get(index)
    }

    /// All polylines in store order.
    #[must_use]
    pub fn lines(&self) -> &[Polyline] {
        &self.lines
    }

    #[must_use]
    pub fn index_of(&self, id: PolylineId) -> Option<usize> {
        self.lines.iter().position(|l| l.id == id)
    }

    /// Union of the bounds of every polyline of `color_index`.
    #[must_use]
    pub fn color_bounds(&self, color_index: usize) -> Option<Aabb> {
        self.lines
            .iter()
            .filter(|l| l.color_index == color_index)
            .map(Polyline::bounds)
            .reduce(Aabb::union)
    }

    // --- Render buffers ---

    /// Render buffer for a color, rebuilt first if stale.
    pub fn render_buffer(&mut self, color_index: usize) -> &[Point] {
        if self.buffers.is_dirty(color_index) {
            self.buffers.rebuild(color_index, &self.lines);
        }
        self.buffers.get(color_index)
    }

    /// Force a rebuild of one color's buffer.
    pub fn rebuild(&mut self, color_index: usize) {
        self.buffers.rebuild(color_index, &self.lines);
    }

    pub fn rebuild_dirty(&mut self) {
        self.buffers.rebuild_dirty(&self.lines);
    }

    #[must_use]
    pub fn buffers(&self) -> &BufferBuilder {
        &self.buffers
    }

    // --- Erase support ---

    /// Replace a line's points in place. Fewer than two points leaves the
    /// line dead until [`Self::prune_dead`] runs.
    pub(crate) fn set_points(&mut self, index: usize, points: Vec<Point>) {
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        match Aabb::from_points(&points) {
            Some(bounds) if points.len() >= 2 => {
                line.bounds = bounds;
                line.points = points;
            }
            _ => line.points.clear(),
        }
        self.buffers.invalidate(line.color_index);
    }

    /// Insert a new line of the same color directly after `index`.
    pub(crate) fn insert_after(&mut self, index: usize, points: Vec<Point>) -> Option<PolylineId> {
        let color = self.lines.get(index)?.color_index;
        let line = Polyline::new(points, color)?;
        let id = line.id;
        self.lines.insert(index + 1, line);
        self.buffers.invalidate(color);
        Some(id)
    }

    /// Drop every dead line, returning their ids and colors in store order.
    pub(crate) fn prune_dead(&mut self) -> Vec<(PolylineId, usize)> {
        let mut pruned = Vec::new();
        self.lines.retain(|line| {
            if line.is_dead() {
                pruned.push((line.id, line.color_index));
                false
            } else {
                true
            }
        });
        for &(_, color) in &pruned {
            self.buffers.invalidate(color);
        }
        pruned
    }
}
