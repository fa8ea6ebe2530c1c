//! The stroke currently being drawn.
//!
//! A session lives between pen-down and pen-up. It is seeded with two copies
//! of the tip position so a preview renderer always has a drawable segment,
//! samples the tip whenever it has moved far enough, and on commit hands a
//! simplified copy of its points to the store.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::geom::Point;
use crate::simplify::simplify;
use crate::store::{Polyline, PolylineStore};

/// In-progress stroke state.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    active: bool,
    color_index: usize,
    points: Vec<Point>,
    last_committed_position: Point,
    min_move_distance: f64,
    simplify_tolerance: f64,
}

impl DrawingSession {
    #[must_use]
    pub fn new(min_move_distance: f64, simplify_tolerance: f64) -> Self {
        Self {
            active: false,
            color_index: 0,
            points: Vec::new(),
            last_committed_position: Point::ZERO,
            min_move_distance,
            simplify_tolerance,
        }
    }

    /// Begin a stroke at `tip`. Restarting an active session discards the
    /// previous points.
    pub fn start(&mut self, tip: Point, color_index: usize) {
        self.active = true;
        self.color_index = color_index;
        self.points.clear();
        self.points.extend([tip, tip]);
        self.last_committed_position = tip;
        tracing::debug!(color = color_index, "stroke started");
    }

    /// Record `tip` if it moved more than the minimum distance since the last
    /// recorded point. Non-finite samples are skipped. Returns whether a point
    /// was appended.
    pub fn update(&mut self, tip: Point) -> bool {
        if !self.active {
            return false;
        }
        if !tip.is_finite() {
            tracing::debug!("skipping non-finite tip sample");
            return false;
        }
        let threshold = self.min_move_distance * self.min_move_distance;
        if tip.distance_squared(self.last_committed_position) <= threshold {
            return false;
        }
        self.points.push(tip);
        self.last_committed_position = tip;
        true
    }

    /// Finish the stroke: simplify, insert into `store`, and return a copy of
    /// the stored polyline. Strokes that simplify to fewer than two points
    /// are dropped silently.
    pub fn commit(&mut self, store: &mut PolylineStore) -> Option<Polyline> {
        if !self.active {
            return None;
        }
        self.active = false;
        let raw = std::mem::take(&mut self.points);
        let simplified = simplify(&raw, self.simplify_tolerance);
        if simplified.len() < 2 {
            tracing::debug!(raw = raw.len(), "stroke too short after simplification, discarded");
            return None;
        }
        let id = store.add(simplified, self.color_index)?;
        let index = store.index_of(id)?;
        store.get(index).cloned()
    }

    /// Drop the in-progress stroke without committing it.
    pub fn cancel(&mut self) {
        if self.active {
            tracing::debug!(points = self.points.len(), "stroke cancelled");
        }
        self.active = false;
        self.points.clear();
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Points of the stroke being drawn; empty when inactive.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
