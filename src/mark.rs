//! Highlight of the line an eraser is currently pointing at.
//!
//! The highlight is a copy of the target line's points, so it stays valid for
//! the renderer even if the store changes before the next marking pass.

#[cfg(test)]
#[path = "mark_test.rs"]
mod mark_test;

use crate::geom::Point;
use crate::store::{PolylineId, PolylineStore};

/// At most one highlighted polyline.
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    marked: Option<PolylineId>,
    points: Vec<Point>,
}

impl Highlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the highlight with the first line touching the sphere, if any.
    pub fn mark(&mut self, store: &PolylineStore, center: Point, radius: f64) -> Option<PolylineId> {
        self.clear();
        let line = store.get(store.find_first_intersecting(center, radius)?)?;
        self.points.extend_from_slice(line.points());
        self.marked = Some(line.id());
        self.marked
    }

    pub fn clear(&mut self) {
        self.marked = None;
        self.points.clear();
    }

    #[must_use]
    pub fn marked_id(&self) -> Option<PolylineId> {
        self.marked
    }

    /// Highlight buffer; empty when nothing is marked.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marked.is_none()
    }
}
