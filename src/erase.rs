//! Erase operations over the polyline store.
//!
//! Three erasers share one sphere query:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`erase_touching`] | removes the first line (store order) the sphere touches |
//! | [`clear_all_if_touching`] | clears the whole store if the sphere touches any line |
//! | [`partial_erase`] | removes only the touched segments, splicing the rest |
//!
//! All three run to completion, leave no dead lines behind and rebuild the
//! affected render buffers before returning.
//!
//! ## Partial erase splicing
//!
//! In [`PartialEraseMode::Toggle`] each line is walked segment by segment.
//! The output starts with the first point; a segment that misses the sphere
//! contributes its end point unless removal is active, and a segment that
//! touches the sphere contributes nothing and flips removal on or off. Two
//! touched segments in a row therefore resume keeping points on the *same*
//! line, bridging the erased gap; an odd count drops the rest of the line.
//!
//! [`PartialEraseMode::Split`] cuts at every touched segment instead and
//! turns each kept run of two or more points into its own line.

#[cfg(test)]
#[path = "erase_test.rs"]
mod erase_test;

use crate::config::PartialEraseMode;
use crate::engine::Event;
use crate::geom::{Point, segments, sphere_intersects_segment};
use crate::store::PolylineStore;

// =============================================================================
// WHOLE-LINE AND CLEAR-ALL
// =============================================================================

/// Remove the first polyline touching the sphere. At most one line per call.
pub fn erase_touching(store: &mut PolylineStore, center: Point, radius: f64) -> Vec<Event> {
    let Some(index) = store.find_first_intersecting(center, radius) else {
        return Vec::new();
    };
    let Some(line) = store.remove_at(index) else {
        return Vec::new();
    };
    store.rebuild_dirty();
    vec![Event::LineRemoved { id: line.id(), color_index: line.color_index() }]
}

/// Clear every line of every color if the sphere touches any one of them.
pub fn clear_all_if_touching(store: &mut PolylineStore, center: Point, radius: f64) -> Vec<Event> {
    if store.find_first_intersecting(center, radius).is_none() {
        return Vec::new();
    }
    let removed = store.clear();
    store.rebuild_dirty();
    vec![Event::StoreCleared { removed }]
}

// =============================================================================
// PARTIAL ERASE
// =============================================================================

/// Erase the parts of every line that the sphere touches.
pub fn partial_erase(store: &mut PolylineStore, center: Point, radius: f64, mode: PartialEraseMode) -> Vec<Event> {
    if store.is_empty() {
        return Vec::new();
    }

    // Coarse rejection: whole colors whose combined bounds miss the sphere.
    let colors_hit: Vec<bool> = (0..store.color_count())
        .map(|c| store.color_bounds(c).is_some_and(|b| b.intersects_sphere(center, radius)))
        .collect();
    if !colors_hit.contains(&true) {
        return Vec::new();
    }

    let mut events = Vec::new();
    let mut index = 0;
    while let Some(line) = store.get(index) {
        let color_index = line.color_index();
        let candidate =
            colors_hit.get(color_index).copied().unwrap_or(false) && line.bounds().intersects_sphere(center, radius);
        if !candidate {
            index += 1;
            continue;
        }
        let id = line.id();

        match mode {
            PartialEraseMode::Toggle => {
                if let Some(kept) = splice_toggle(line.points(), center, radius) {
                    let remaining = kept.len();
                    store.set_points(index, kept);
                    if remaining >= 2 {
                        events.push(Event::LineTrimmed { id, color_index, points: remaining });
                    }
                }
                index += 1;
            }
            PartialEraseMode::Split => {
                let Some(runs) = splice_split(line.points(), center, radius) else {
                    index += 1;
                    continue;
                };
                let mut runs = runs.into_iter();
                let first = runs.next().unwrap_or_default();
                let remaining = first.len();
                store.set_points(index, first);
                if remaining >= 2 {
                    events.push(Event::LineTrimmed { id, color_index, points: remaining });
                }
                let mut last = index;
                for run in runs {
                    let points = run.len();
                    if let Some(new_id) = store.insert_after(last, run) {
                        last += 1;
                        events.push(Event::LineAdded { id: new_id, color_index, points });
                    }
                }
                index = last + 1;
            }
        }
    }

    for (id, color_index) in store.prune_dead() {
        events.push(Event::LineRemoved { id, color_index });
    }
    if !events.is_empty() {
        store.rebuild_dirty();
        tracing::debug!(changes = events.len(), ?mode, "partial erase applied");
    }
    events
}

/// Toggle splice of one line. `None` when no segment touches the sphere;
/// otherwise the kept points (possibly fewer than two).
#[must_use]
pub fn splice_toggle(points: &[Point], center: Point, radius: f64) -> Option<Vec<Point>> {
    let first = *points.first()?;
    let mut kept = vec![first];
    let mut removing = false;
    let mut removed = false;
    for (a, b) in segments(points) {
        if sphere_intersects_segment(center, radius, a, b) {
            removing = !removing;
            removed = true;
        } else if !removing {
            kept.push(b);
        }
    }
    removed.then_some(kept)
}

/// Split splice of one line. `None` when no segment touches the sphere;
/// otherwise every kept run of at least two points, in order.
#[must_use]
pub fn splice_split(points: &[Point], center: Point, radius: f64) -> Option<Vec<Vec<Point>>> {
    let first = *points.first()?;
    let mut runs = Vec::new();
    let mut current = vec![first];
    let mut removed = false;
    for (a, b) in segments(points) {
        if sphere_intersects_segment(center, radius, a, b) {
            removed = true;
            let finished = std::mem::replace(&mut current, vec![b]);
            if finished.len() >= 2 {
                runs.push(finished);
            }
        } else {
            current.push(b);
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    removed.then_some(runs)
}

// =============================================================================
// ERASER TRAIL
// =============================================================================

/// Recent partial-eraser positions for a visual mask, plus the sampling gate
/// that rate-limits geometric partial erase.
///
/// The trail is a fixed-size ring: once full, the oldest sample is
/// overwritten. Unused slots hold `+inf` so a shader treats them as absent.
#[derive(Debug, Clone)]
pub struct EraserTrail {
    slots: Vec<Point>,
    next: usize,
    last_sample: Option<Point>,
    min_move_distance: f64,
}

impl EraserTrail {
    #[must_use]
    pub fn new(capacity: usize, min_move_distance: f64) -> Self {
        Self { slots: vec![Point::INFINITY; capacity], next: 0, last_sample: None, min_move_distance }
    }

    /// Record `position` if the eraser moved farther than the minimum distance
    /// since the last accepted sample. The first sample is always accepted.
    pub fn sample(&mut self, position: Point) -> bool {
        if let Some(last) = self.last_sample {
            if position.distance_squared(last) <= self.min_move_distance * self.min_move_distance {
                return false;
            }
        }
        self.last_sample = Some(position);
        if let Some(slot) = self.slots.get_mut(self.next) {
            *slot = position;
            self.next = (self.next + 1) % self.slots.len();
        }
        true
    }

    /// Ring contents in slot order (not chronological once wrapped).
    #[must_use]
    pub fn mask_points(&self) -> &[Point] {
        &self.slots
    }

    #[must_use]
    pub fn last_sample(&self) -> Option<Point> {
        self.last_sample
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Forget every sample.
    pub fn reset(&mut self) {
        self.slots.fill(Point::INFINITY);
        self.next = 0;
        self.last_sample = None;
    }
}
