//! Tick-driven engine tying pen, erasers, store and highlight together.
//!
//! The host calls the tool methods when its input layer reports a discrete
//! change (pen trigger pressed, eraser picked up, ...) and [`Engine::tick`]
//! once per frame with the current tool positions. Every call runs to
//! completion and returns the [`Event`]s it produced; nothing is deferred.
//!
//! Within one tick the order is fixed: stroke sampling, then line marking,
//! then partial erase. A stroke committed earlier in the same frame is
//! therefore visible to every eraser that runs after it.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{Color, ConfigError, EngineConfig};
use crate::erase::{self, EraserTrail};
use crate::geom::Point;
use crate::mark::Highlight;
use crate::session::DrawingSession;
use crate::store::{PolylineId, PolylineStore};

/// Notifications for collaborators that mirror store state (counters, UI).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    LineAdded { id: PolylineId, color_index: usize, points: usize },
    LineRemoved { id: PolylineId, color_index: usize },
    /// A partial erase replaced the line's points; `points` is the new count.
    LineTrimmed { id: PolylineId, color_index: usize, points: usize },
    StoreCleared { removed: usize },
    LineMarked { id: PolylineId },
    MarkCleared,
}

/// Misuse reported back to the host. The offending operation is skipped and
/// engine state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("pen tip position unavailable while the pen needs it")]
    MissingTip,
    #[error("eraser position unavailable while the eraser is held")]
    MissingEraser,
    #[error("pixel eraser position unavailable while erasing")]
    MissingPixelEraser,
}

/// Collaborator input for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub now: Instant,
    pub pen_tip: Option<Point>,
    pub eraser: Option<Point>,
    pub pixel_eraser: Option<Point>,
}

impl FrameInput {
    /// A frame at `now` with no tool positions.
    #[must_use]
    pub fn at(now: Instant) -> Self {
        Self { now, pen_tip: None, eraser: None, pixel_eraser: None }
    }
}

/// Everything one tick produced.
#[derive(Debug, Default)]
pub struct TickReport {
    pub events: Vec<Event>,
    pub errors: Vec<EngineError>,
}

impl TickReport {
    fn fail(&mut self, error: EngineError) {
        tracing::warn!(%error, "operation skipped this tick");
        self.errors.push(error);
    }
}

/// Parameters a renderer needs to mask freshly erased geometry.
#[derive(Debug, Clone, Copy)]
pub struct EraseMask<'a> {
    pub position: Option<Point>,
    pub radius: f64,
    pub trail: &'a [Point],
}

/// Fixed-interval gate: open on first use, then at most once per interval.
#[derive(Debug, Clone)]
struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    fn ready_at(&self, now: Instant) -> bool {
        self.last.is_none_or(|last| now.saturating_duration_since(last) > self.interval)
    }

    fn record(&mut self, now: Instant) {
        self.last = Some(now);
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// The drawing and erasing engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    store: PolylineStore,
    session: DrawingSession,
    highlight: Highlight,
    trail: EraserTrail,
    mark_throttle: Throttle,
    color_index: usize,
    eraser_held: bool,
    pixel_erasing: bool,
    pixel_eraser_position: Option<Point>,
}

impl Engine {
    /// Build an engine from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(colors = config.color_count(), mode = ?config.partial_erase_mode, "engine initialized");
        Ok(Self {
            store: PolylineStore::new(config.color_count()),
            session: DrawingSession::new(config.min_move_distance, config.simplify_tolerance),
            highlight: Highlight::new(),
            trail: EraserTrail::new(config.eraser_trail_capacity, config.pixel_eraser_min_move_distance),
            mark_throttle: Throttle::new(config.check_erase_interval()),
            color_index: 0,
            eraser_held: false,
            pixel_erasing: false,
            pixel_eraser_position: None,
            config,
        })
    }

    // --- Frame ---

    /// Advance one frame.
    pub fn tick(&mut self, input: &FrameInput) -> TickReport {
        let mut report = TickReport::default();

        if self.session.is_active() {
            match input.pen_tip {
                Some(tip) => {
                    self.session.update(tip);
                }
                None => report.fail(EngineError::MissingTip),
            }
        }

        if self.eraser_held {
            if self.mark_throttle.ready_at(input.now) {
                match input.eraser {
                    Some(position) => {
                        report.events.extend(self.mark_at(position));
                        self.mark_throttle.record(input.now);
                    }
                    None => report.fail(EngineError::MissingEraser),
                }
            }
        }

        if self.pixel_erasing {
            match input.pixel_eraser {
                Some(position) => report.events.extend(self.pixel_erase_at(position)),
                None => report.fail(EngineError::MissingPixelEraser),
            }
        }

        report
    }

    // --- Pen ---

    /// Pen trigger pressed: start a stroke at the tip.
    pub fn pen_down(&mut self, tip: Option<Point>) -> Result<(), EngineError> {
        let Some(tip) = tip else {
            tracing::warn!("pen down without a tip position");
            return Err(EngineError::MissingTip);
        };
        self.session.start(tip, self.color_index);
        Ok(())
    }

    /// Pen trigger released: commit the stroke.
    pub fn pen_up(&mut self) -> Vec<Event> {
        match self.session.commit(&mut self.store) {
            Some(line) => {
                self.store.rebuild_dirty();
                vec![Event::LineAdded { id: line.id(), color_index: line.color_index(), points: line.points().len() }]
            }
            None => Vec::new(),
        }
    }

    /// Pen let go of mid-stroke: the stroke is discarded.
    pub fn pen_dropped(&mut self) {
        self.session.cancel();
    }

    /// Select a color slot; out-of-range values are clamped.
    pub fn set_color(&mut self, color_index: usize) {
        self.color_index = self.store.clamp_color(color_index);
    }

    /// Cycle to the next color slot, wrapping around.
    pub fn increment_color(&mut self) {
        self.color_index = (self.color_index + 1) % self.config.color_count();
    }

    #[must_use]
    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// Color the pen model should show.
    #[must_use]
    pub fn active_color(&self) -> Color {
        self.config.colors.get(self.color_index).copied().unwrap_or(Color::rgb(1.0, 1.0, 1.0))
    }

    // --- Line eraser ---

    pub fn eraser_picked_up(&mut self) {
        self.eraser_held = true;
    }

    /// Eraser released: drop the highlight immediately.
    pub fn eraser_dropped(&mut self) -> Vec<Event> {
        self.eraser_held = false;
        self.mark_throttle.reset();
        self.clear_mark().into_iter().collect()
    }

    /// Eraser trigger: remove the touched line, or every line when the engine
    /// is configured for clear-all.
    pub fn eraser_use(&mut self, position: Option<Point>) -> Result<Vec<Event>, EngineError> {
        let Some(position) = position else {
            tracing::warn!("eraser used without a position");
            return Err(EngineError::MissingEraser);
        };
        let radius = self.config.erase_radius;
        let mut events = if self.config.clear_all {
            erase::clear_all_if_touching(&mut self.store, position, radius)
        } else {
            erase::erase_touching(&mut self.store, position, radius)
        };
        events.extend(self.drop_stale_mark());
        Ok(events)
    }

    // --- Pixel eraser ---

    pub fn pixel_erase_start(&mut self) {
        self.pixel_erasing = true;
    }

    /// Stop partial erasing; the next pass starts from a fresh trail.
    pub fn pixel_erase_stop(&mut self) {
        self.pixel_erasing = false;
        self.pixel_eraser_position = None;
        self.trail.reset();
    }

    #[must_use]
    pub fn is_pixel_erasing(&self) -> bool {
        self.pixel_erasing
    }

    // --- Whole store ---

    /// Remove every line, abandon the current stroke and clear the highlight.
    pub fn clear(&mut self) -> Vec<Event> {
        let removed = self.store.clear();
        self.store.rebuild_dirty();
        self.session.cancel();
        let mut events = vec![Event::StoreCleared { removed }];
        events.extend(self.clear_mark());
        events
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &PolylineStore {
        &self.store
    }

    /// Flattened render buffer for one color.
    pub fn render_buffer(&mut self, color_index: usize) -> &[Point] {
        self.store.render_buffer(color_index)
    }

    /// Points of the highlighted line; empty when nothing is marked.
    #[must_use]
    pub fn highlight(&self) -> &[Point] {
        self.highlight.points()
    }

    #[must_use]
    pub fn marked_id(&self) -> Option<PolylineId> {
        self.highlight.marked_id()
    }

    /// The stroke being drawn, for a preview renderer.
    #[must_use]
    pub fn current_stroke(&self) -> &[Point] {
        self.session.points()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.session.is_active()
    }

    #[must_use]
    pub fn erase_mask(&self) -> EraseMask<'_> {
        EraseMask {
            position: self.pixel_eraser_position,
            radius: self.config.pixel_erase_radius,
            trail: self.trail.mask_points(),
        }
    }

    // --- Internals ---

    fn mark_at(&mut self, position: Point) -> Option<Event> {
        let previous = self.highlight.marked_id();
        let current = self.highlight.mark(&self.store, position, self.config.erase_radius);
        if current == previous {
            return None;
        }
        Some(match current {
            Some(id) => Event::LineMarked { id },
            None => Event::MarkCleared,
        })
    }

    fn clear_mark(&mut self) -> Option<Event> {
        if self.highlight.is_empty() {
            return None;
        }
        self.highlight.clear();
        Some(Event::MarkCleared)
    }

    /// Clear the highlight if its line no longer exists in its marked form.
    fn drop_stale_mark(&mut self) -> Option<Event> {
        let id = self.highlight.marked_id()?;
        let still_valid = self
            .store
            .index_of(id)
            .and_then(|i| self.store.get(i))
            .is_some_and(|line| line.points() == self.highlight.points());
        if still_valid { None } else { self.clear_mark() }
    }

    fn pixel_erase_at(&mut self, position: Point) -> Vec<Event> {
        self.pixel_eraser_position = Some(position);
        if !self.trail.sample(position) {
            return Vec::new();
        }
        let mut events = erase::partial_erase(
            &mut self.store,
            position,
            self.config.pixel_erase_radius,
            self.config.partial_erase_mode,
        );
        if !events.is_empty() {
            events.extend(self.drop_stale_mark());
        }
        events
    }
}
