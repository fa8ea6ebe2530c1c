//! Per-color render buffers.
//!
//! Each color slot owns one flat sequence of positions: every polyline of
//! that color in store order, each preceded by [`BREAK_SENTINEL`] so a line
//! renderer knows not to connect it to the previous stroke. Buffers are
//! rebuilt from scratch when dirty rather than patched in place.

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;

use crate::consts::BREAK_SENTINEL;
use crate::geom::Point;
use crate::store::Polyline;

/// Flattened render buffers, one per color slot, with dirty tracking.
#[derive(Debug, Clone)]
pub struct BufferBuilder {
    buffers: Vec<Vec<Point>>,
    dirty: Vec<bool>,
}

impl BufferBuilder {
    /// Empty, clean buffers for `color_count` slots.
    #[must_use]
    pub fn new(color_count: usize) -> Self {
        Self { buffers: vec![Vec::new(); color_count], dirty: vec![false; color_count] }
    }

    #[must_use]
    pub fn color_count(&self) -> usize {
        self.buffers.len()
    }

    /// Mark one color's buffer as stale. Out-of-range colors are ignored.
    pub fn invalidate(&mut self, color_index: usize) {
        if let Some(flag) = self.dirty.get_mut(color_index) {
            *flag = true;
        }
    }

    pub fn invalidate_all(&mut self) {
        self.dirty.iter_mut().for_each(|d| *d = true);
    }

    #[must_use]
    pub fn is_dirty(&self, color_index: usize) -> bool {
        self.dirty.get(color_index).copied().unwrap_or(false)
    }

    /// Recompute one color's buffer from `lines` and mark it clean.
    pub fn rebuild(&mut self, color_index: usize, lines: &[Polyline]) {
        let Some(buffer) = self.buffers.get_mut(color_index) else {
            return;
        };
        buffer.clear();
        for line in lines.iter().filter(|l| l.color_index() == color_index) {
            buffer.push(BREAK_SENTINEL);
            buffer.extend_from_slice(line.points());
        }
        self.dirty[color_index] = false;
        tracing::trace!(color = color_index, len = buffer.len(), "render buffer rebuilt");
    }

    /// Rebuild every dirty buffer.
    pub fn rebuild_dirty(&mut self, lines: &[Polyline]) {
        for color in 0..self.buffers.len() {
            if self.dirty[color] {
                self.rebuild(color, lines);
            }
        }
    }

    /// The last built buffer for a color; empty for unknown colors.
    #[must_use]
    pub fn get(&self, color_index: usize) -> &[Point] {
        self.buffers.get(color_index).map_or(&[], Vec::as_slice)
    }
}
