use std::collections::VecDeque;

use tracing::debug;

use crate::buffer::Rgba;
use crate::canvas::CanvasPair;

/// Maximum number of strokes kept on the undo stack unless configured otherwise.
pub const DEFAULT_MAX_UNDO_DEPTH: usize = 50;

/// Before/after values of one linked pixel pair touched by a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelChange {
    /// Linear index in A.
    pub a_index: usize,
    /// Linear index in B that `a_index` maps to.
    pub b_index: usize,
    pub old_a: Rgba,
    pub new_a: Rgba,
    pub old_b: Rgba,
    pub new_b: Rgba,
}

/// One gesture's worth of pixel changes, recorded in application order.
///
/// Each A index appears at most once; the engine's per-gesture touched set
/// guarantees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stroke {
    changes: Vec<PixelChange>,
}

impl Stroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, change: PixelChange) {
        self.changes.push(change);
    }

    pub fn changes(&self) -> &[PixelChange] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Restore the pre-stroke values, last change first.
    pub(crate) fn revert(&self, canvases: &mut CanvasPair) {
        for c in self.changes.iter().rev() {
            canvases.write_pair(c.a_index, c.old_a, c.b_index, c.old_b);
        }
    }

    /// Re-apply the post-stroke values in recorded order.
    pub(crate) fn replay(&self, canvases: &mut CanvasPair) {
        for c in &self.changes {
            canvases.write_pair(c.a_index, c.new_a, c.b_index, c.new_b);
        }
    }
}

/// Bounded undo stack plus redo stack of completed strokes.
///
/// The undo stack evicts its oldest stroke once it grows past `max_depth`.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Stroke>,
    redo: Vec<Stroke>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a finished stroke.  Empty strokes are dropped.
    ///
    /// Returns `true` if the stroke was recorded.
    pub fn push(&mut self, stroke: Stroke) -> bool {
        if stroke.is_empty() {
            return false;
        }
        self.undo.push_back(stroke);
        self.evict_overflow();
        true
    }

    fn evict_overflow(&mut self) {
        while self.undo.len() > self.max_depth {
            if let Some(old) = self.undo.pop_front() {
                debug!("Evicted oldest stroke ({} pixels) from undo history", old.len());
            }
        }
    }

    /// Revert the most recent stroke onto `canvases`.  No-op when empty.
    pub fn undo(&mut self, canvases: &mut CanvasPair) -> bool {
        let Some(stroke) = self.undo.pop_back() else {
            return false;
        };
        stroke.revert(canvases);
        self.redo.push(stroke);
        true
    }

    /// Re-apply the most recently undone stroke.  No-op when empty.
    pub fn redo(&mut self, canvases: &mut CanvasPair) -> bool {
        let Some(stroke) = self.redo.pop() else {
            return false;
        };
        stroke.replay(canvases);
        self.undo.push_back(stroke);
        self.evict_overflow();
        true
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the depth limit (at least 1), evicting immediately if needed.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        self.evict_overflow();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNDO_DEPTH)
    }
}
