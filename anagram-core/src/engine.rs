use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::brush::{BrushSettings, Tool};
use crate::buffer::{PixelBuffer, Rgba};
use crate::canvas::{CanvasPair, Side};
use crate::error::CoreError;
use crate::history::{History, PixelChange, Stroke, DEFAULT_MAX_UNDO_DEPTH};
use crate::outline::BoundaryMasks;
use crate::permutation::Permutation;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine-level settings that are not part of the brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_undo_depth")]
    pub max_undo_depth: usize,
}

fn default_max_undo_depth() -> usize {
    DEFAULT_MAX_UNDO_DEPTH
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: default_max_undo_depth(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loaded document
// ---------------------------------------------------------------------------

/// Everything that only exists once a permutation is loaded.
#[derive(Debug, Clone)]
struct Document {
    permutation: Permutation,
    canvases: CanvasPair,
    outlines: BoundaryMasks,
}

/// The gesture currently in progress and the A indices it has touched.
#[derive(Debug, Default)]
struct OpenStroke {
    stroke: Stroke,
    touched: HashSet<usize>,
}

/// What a single [`EditEngine::apply_at`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Brush or eraser stamp; `changed` linked pixel pairs got a new value.
    Painted { changed: usize },
    /// Eyedropper picked this color (alpha forced opaque) as the brush color.
    Picked(Rgba),
    /// Eyedropper pointed outside the canvas.
    Missed,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Synchronized editor for two canvases linked by a pixel permutation.
///
/// Every write lands on both canvases at once, so `B[perm[i]] == A[i]`
/// holds between gestures.  Gestures are bracketed by
/// [`begin_stroke`](Self::begin_stroke) and [`end_stroke`](Self::end_stroke);
/// within one gesture each linked pixel pair is modified at most once, so
/// overlapping stamps never compound a partial-opacity blend.
///
/// The engine is single-threaded and expects its caller to serialize
/// gestures.
#[derive(Debug)]
pub struct EditEngine {
    document: Option<Document>,
    brush: BrushSettings,
    history: History,
    open: Option<OpenStroke>,
}

impl EditEngine {
    pub fn new(config: EngineConfig, brush: BrushSettings) -> Self {
        Self {
            document: None,
            brush: brush.sanitized(),
            history: History::new(config.max_undo_depth),
            open: None,
        }
    }

    // -- Loading -------------------------------------------------------------

    /// Install a new permutation with two blank canvases.
    ///
    /// Discards any previous canvases, open gesture, and history.
    pub fn load_permutation(&mut self, permutation: Permutation) {
        let side = permutation.side();
        let outlines = BoundaryMasks::compute(&permutation);
        info!(
            "Loaded {side}×{side} permutation ({} boundary pixels)",
            outlines.flagged_count()
        );
        self.document = Some(Document {
            canvases: CanvasPair::blank(side),
            permutation,
            outlines,
        });
        self.reset_history();
    }

    /// Validate raw indices and load them.  On error the engine is untouched.
    pub fn load_permutation_indices(&mut self, raw: &[i64]) -> crate::Result<()> {
        let permutation = Permutation::from_indices(raw)?;
        self.load_permutation(permutation);
        Ok(())
    }

    /// Replace one canvas wholesale and re-derive the other through the
    /// permutation.  Clears history, since recorded strokes no longer
    /// describe the new pixels.
    pub fn load_image(&mut self, side: Side, image: PixelBuffer) -> crate::Result<()> {
        let doc = self.document.as_mut().ok_or(CoreError::StateNotReady)?;
        let n = doc.permutation.side();
        if image.width() != n || image.height() != n {
            return Err(CoreError::DimensionMismatch {
                expected_width: n,
                expected_height: n,
                width: image.width(),
                height: image.height(),
            });
        }
        doc.canvases = CanvasPair::propagate(side, image, &doc.permutation);
        info!("Loaded image into canvas {}", side.label());
        self.reset_history();
        Ok(())
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.open = None;
    }

    // -- Read access -----------------------------------------------------------

    pub fn is_ready(&self) -> bool {
        self.document.is_some()
    }

    pub fn permutation(&self) -> Option<&Permutation> {
        self.document.as_ref().map(|d| &d.permutation)
    }

    /// Read-only view of one canvas for display or export.
    pub fn canvas(&self, side: Side) -> Option<&PixelBuffer> {
        self.document.as_ref().map(|d| d.canvases.get(side))
    }

    pub fn canvases(&self) -> Option<&CanvasPair> {
        self.document.as_ref().map(|d| &d.canvases)
    }

    /// Piece-boundary flags for one canvas, row-major.
    pub fn boundary_mask(&self, side: Side) -> Option<&[bool]> {
        self.document.as_ref().map(|d| d.outlines.mask(side))
    }

    pub fn boundary_masks(&self) -> Option<&BoundaryMasks> {
        self.document.as_ref().map(|d| &d.outlines)
    }

    /// Flagged A coordinates, empty when nothing is loaded.
    pub fn boundary_pixels_a(&self) -> Vec<(usize, usize)> {
        self.document
            .as_ref()
            .map(|d| d.outlines.flagged_a_coords())
            .unwrap_or_default()
    }

    /// Map an A coordinate to B.  `Ok(None)` for off-canvas coordinates.
    pub fn map_a_to_b(&self, row: usize, col: usize) -> crate::Result<Option<(usize, usize)>> {
        self.map(Side::A, row, col)
    }

    /// Map a B coordinate to A.  `Ok(None)` for off-canvas coordinates.
    pub fn map_b_to_a(&self, row: usize, col: usize) -> crate::Result<Option<(usize, usize)>> {
        self.map(Side::B, row, col)
    }

    pub fn map(&self, from: Side, row: usize, col: usize) -> crate::Result<Option<(usize, usize)>> {
        let doc = self.document.as_ref().ok_or(CoreError::StateNotReady)?;
        Ok(doc.permutation.map(from, row, col))
    }

    // -- Tool and brush ----------------------------------------------------------

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn tool(&self) -> Tool {
        self.brush.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.tool = tool;
    }

    /// Set the brush color; its alpha is forced opaque.
    pub fn set_brush_color(&mut self, color: Rgba) {
        self.brush.set_color(color);
    }

    pub fn set_brush_radius(&mut self, radius: u32) {
        self.brush.set_radius(radius);
    }

    pub fn set_brush_opacity(&mut self, opacity_percent: i32) {
        self.brush.set_opacity_percent(opacity_percent);
    }

    // -- Gestures ----------------------------------------------------------------

    /// Open a new gesture.  Pending redo history is discarded.
    ///
    /// If a gesture is already open it is finished first.
    pub fn begin_stroke(&mut self) -> crate::Result<()> {
        if self.document.is_none() {
            return Err(CoreError::StateNotReady);
        }
        if self.open.is_some() {
            debug!("begin_stroke with a gesture already open; committing it");
            self.end_stroke();
        }
        self.history.clear_redo();
        self.open = Some(OpenStroke::default());
        Ok(())
    }

    /// Apply the active tool centred at `(y, x)` on `side`.
    ///
    /// Coordinates may lie off the canvas; the parts of the brush disk that
    /// fall outside are clipped.  Called outside a gesture, a brush or eraser
    /// stamp is recorded as its own single-stamp gesture.
    pub fn apply_at(&mut self, side: Side, y: i64, x: i64) -> crate::Result<ApplyOutcome> {
        if self.document.is_none() {
            return Err(CoreError::StateNotReady);
        }
        if self.brush.tool == Tool::Eyedropper {
            return Ok(self.pick(side, y, x));
        }
        let implicit = self.open.is_none();
        if implicit {
            self.begin_stroke()?;
        }
        let changed = self.stamp(side, y, x);
        if implicit {
            self.end_stroke();
        }
        Ok(ApplyOutcome::Painted { changed })
    }

    /// Close the open gesture, recording it if it changed anything.
    ///
    /// Returns `true` when a stroke was pushed onto the undo stack.
    pub fn end_stroke(&mut self) -> bool {
        let Some(open) = self.open.take() else {
            return false;
        };
        let pixels = open.stroke.len();
        let recorded = self.history.push(open.stroke);
        if recorded {
            debug!(
                "Committed stroke: {pixels} pixels, undo depth {}",
                self.history.undo_depth()
            );
        }
        recorded
    }

    pub fn is_stroke_open(&self) -> bool {
        self.open.is_some()
    }

    fn pick(&mut self, side: Side, y: i64, x: i64) -> ApplyOutcome {
        let picked = self.document.as_ref().and_then(|doc| {
            let row = usize::try_from(y).ok()?;
            let col = usize::try_from(x).ok()?;
            doc.canvases.get(side).get_at(row, col)
        });
        match picked {
            Some(color) => {
                self.brush.set_color(color);
                ApplyOutcome::Picked(self.brush.color)
            }
            None => ApplyOutcome::Missed,
        }
    }

    /// Stamp the brush disk once.  Returns the number of pixel pairs changed.
    fn stamp(&mut self, side: Side, y: i64, x: i64) -> usize {
        let (Some(doc), Some(open)) = (self.document.as_mut(), self.open.as_mut()) else {
            return 0;
        };
        let brush = &self.brush;
        let n = doc.permutation.side() as i64;
        let radius = brush.radius as i64;
        // Squares of offsets up to u32::MAX need more than 64 bits.
        let radius_sq = (radius as i128) * (radius as i128);
        let (Some(rows), Some(cols)) = (clip_span(y, radius, n), clip_span(x, radius, n)) else {
            return 0;
        };
        let mut changed = 0;

        for ty in rows {
            let dy = (ty as i128) - (y as i128);
            for tx in cols.clone() {
                let dx = (tx as i128) - (x as i128);
                if dy * dy + dx * dx > radius_sq {
                    continue;
                }
                let here = (ty * n + tx) as usize;
                let (a_index, b_index) = match side {
                    Side::A => (here, doc.permutation.forward_index(here)),
                    Side::B => (doc.permutation.inverse_index(here), here),
                };
                if !open.touched.insert(a_index) {
                    continue;
                }

                let (old_a, old_b) = doc.canvases.pair_at(a_index, b_index);
                let base = match side {
                    Side::A => old_a,
                    Side::B => old_b,
                };
                let new = brush.paint_over(base);
                if old_a != new || old_b != new {
                    open.stroke.push(PixelChange {
                        a_index,
                        b_index,
                        old_a,
                        new_a: new,
                        old_b,
                        new_b: new,
                    });
                    changed += 1;
                }
                doc.canvases.write_pair(a_index, new, b_index, new);
            }
        }
        changed
    }

    // -- History -----------------------------------------------------------------

    /// Revert the most recent stroke.  No-op when there is nothing to undo.
    ///
    /// An open gesture is committed first so its changes are undone too.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        let undone = self.history.undo(&mut doc.canvases);
        if undone {
            debug!("Undo, {} left", self.history.undo_depth());
        }
        undone
    }

    /// Re-apply the most recently undone stroke.
    pub fn redo(&mut self) -> bool {
        self.end_stroke();
        let Some(doc) = self.document.as_mut() else {
            return false;
        };
        let redone = self.history.redo(&mut doc.canvases);
        if redone {
            debug!("Redo, {} left", self.history.redo_depth());
        }
        redone
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    pub fn max_undo_depth(&self) -> usize {
        self.history.max_depth()
    }

    pub fn set_max_undo_depth(&mut self, depth: usize) {
        self.history.set_max_depth(depth);
    }
}

/// On-canvas part of `center - radius ..= center + radius` along one axis of
/// an `n`-pixel canvas, or `None` when the span misses the canvas entirely.
fn clip_span(center: i64, radius: i64, n: i64) -> Option<std::ops::RangeInclusive<i64>> {
    let lo = center.saturating_sub(radius).max(0);
    let hi = center.saturating_add(radius).min(n - 1);
    (lo <= hi).then_some(lo..=hi)
}

impl Default for EditEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), BrushSettings::default())
    }
}
