use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use anagram_core::{ApplyOutcome, EditEngine, Side};
use anagram_files::{
    composite_overlay, export_png, load_canvas_image, read_permutation, ExportMetadata,
};

use crate::preferences::EditorPreferences;
use crate::script::{Command, Script};
use crate::status::status_line;

/// The headless front end: one engine, the preferences it was built from,
/// and the permutation file it last loaded.
///
/// Owns the engine outright; callers get read-only access through
/// [`engine`](Self::engine).
pub struct Session {
    engine: EditEngine,
    prefs: EditorPreferences,
    permutation_path: Option<PathBuf>,
}

impl Session {
    pub fn new(prefs: EditorPreferences) -> Self {
        Self {
            engine: EditEngine::new(prefs.engine, prefs.brush),
            prefs,
            permutation_path: None,
        }
    }

    pub fn engine(&self) -> &EditEngine {
        &self.engine
    }

    /// Path of the most recently loaded permutation file, if any.
    pub fn permutation_path(&self) -> Option<&Path> {
        self.permutation_path.as_deref()
    }

    /// Run every command in order, collecting the lines `status` produced.
    ///
    /// Stops at the first failing command; state changes made by earlier
    /// commands are kept.
    pub fn run_script(&mut self, script: &Script) -> Result<Vec<String>> {
        let mut output = Vec::new();
        for (n, command) in script.commands.iter().enumerate() {
            let line = self
                .execute(command, script)
                .with_context(|| format!("command #{} ({command:?}) failed", n + 1))?;
            output.extend(line);
        }
        Ok(output)
    }

    pub fn execute(&mut self, command: &Command, script: &Script) -> Result<Option<String>> {
        match command {
            Command::LoadPermutation { path } => {
                let path = script.resolve(path);
                let permutation = read_permutation(&path)?;
                self.engine.load_permutation(permutation);
                self.permutation_path = Some(path);
            }
            Command::LoadImage { side, path } => {
                let path = script.resolve(path);
                let permutation = self
                    .engine
                    .permutation()
                    .context("load a permutation before loading images")?;
                let image = load_canvas_image(&path, permutation.side())?;
                self.engine.load_image(*side, image)?;
            }
            Command::SaveImage {
                side,
                path,
                outlines,
            } => {
                let outlines = outlines.unwrap_or(self.prefs.show_piece_outlines);
                self.save_canvas(*side, &script.resolve(path), outlines)?;
            }
            Command::SetTool { tool } => self.engine.set_tool(*tool),
            Command::SetColor { color } => self.engine.set_brush_color(*color),
            Command::SetRadius { radius } => self.engine.set_brush_radius(*radius),
            Command::SetOpacity { opacity } => self.engine.set_brush_opacity(*opacity),
            Command::Stroke { side, points } => {
                self.stroke(*side, points)?;
            }
            Command::Undo => {
                if !self.engine.undo() {
                    debug!("Nothing to undo");
                }
            }
            Command::Redo => {
                if !self.engine.redo() {
                    debug!("Nothing to redo");
                }
            }
            Command::Status { side, at } => {
                let hover = match (side, at) {
                    (Some(side), Some([y, x])) => Some((*side, *y, *x)),
                    _ => None,
                };
                return Ok(Some(status_line(&self.engine, hover)));
            }
        }
        Ok(None)
    }

    /// Replay one pointer-down/drag/up gesture.  Returns the number of pixel
    /// pairs it changed.
    pub fn stroke(&mut self, side: Side, points: &[[i64; 2]]) -> Result<usize> {
        self.engine.begin_stroke()?;
        let mut changed = 0;
        for &[y, x] in points {
            match self.engine.apply_at(side, y, x)? {
                ApplyOutcome::Painted { changed: n } => changed += n,
                ApplyOutcome::Picked(color) => {
                    debug!("Picked {color:?} at {}({y},{x})", side.label())
                }
                ApplyOutcome::Missed => {}
            }
        }
        let recorded = self.engine.end_stroke();
        debug!(
            "Stroke on {} with {} points changed {changed} pixels (recorded: {recorded})",
            side.label(),
            points.len()
        );
        Ok(changed)
    }

    pub fn save_canvas(&self, side: Side, path: &Path, outlines: bool) -> Result<()> {
        let canvas = self
            .engine
            .canvas(side)
            .context("no canvas to save; load a permutation first")?;
        let permutation_side = canvas.width();
        let metadata = ExportMetadata {
            canvas: side,
            permutation_side,
            outlines,
        };
        match self.engine.boundary_mask(side).filter(|_| outlines) {
            Some(mask) => {
                let composited = composite_overlay(canvas, mask, self.prefs.overlay_color)?;
                export_png(&composited, path, &metadata)?;
            }
            None => export_png(canvas, path, &metadata)?,
        }
        info!("Saved canvas {} to {}", side.label(), path.display());
        Ok(())
    }
}
