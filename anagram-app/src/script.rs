//! Gesture scripts: a JSON list of editor commands replayed in order.
//!
//! ```json
//! { "commands": [
//!     { "op": "load_permutation", "path": "perm.npy" },
//!     { "op": "set_color", "color": [255, 0, 0, 255] },
//!     { "op": "stroke", "side": "A", "points": [[10, 10], [10, 12]] },
//!     { "op": "save_image", "side": "B", "path": "b.png" }
//! ] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use anagram_core::{Rgba, Side, Tool};

/// One editor action.  Relative paths are resolved against the script's
/// directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    LoadPermutation {
        path: PathBuf,
    },
    LoadImage {
        side: Side,
        path: PathBuf,
    },
    SaveImage {
        side: Side,
        path: PathBuf,
        /// Composite piece outlines; defaults to the preference.
        #[serde(default)]
        outlines: Option<bool>,
    },
    SetTool {
        tool: Tool,
    },
    SetColor {
        color: Rgba,
    },
    SetRadius {
        radius: u32,
    },
    SetOpacity {
        opacity: i32,
    },
    /// One gesture: pointer down at the first point, dragged through the rest.
    Stroke {
        side: Side,
        points: Vec<[i64; 2]>,
    },
    Undo,
    Redo,
    /// Print the status line, optionally for a hovered coordinate.
    Status {
        #[serde(default)]
        side: Option<Side>,
        #[serde(default)]
        at: Option<[usize; 2]>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub commands: Vec<Command>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let mut script = Self::parse(&json)
            .with_context(|| format!("parsing script {}", path.display()))?;
        script.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(script)
    }

    pub fn parse(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
