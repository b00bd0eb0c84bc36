use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use anagram_core::{BrushSettings, EngineConfig, Rgba};
use anagram_files::DEFAULT_OVERLAY_COLOR;

// ---------------------------------------------------------------------------
// Editor preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Tool, color, radius and opacity a new session starts with.
    #[serde(default)]
    pub brush: BrushSettings,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Composite piece outlines into saved canvases unless a command says otherwise.
    #[serde(default)]
    pub show_piece_outlines: bool,
    #[serde(default = "default_overlay_color")]
    pub overlay_color: Rgba,
    #[serde(default)]
    pub last_permutation: Option<PathBuf>,
}

fn default_overlay_color() -> Rgba {
    DEFAULT_OVERLAY_COLOR
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            brush: BrushSettings::default(),
            engine: EngineConfig::default(),
            show_piece_outlines: false,
            overlay_color: default_overlay_color(),
            last_permutation: None,
        }
    }
}

impl EditorPreferences {
    /// Load preferences from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<EditorPreferences>(&json) {
                    Ok(mut prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        prefs.brush = prefs.brush.sanitized();
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    /// `explicit` if given, otherwise the permutation the last run loaded.
    pub fn permutation_or_last(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.last_permutation.clone())
    }

    /// Persist preferences to `path`.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }
}

/// `preferences.json` next to the executable.
pub fn default_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: EditorPreferences =
            serde_json::from_str(r#"{"show_piece_outlines": true}"#).unwrap();
        assert!(prefs.show_piece_outlines);
        assert_eq!(prefs.engine.max_undo_depth, 50);
        assert_eq!(prefs.brush.radius, 4);
        assert_eq!(prefs.overlay_color, DEFAULT_OVERLAY_COLOR);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("anagram_test_prefs_bad");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("preferences.json");
        fs::write(&path, "{ not json").unwrap();
        let prefs = EditorPreferences::load_from(&path);
        assert_eq!(prefs.brush, BrushSettings::default());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = std::env::temp_dir().join("anagram_test_prefs_save");
        let path = dir.join("nested").join("preferences.json");
        let mut prefs = EditorPreferences::default();
        prefs.brush.set_radius(9);
        prefs.engine.max_undo_depth = 12;
        prefs.save_to(&path);

        let loaded = EditorPreferences::load_from(&path);
        assert_eq!(loaded.brush.radius, 9);
        assert_eq!(loaded.engine.max_undo_depth, 12);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn remembered_permutation_is_the_fallback() {
        let mut prefs = EditorPreferences::default();
        assert_eq!(prefs.permutation_or_last(None), None);

        prefs.last_permutation = Some(PathBuf::from("last.npy"));
        assert_eq!(prefs.permutation_or_last(None), Some(PathBuf::from("last.npy")));
        assert_eq!(
            prefs.permutation_or_last(Some(PathBuf::from("given.json"))),
            Some(PathBuf::from("given.json"))
        );
    }

    #[test]
    fn out_of_range_brush_is_clamped_on_load() {
        let dir = std::env::temp_dir().join("anagram_test_prefs_clamp");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("preferences.json");
        fs::write(&path, r#"{"brush": {"radius": 0, "opacity_percent": 200}}"#).unwrap();
        let prefs = EditorPreferences::load_from(&path);
        assert_eq!(prefs.brush.radius, 1);
        assert_eq!(prefs.brush.opacity_percent, 100);
        let _ = fs::remove_dir_all(&dir);
    }
}
