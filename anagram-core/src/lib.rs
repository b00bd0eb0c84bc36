pub mod brush;
pub mod buffer;
pub mod canvas;
pub mod engine;
pub mod error;
pub mod history;
pub mod outline;
pub mod permutation;

// Re-export primary types for convenience.
pub use brush::{blend_with_brush, BrushSettings, Tool, ERASER_COLOR};
pub use buffer::{PixelBuffer, Rgba};
pub use canvas::{CanvasPair, Side};
pub use engine::{ApplyOutcome, EditEngine, EngineConfig};
pub use error::CoreError;
pub use history::{History, PixelChange, Stroke, DEFAULT_MAX_UNDO_DEPTH};
pub use outline::BoundaryMasks;
pub use permutation::Permutation;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
