use thiserror::Error;

/// Errors originating from the dual-canvas edit engine.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid permutation: {reason}")]
    InvalidPermutation { reason: String },

    #[error("no permutation loaded")]
    StateNotReady,

    #[error("image is {width}×{height} but the canvas is {expected_width}×{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid pixel buffer: {reason}")]
    InvalidBuffer { reason: String },
}
