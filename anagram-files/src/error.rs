use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading or writing permutation and image files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNG encode failed: {0}")]
    Png(#[from] png::EncodingError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed NPY file: {reason}")]
    Npy { reason: String },

    #[error("unsupported file type: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error(transparent)]
    Core(#[from] anagram_core::CoreError),
}
