pub mod error;
pub mod export;
pub mod image_io;
pub mod overlay;
pub mod permutation_file;

pub use error::FileError;
pub use export::{export_png, ExportMetadata};
pub use image_io::{decode_canvas_image, load_canvas_image};
pub use overlay::{composite_overlay, DEFAULT_OVERLAY_COLOR};
pub use permutation_file::{encode_npy, parse_npy, read_permutation, write_npy};

/// Convenience result type for the files crate.
pub type Result<T> = std::result::Result<T, FileError>;
