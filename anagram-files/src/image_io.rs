//! Decoding images into canvas-sized pixel buffers.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use tracing::debug;

use anagram_core::PixelBuffer;

/// Open any supported image, convert it to RGBA8, and fit it to a
/// `side × side` canvas.
pub fn load_canvas_image(path: &Path, side: u32) -> crate::Result<PixelBuffer> {
    let img = image::open(path)?.into_rgba8();
    debug!(
        "Decoded {}×{} image from {}",
        img.width(),
        img.height(),
        path.display()
    );
    fit_to_canvas(img, side)
}

/// Like [`load_canvas_image`] but from an in-memory encoded image.
pub fn decode_canvas_image(bytes: &[u8], side: u32) -> crate::Result<PixelBuffer> {
    let img = image::load_from_memory(bytes)?.into_rgba8();
    fit_to_canvas(img, side)
}

/// Resample with Lanczos3 when the size differs; square images of the right
/// size pass through untouched.
fn fit_to_canvas(img: RgbaImage, side: u32) -> crate::Result<PixelBuffer> {
    let img = if img.dimensions() == (side, side) {
        img
    } else {
        debug!(
            "Resizing {}×{} → {side}×{side} (Lanczos3)",
            img.width(),
            img.height()
        );
        image::imageops::resize(&img, side, side, FilterType::Lanczos3)
    };
    Ok(PixelBuffer::from_rgba(side, side, img.into_raw())?)
}
