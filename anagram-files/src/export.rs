//! PNG export with embedded metadata (tEXt chunks).

use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use anagram_core::{PixelBuffer, Side};

/// Metadata to embed in an exported PNG as tEXt chunks.
pub struct ExportMetadata {
    pub canvas: Side,
    pub permutation_side: u32,
    /// Whether piece outlines were composited into the pixels.
    pub outlines: bool,
}

/// Write a canvas as an RGBA PNG with Visual Anagram metadata.
///
/// Uses the `png` crate directly (rather than `image`) to inject custom tEXt
/// chunks.
pub fn export_png(
    buffer: &PixelBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    let file = std::fs::File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "VisualAnagram".to_string())?;
    for (key, value) in build_metadata_pairs(buffer, metadata) {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(buffer.as_bytes())?;
    png_writer.finish()?;

    debug!(
        "Exported canvas {} ({}x{}) to {}",
        metadata.canvas.label(),
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

fn build_metadata_pairs(buffer: &PixelBuffer, meta: &ExportMetadata) -> Vec<(String, String)> {
    vec![
        ("Anagram.Canvas".into(), meta.canvas.label().to_string()),
        (
            "Anagram.Resolution".into(),
            format!("{}x{}", buffer.width(), buffer.height()),
        ),
        (
            "Anagram.PermutationSide".into(),
            meta.permutation_side.to_string(),
        ),
        ("Anagram.Outlines".into(), meta.outlines.to_string()),
    ]
}
