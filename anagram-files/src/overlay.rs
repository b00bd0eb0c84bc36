use rayon::prelude::*;

use anagram_core::{CoreError, PixelBuffer, Rgba};

/// Semi-transparent magenta used for piece outlines unless configured.
pub const DEFAULT_OVERLAY_COLOR: Rgba = [255, 0, 255, 180];

/// Composite `color` over every flagged pixel of `buffer` (straight alpha,
/// source-over).  Unflagged pixels are copied unchanged.
pub fn composite_overlay(
    buffer: &PixelBuffer,
    mask: &[bool],
    color: Rgba,
) -> anagram_core::Result<PixelBuffer> {
    if mask.len() != buffer.pixel_count() {
        return Err(CoreError::InvalidBuffer {
            reason: format!(
                "overlay mask has {} entries for {} pixels",
                mask.len(),
                buffer.pixel_count()
            ),
        });
    }
    let mut pixels = buffer.as_bytes().to_vec();
    pixels
        .par_chunks_exact_mut(4)
        .zip(mask.par_iter())
        .for_each(|(pixel, &flagged)| {
            if flagged {
                let out = source_over(color, [pixel[0], pixel[1], pixel[2], pixel[3]]);
                pixel.copy_from_slice(&out);
            }
        });
    PixelBuffer::from_rgba(buffer.width(), buffer.height(), pixels)
}

fn source_over(src: Rgba, dst: Rgba) -> Rgba {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    // Alpha scaled by 255: out_a = sa + da·(1 - sa)
    let out_a = sa * 255 + da * (255 - sa);
    if out_a == 0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let num = src[c] as u32 * sa * 255 + dst[c] as u32 * da * (255 - sa);
        out[c] = ((num + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    out
}
