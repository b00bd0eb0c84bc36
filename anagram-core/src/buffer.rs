use rayon::prelude::*;

use crate::error::CoreError;

/// One RGBA pixel, 8 bits per channel.
pub type Rgba = [u8; 4];

/// An RGBA pixel buffer for one canvas.
///
/// Pixels are stored row-major, 4 bytes each.  The byte vector is private so
/// its length always matches `width × height × 4`; callers read it through
/// [`as_bytes`](Self::as_bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a new buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Create a buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = color.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap externally decoded RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> crate::Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(CoreError::InvalidBuffer {
                reason: format!(
                    "{}×{} RGBA needs {expected} bytes, got {}",
                    width,
                    height,
                    pixels.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (not bytes).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel at linear index `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Rgba {
        let o = index * 4;
        [
            self.pixels[o],
            self.pixels[o + 1],
            self.pixels[o + 2],
            self.pixels[o + 3],
        ]
    }

    /// Pixel at `(row, col)`, or `None` off the buffer.
    pub fn get_at(&self, row: usize, col: usize) -> Option<Rgba> {
        (row < self.height as usize && col < self.width as usize)
            .then(|| self.get(row * self.width as usize + col))
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, color: Rgba) {
        let o = index * 4;
        self.pixels[o..o + 4].copy_from_slice(&color);
    }

    /// Build a new buffer where pixel `i` is this buffer's pixel `source[i]`.
    ///
    /// A gather is the parallel-friendly form of the scatter
    /// `out[perm[i]] = self[i]`: pass the inverse table to scatter through the
    /// forward one.
    pub fn gather(&self, source: &[usize]) -> PixelBuffer {
        debug_assert_eq!(source.len(), self.pixel_count());
        let mut pixels = vec![0u8; self.pixels.len()];
        pixels
            .par_chunks_exact_mut(4)
            .zip(source.par_iter())
            .for_each(|(pixel, &from)| {
                let o = from * 4;
                pixel.copy_from_slice(&self.pixels[o..o + 4]);
            });
        PixelBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_transparent_black() {
        let buf = PixelBuffer::new(4, 4);
        assert_eq!(buf.as_bytes().len(), 4 * 4 * 4);
        for chunk in buf.as_bytes().chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn from_rgba_checks_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(CoreError::InvalidBuffer { .. })
        ));
    }

    #[test]
    fn get_and_set_address_the_same_pixel() {
        let mut buf = PixelBuffer::new(3, 2);
        buf.set(4, [1, 2, 3, 4]);
        assert_eq!(buf.get(4), [1, 2, 3, 4]);
        assert_eq!(buf.get_at(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(buf.get_at(2, 0), None);
        assert_eq!(buf.get_at(0, 3), None);
    }

    #[test]
    fn gather_reorders_pixels() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set(0, [10, 0, 0, 255]);
        buf.set(1, [20, 0, 0, 255]);
        let swapped = buf.gather(&[1, 0]);
        assert_eq!(swapped.get(0), [20, 0, 0, 255]);
        assert_eq!(swapped.get(1), [10, 0, 0, 255]);
    }
}
