use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, Rgba};
use crate::permutation::Permutation;

/// Which of the two linked canvases an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The paired canvas.
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

/// The two canvases, kept in permutation-consistent correspondence.
///
/// Outside of an open gesture `b[perm[i]] == a[i]` for every `i`.  Only the
/// engine holds a `&mut CanvasPair`; everyone else sees `&PixelBuffer`.
#[derive(Debug, Clone)]
pub struct CanvasPair {
    a: PixelBuffer,
    b: PixelBuffer,
}

impl CanvasPair {
    /// Two fully transparent `side × side` canvases.
    pub fn blank(side: u32) -> Self {
        Self {
            a: PixelBuffer::new(side, side),
            b: PixelBuffer::new(side, side),
        }
    }

    /// Take `image` as the content of `side` and derive the other canvas.
    ///
    /// This is a full O(N) scatter through the permutation.  The caller is
    /// responsible for checking that `image` matches the permutation size.
    pub fn propagate(side: Side, image: PixelBuffer, permutation: &Permutation) -> Self {
        match side {
            // b[perm[i]] = a[i]  <=>  b[j] = a[inv[j]]
            Side::A => {
                let b = image.gather(permutation.inverse_table());
                Self { a: image, b }
            }
            // a[i] = b[perm[i]]
            Side::B => {
                let a = image.gather(permutation.forward_table());
                Self { a, b: image }
            }
        }
    }

    pub fn get(&self, side: Side) -> &PixelBuffer {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Current values at a linked pair of indices.
    #[inline]
    pub fn pair_at(&self, a_index: usize, b_index: usize) -> (Rgba, Rgba) {
        (self.a.get(a_index), self.b.get(b_index))
    }

    /// Write possibly different values to a linked pair of indices.
    #[inline]
    pub(crate) fn write_pair(
        &mut self,
        a_index: usize,
        a_color: Rgba,
        b_index: usize,
        b_color: Rgba,
    ) {
        self.a.set(a_index, a_color);
        self.b.set(b_index, b_color);
    }

    /// `true` when every A pixel is mirrored at its mapped B location.
    pub fn is_consistent(&self, permutation: &Permutation) -> bool {
        permutation
            .forward_table()
            .iter()
            .enumerate()
            .all(|(a, &b)| self.a.get(a) == self.b.get(b))
    }
}
