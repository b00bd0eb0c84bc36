use crate::canvas::Side;
use crate::error::CoreError;

/// A fixed bijection between the pixel positions of canvas A and canvas B.
///
/// Pixel `i` of A (linear, row-major) corresponds to pixel `forward[i]` of B.
/// The inverse table is built eagerly so lookups in either direction are a
/// single index.  Both tables are immutable once constructed; loading a new
/// mapping means building a new `Permutation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    side: u32,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Validate a flat sequence of indices and build the mapping.
    ///
    /// The sequence must have a perfect-square length `N` and contain every
    /// value in `0..N` exactly once.  Nothing is allocated for the inverse
    /// until the input has passed every check.
    pub fn from_indices(raw: &[i64]) -> crate::Result<Self> {
        let n = raw.len();
        if n == 0 {
            return Err(invalid("permutation is empty"));
        }

        let side = integer_sqrt(n)
            .ok_or_else(|| invalid(format!("{n} entries do not form a square image")))?;
        let side = u32::try_from(side)
            .map_err(|_| invalid(format!("side length {side} is too large")))?;

        let mut seen = vec![false; n];
        let mut forward = Vec::with_capacity(n);
        for (position, &value) in raw.iter().enumerate() {
            let index = usize::try_from(value)
                .ok()
                .filter(|&v| v < n)
                .ok_or_else(|| {
                    invalid(format!(
                        "value {value} at position {position} is outside 0..{n}"
                    ))
                })?;
            if seen[index] {
                return Err(invalid(format!("value {index} appears more than once")));
            }
            seen[index] = true;
            forward.push(index);
        }

        let mut inverse = vec![0usize; n];
        for (a, &b) in forward.iter().enumerate() {
            inverse[b] = a;
        }

        Ok(Self {
            side,
            forward,
            inverse,
        })
    }

    /// The mapping that leaves every pixel in place.  `side` is at least 1.
    pub fn identity(side: u32) -> Self {
        let side = side.max(1);
        let n = side as usize * side as usize;
        let forward: Vec<usize> = (0..n).collect();
        Self {
            side,
            inverse: forward.clone(),
            forward,
        }
    }

    /// Side length of the (square) canvas in pixels.
    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.side
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.side
    }

    /// Number of pixels `N = H·W`.
    #[inline]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Always `false`: construction rejects empty input.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Linear index in B for linear index `a` in A.
    #[inline]
    pub fn forward_index(&self, a: usize) -> usize {
        self.forward[a]
    }

    /// Linear index in A for linear index `b` in B.
    #[inline]
    pub fn inverse_index(&self, b: usize) -> usize {
        self.inverse[b]
    }

    pub fn forward_table(&self) -> &[usize] {
        &self.forward
    }

    pub fn inverse_table(&self) -> &[usize] {
        &self.inverse
    }

    /// `row * W + col`, or `None` when the coordinate is off the canvas.
    #[inline]
    pub fn linear_index(&self, row: usize, col: usize) -> Option<usize> {
        let side = self.side as usize;
        (row < side && col < side).then(|| row * side + col)
    }

    /// Inverse of [`linear_index`](Self::linear_index).
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        let side = self.side as usize;
        (index / side, index % side)
    }

    /// Where pixel `(row, col)` of A lands in B.
    pub fn map_a_to_b(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        self.linear_index(row, col).map(|a| self.coords(self.forward[a]))
    }

    /// Where pixel `(row, col)` of B comes from in A.
    pub fn map_b_to_a(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        self.linear_index(row, col).map(|b| self.coords(self.inverse[b]))
    }

    /// Map a coordinate on `from` to the paired coordinate on the other side.
    pub fn map(&self, from: Side, row: usize, col: usize) -> Option<(usize, usize)> {
        match from {
            Side::A => self.map_a_to_b(row, col),
            Side::B => self.map_b_to_a(row, col),
        }
    }
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::InvalidPermutation {
        reason: reason.into(),
    }
}

/// Exact integer square root, `None` when `n` is not a perfect square.
fn integer_sqrt(n: usize) -> Option<usize> {
    let guess = (n as f64).sqrt().round() as usize;
    // Float rounding can be off by one for very large `n`.
    [guess.saturating_sub(1), guess, guess + 1]
        .into_iter()
        .find(|&s| s.checked_mul(s) == Some(n))
}
