//! Piece-boundary detection.
//!
//! A permutation usually moves whole rectangular "pieces" of A to new places
//! in B.  A pixel sits on a piece boundary when at least one of its
//! 4-connected neighbours does not stay adjacent after mapping.

use rayon::prelude::*;

use crate::canvas::Side;
use crate::permutation::Permutation;

const NEIGHBOURS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Boundary flags for both canvases, derived once per permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryMasks {
    side: u32,
    a: Vec<bool>,
    b: Vec<bool>,
}

impl BoundaryMasks {
    /// Flag every A pixel whose mapping breaks adjacency with a neighbour,
    /// then carry the flags over to B through the permutation.
    pub fn compute(permutation: &Permutation) -> Self {
        let a: Vec<bool> = (0..permutation.len())
            .into_par_iter()
            .map(|index| is_boundary(permutation, index))
            .collect();
        // b[perm[i]] = a[i]
        let b: Vec<bool> = permutation
            .inverse_table()
            .par_iter()
            .map(|&from| a[from])
            .collect();
        Self {
            side: permutation.side(),
            a,
            b,
        }
    }

    /// Row-major flags for one canvas.
    pub fn mask(&self, side: Side) -> &[bool] {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn is_flagged(&self, side: Side, row: usize, col: usize) -> bool {
        let n = self.side as usize;
        row < n && col < n && self.mask(side)[row * n + col]
    }

    /// Number of flagged pixels (identical on both sides).
    pub fn flagged_count(&self) -> usize {
        self.a.iter().filter(|&&f| f).count()
    }

    /// Flagged A pixels as `(row, col)`, in row-major order.
    pub fn flagged_a_coords(&self) -> Vec<(usize, usize)> {
        let n = self.side as usize;
        self.a
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f)
            .map(|(i, _)| (i / n, i % n))
            .collect()
    }
}

fn is_boundary(permutation: &Permutation, index: usize) -> bool {
    let (y, x) = permutation.coords(index);
    let (by, bx) = permutation.coords(permutation.forward_index(index));
    NEIGHBOURS.iter().any(|&(dy, dx)| {
        let (Some(ny), Some(nx)) = (y.checked_add_signed(dy), x.checked_add_signed(dx)) else {
            return false;
        };
        let Some(neighbour) = permutation.linear_index(ny, nx) else {
            return false;
        };
        let (nby, nbx) = permutation.coords(permutation.forward_index(neighbour));
        by.abs_diff(nby) + bx.abs_diff(nbx) != 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_no_boundaries() {
        let masks = BoundaryMasks::compute(&Permutation::identity(5));
        assert_eq!(masks.flagged_count(), 0);
        assert!(masks.mask(Side::B).iter().all(|&f| !f));
    }

    #[test]
    fn corner_swap_flags_both_corners_and_their_neighbours() {
        // 3×3, swap pixel 0 and 8.
        let p = Permutation::from_indices(&[8, 1, 2, 3, 4, 5, 6, 7, 0]).unwrap();
        let masks = BoundaryMasks::compute(&p);
        let flagged = masks.flagged_a_coords();
        assert_eq!(
            flagged,
            vec![(0, 0), (0, 1), (1, 0), (1, 2), (2, 1), (2, 2)]
        );
        // Flags follow pixels through the mapping: A(0,0) lives at B(2,2).
        assert!(masks.is_flagged(Side::B, 2, 2));
        assert!(masks.is_flagged(Side::B, 0, 0));
        assert!(!masks.is_flagged(Side::B, 1, 1));
    }

    #[test]
    fn quadrant_swap_flags_piece_edges() {
        // 4×4 split into 2×2 quadrants; swap the left and right halves.
        let mut raw = Vec::new();
        for y in 0..4i64 {
            for x in 0..4i64 {
                let nx = (x + 2) % 4;
                raw.push(y * 4 + nx);
            }
        }
        let p = Permutation::from_indices(&raw).unwrap();
        let masks = BoundaryMasks::compute(&p);
        for y in 0..4 {
            // Columns 1 and 2 meet across the seam; 0 and 3 are outer edges.
            assert!(!masks.is_flagged(Side::A, y, 0));
            assert!(masks.is_flagged(Side::A, y, 1));
            assert!(masks.is_flagged(Side::A, y, 2));
            assert!(!masks.is_flagged(Side::A, y, 3));
        }
    }

    #[test]
    fn out_of_range_is_not_flagged() {
        let masks = BoundaryMasks::compute(&Permutation::identity(2));
        assert!(!masks.is_flagged(Side::A, 5, 5));
    }
}
