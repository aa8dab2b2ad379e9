// oz_solver - A Picard-Ng solver for the Ornstein-Zernike integral equation
// Copyright (C) 2026 The oz_solver authors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Conjugate radial and wavevector meshes.
//!
//! Both grids use the half-integer offset `(i + 1/2) * delta` required by the
//! discrete sine-transform pairing in [`crate::transform`]: it preserves the
//! invariant `k_i * r_j = pi * (i+1/2) * (j+1/2) / n` for every `i, j`.

/// A pair of conjugate radial (`r`) / wavevector (`k`) grids of `n` points.
#[derive(Clone, Debug)]
pub struct RadialGrid {
    n: usize,
    dr: f64,
    dk: f64,
    r: Vec<f64>,
    k: Vec<f64>,
}

impl RadialGrid {
    /// Build the grid pair for `n` points out to `r_max`.
    ///
    /// `dr = r_max / n`, `dk = pi / r_max`, matching the uniform-spacing /
    /// conjugate-spacing relation used by the discrete sine transform.
    pub fn new(n: usize, r_max: f64) -> Self {
        assert!(n > 0, "grid must have at least one point");
        assert!(r_max > 0.0 && r_max.is_finite(), "r_max must be positive and finite");
        let dr = r_max / n as f64;
        let dk = std::f64::consts::PI / r_max;
        let r: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) * dr).collect();
        let k: Vec<f64> = (0..n).map(|i| (i as f64 + 0.5) * dk).collect();
        RadialGrid { n, dr, dk, r, k }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn dr(&self) -> f64 {
        self.dr
    }

    #[inline]
    pub fn dk(&self) -> f64 {
        self.dk
    }

    #[inline]
    pub fn r(&self) -> &[f64] {
        &self.r
    }

    #[inline]
    pub fn k(&self) -> &[f64] {
        &self.k
    }

    /// `r_max` implied by the grid (`n * dr`).
    #[inline]
    pub fn r_max(&self) -> f64 {
        self.n as f64 * self.dr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_integer_offset() {
        let grid = RadialGrid::new(4, 8.0);
        assert_eq!(grid.len(), 4);
        assert!((grid.r()[0] - 1.0).abs() < 1e-12); // dr = 2, r_0 = 0.5*dr = 1
        assert!((grid.dr() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn conjugate_invariant() {
        let n = 16;
        let grid = RadialGrid::new(n, 32.0);
        for i in 0..n {
            for j in 0..n {
                let lhs = grid.k()[i] * grid.r()[j];
                let rhs = std::f64::consts::PI * (i as f64 + 0.5) * (j as f64 + 0.5) / n as f64;
                assert!((lhs - rhs).abs() < 1e-10);
            }
        }
    }

    #[test]
    #[should_panic]
    fn rejects_zero_points() {
        RadialGrid::new(0, 10.0);
    }
}
