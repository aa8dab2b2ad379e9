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

//! Owned real-space and reciprocal-space correlation-function arrays.
//!
//! A single [`CorrelationState`] belongs to exactly one solve; it is
//! allocated once per call to [`crate::driver::run_ramp`] and mutated in
//! place as the density ramp advances, owned exclusively for the lifetime
//! of that one solve.

#[allow(non_snake_case)]
#[derive(Clone, Debug)]
pub struct CorrelationState {
    pub c: Vec<f64>,
    pub h: Vec<f64>,
    pub gamma: Vec<f64>,
    pub c_hat: Vec<f64>,
    pub h_hat: Vec<f64>,
    pub gamma_hat: Vec<f64>,
}

impl CorrelationState {
    /// Allocate a zeroed state for `n` grid points.
    pub fn zeros(n: usize) -> Self {
        CorrelationState {
            c: vec![0.0; n],
            h: vec![0.0; n],
            gamma: vec![0.0; n],
            c_hat: vec![0.0; n],
            h_hat: vec![0.0; n],
            gamma_hat: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.gamma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gamma.is_empty()
    }

    /// Enforce the defining relation `h = gamma + c` in real space.
    pub fn sync_h_from_gamma_c(&mut self) {
        for i in 0..self.len() {
            self.h[i] = self.gamma[i] + self.c[i];
        }
    }

    /// Enforce the same relation in reciprocal space, `h_hat = gamma_hat +
    /// c_hat`, which holds by linearity of the radial transform applied to
    /// `h = gamma + c`.
    pub fn sync_h_hat_from_gamma_hat_c_hat(&mut self) {
        for i in 0..self.len() {
            self.h_hat[i] = self.gamma_hat[i] + self.c_hat[i];
        }
    }

    /// Largest violation of `gamma == h - c`, used by tests and by the
    /// driver's internal consistency assertions.
    pub fn gamma_residual_linf(&self) -> f64 {
        self.gamma
            .iter()
            .zip(&self.h)
            .zip(&self.c)
            .map(|((g, h), c)| (g - (h - c)).abs())
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_consistent_lengths() {
        let s = CorrelationState::zeros(10);
        assert_eq!(s.c.len(), 10);
        assert_eq!(s.gamma.len(), 10);
        assert_eq!(s.gamma_residual_linf(), 0.0);
    }

    #[test]
    fn sync_enforces_definition() {
        let mut s = CorrelationState::zeros(3);
        s.gamma = vec![0.5, -0.2, 0.1];
        s.c = vec![0.1, 0.1, 0.1];
        s.sync_h_from_gamma_c();
        assert_eq!(s.gamma_residual_linf(), 0.0);
        assert_eq!(s.h, vec![0.6, -0.1, 0.2]);
    }

    #[test]
    fn sync_h_hat_mirrors_real_space_relation() {
        let mut s = CorrelationState::zeros(3);
        s.gamma_hat = vec![0.3, -0.4, 0.2];
        s.c_hat = vec![0.05, 0.05, 0.05];
        s.sync_h_hat_from_gamma_hat_c_hat();
        let expect = [0.35, -0.35, 0.25];
        for (got, want) in s.h_hat.iter().zip(expect) {
            assert!((got - want).abs() < 1e-12, "{got} != {want}");
        }
    }
}
