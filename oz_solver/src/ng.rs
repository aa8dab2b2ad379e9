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

//! Ng acceleration: a least-squares projection over the last few Picard
//! residuals, used to speed up (and stabilize) convergence of the OZ
//! fixed-point iteration. Falls back to damped Picard whenever the history
//! is too short, the residual is too large, or the 2x2 normal-equations
//! system it needs to solve is (near-)singular.

use std::collections::VecDeque;

/// How many (input, residual) pairs the accelerator keeps around.
pub const HISTORY_LEN: usize = 3;

/// One retained Picard step: the input iterate `gamma_in` and the residual
/// `d = gamma_out - gamma_in` it produced.
#[derive(Clone)]
struct Entry {
    gamma_in: Vec<f64>,
    d: Vec<f64>,
}

/// Fixed-capacity ring buffer of the last [`HISTORY_LEN`] Picard steps.
/// Created fresh per density step (see `driver.rs`); never aliases the live
/// iteration state.
pub struct NgHistory {
    entries: VecDeque<Entry>,
}

impl NgHistory {
    pub fn new() -> Self {
        NgHistory {
            entries: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a new Picard step, evicting the oldest one if the history is
    /// already full.
    pub fn push(&mut self, gamma_in: Vec<f64>, d: Vec<f64>) {
        if self.entries.len() == HISTORY_LEN {
            self.entries.pop_front();
        }
        self.entries.push_back(Entry { gamma_in, d });
    }
}

impl Default for NgHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Inner product weighted by `r_i^2 * dr`, the natural weight for radial
/// quantities (it makes the accelerator's least-squares fit weight the
/// large-r tail by shell volume rather than by raw sample count).
pub fn weighted_dot(a: &[f64], b: &[f64], r: &[f64], dr: f64) -> f64 {
    a.iter()
        .zip(b)
        .zip(r)
        .map(|((ai, bi), ri)| ai * bi * ri * ri * dr)
        .sum()
}

fn weighted_norm(a: &[f64], r: &[f64], dr: f64) -> f64 {
    weighted_dot(a, a, r, dr).sqrt()
}

/// Damping factor for plain Picard mixing: `gamma_next = gamma_in + omega * d`.
///
/// `xnu` (legacy name, kept as a caller-exposed tunable) sets the
/// damping used while the residual is still large (`omega = 1/xnu`); as the
/// residual norm shrinks, `omega` ramps smoothly towards `1` (undamped
/// Picard), since a converging iteration no longer needs damping to stay
/// stable.
pub fn picard_damping(d_norm: f64, xnu: f64) -> f64 {
    let floor = 1.0 / xnu;
    floor + (1.0 - floor) * (1.0 / (1.0 + d_norm))
}

fn plain_picard(gamma_in: &[f64], d: &[f64], omega: f64) -> Vec<f64> {
    gamma_in
        .iter()
        .zip(d)
        .map(|(g, di)| g + omega * di)
        .collect()
}

/// Produce the next iterate, accelerating with Ng when the history is long
/// enough and the residual is small enough, and falling back to damped
/// Picard otherwise.
///
/// `history` must already include the current step (the caller calls
/// [`NgHistory::push`] before calling this).
pub fn accelerate(history: &NgHistory, r: &[f64], dr: f64, xnu: f64) -> Vec<f64> {
    let n = history.len();
    assert!(n >= 1, "accelerate called with empty history");
    let current = &history.entries[n - 1];
    let d_norm = weighted_norm(&current.d, r, dr);

    if n < HISTORY_LEN || d_norm >= 1.0 {
        let omega = picard_damping(d_norm, xnu);
        return plain_picard(&current.gamma_in, &current.d, omega);
    }

    let e0 = &history.entries[n - 1]; // step n
    let e1 = &history.entries[n - 2]; // step n-1
    let e2 = &history.entries[n - 3]; // step n-2

    let d0 = &e0.d;
    let diff1: Vec<f64> = d0.iter().zip(&e1.d).map(|(a, b)| a - b).collect();
    let diff2: Vec<f64> = d0.iter().zip(&e2.d).map(|(a, b)| a - b).collect();

    let a11 = weighted_dot(&diff1, &diff1, r, dr);
    let a12 = weighted_dot(&diff1, &diff2, r, dr);
    let a22 = weighted_dot(&diff2, &diff2, r, dr);
    let b1 = weighted_dot(&diff1, d0, r, dr);
    let b2 = weighted_dot(&diff2, d0, r, dr);

    let det = a11 * a22 - a12 * a12;
    if det.abs() < 1e-300 || !det.is_finite() {
        let omega = picard_damping(d_norm, xnu);
        return plain_picard(&current.gamma_in, &current.d, omega);
    }

    let c1 = (b1 * a22 - b2 * a12) / det;
    let c2 = (a11 * b2 - a12 * b1) / det;
    let c0 = 1.0 - c1 - c2;

    let n_points = d0.len();
    let mut next = vec![0.0; n_points];
    for i in 0..n_points {
        next[i] = c0 * (e0.gamma_in[i] + e0.d[i])
            + c1 * (e1.gamma_in[i] + e1.d[i])
            + c2 * (e2.gamma_in[i] + e2.d[i]);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_history_is_plain_picard() {
        let mut history = NgHistory::new();
        let r = vec![1.0, 2.0, 3.0];
        let dr = 0.1;
        history.push(vec![0.0, 0.0, 0.0], vec![0.1, -0.1, 0.05]);
        let next = accelerate(&history, &r, dr, 14.0);
        let omega = picard_damping(weighted_norm(&[0.1, -0.1, 0.05], &r, dr), 14.0);
        for (i, &d) in [0.1, -0.1, 0.05].iter().enumerate() {
            assert!((next[i] - omega * d).abs() < 1e-12);
        }
    }

    #[test]
    fn large_residual_falls_back_to_picard_even_with_full_history() {
        let mut history = NgHistory::new();
        let r = vec![1.0, 2.0];
        let dr = 1.0;
        // Residuals with weighted norm >= 1 should always take the Picard path.
        history.push(vec![0.0, 0.0], vec![2.0, 2.0]);
        history.push(vec![0.1, 0.1], vec![2.0, 2.0]);
        history.push(vec![0.2, 0.2], vec![5.0, 5.0]);
        let next = accelerate(&history, &r, dr, 14.0);
        assert_eq!(next.len(), 2);
        // Just check it did not blow up / produce NaNs.
        assert!(next.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn converged_history_reduces_residual_further() {
        let mut history = NgHistory::new();
        let r = vec![1.0, 2.0, 3.0, 4.0];
        let dr = 0.1;
        history.push(vec![1.0, 0.9, 0.5, 0.1], vec![0.05, 0.04, 0.02, 0.01]);
        history.push(vec![1.03, 0.93, 0.51, 0.105], vec![0.02, 0.015, 0.008, 0.003]);
        history.push(vec![1.045, 0.94, 0.515, 0.107], vec![0.005, 0.004, 0.002, 0.001]);
        let next = accelerate(&history, &r, dr, 14.0);
        assert!(next.iter().all(|x| x.is_finite()));
    }
}
