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

//! Closure relations: `c(r) = F(gamma(r), U(r), beta, alpha)`.
//!
//! Every closure is a pure, pointwise, stateless function, which makes them
//! trivially unit-testable in isolation and trivially data-parallel (the
//! driver simply maps this over the whole grid).

use crate::error::OzError;

/// Which closure relation to use. Rogers-Young carries its own mixing
/// parameter since it, unlike HNC/PY, is a one-parameter family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClosureKind {
    /// Hypernetted Chain: `c = exp(-beta U + gamma) - gamma - 1`.
    Hnc,
    /// Percus-Yevick: `c = (exp(-beta U) - 1) * (1 + gamma)`.
    Py,
    /// Rogers-Young, mixing parameter `alpha`. `alpha -> 0` recovers PY,
    /// `alpha -> infinity` recovers HNC.
    RogersYoung(f64),
}

impl ClosureKind {
    pub fn from_name(name: &str, alpha: f64) -> Result<Self, OzError> {
        match name.to_ascii_uppercase().as_str() {
            "HNC" => Ok(ClosureKind::Hnc),
            "PY" => Ok(ClosureKind::Py),
            "RY" => Ok(ClosureKind::RogersYoung(alpha)),
            other => Err(OzError::UnknownClosure(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClosureKind::Hnc => "HNC",
            ClosureKind::Py => "PY",
            ClosureKind::RogersYoung(_) => "RY",
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        match self {
            ClosureKind::RogersYoung(_) => ClosureKind::RogersYoung(alpha),
            other => other,
        }
    }
}

/// Threshold below which Rogers-Young is evaluated as its exact `alpha -> 0`
/// limit (plain PY) instead of through the `f(r) = 1 - exp(-alpha r)`
/// ratio, which is a removable-singularity 0/0 form as `alpha -> 0`.
const RY_SMALL_ALPHA: f64 = 1e-8;

/// `(exp(x) - 1) / x`, stable as `x -> 0` (where the limit is `1`) by
/// routing through `exp_m1`, which is itself computed without the
/// catastrophic cancellation `exp(x) - 1.0` would suffer for small `x`.
#[inline]
fn expm1_over_x(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        x.exp_m1() / x
    }
}

/// Apply the closure at a single grid point.
///
/// `core` is the precomputed hard-core mask from [`crate::potential::PotentialTable`]:
/// inside a hard wall every closure enforces `c = -1 - gamma` (i.e. `h = -1`,
/// `g = 0`) regardless of the nominal `U(r) = +infinity`. `r` is only used by
/// Rogers-Young's mixing function; the other closures ignore it.
pub fn apply(gamma: f64, u: f64, r: f64, beta: f64, core: bool, kind: ClosureKind) -> f64 {
    if core {
        return -1.0 - gamma;
    }
    match kind {
        ClosureKind::Hnc => (-beta * u + gamma).exp() - gamma - 1.0,
        ClosureKind::Py => (-beta * u).exp_m1() * (1.0 + gamma),
        ClosureKind::RogersYoung(alpha) => rogers_young(gamma, u, r, beta, alpha),
    }
}

fn rogers_young(gamma: f64, u: f64, r: f64, beta: f64, alpha: f64) -> f64 {
    if alpha.abs() < RY_SMALL_ALPHA {
        return (-beta * u).exp_m1() * (1.0 + gamma);
    }
    // f(r) = 1 - exp(-alpha r) computed via exp_m1 to stay accurate for
    // small alpha*r.
    let f = -(-alpha * r).exp_m1();
    let ratio = gamma * expm1_over_x(gamma * f);
    let g = (-beta * u).exp() * (1.0 + ratio);
    g - 1.0 - gamma
}

/// Map [`apply`] over a whole grid, writing into `c`.
pub fn apply_all(
    gamma: &[f64],
    u: &[f64],
    r: &[f64],
    core_mask: &[bool],
    beta: f64,
    kind: ClosureKind,
    c: &mut [f64],
) {
    for i in 0..gamma.len() {
        c[i] = apply(gamma[i], u[i], r[i], beta, core_mask[i], kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_potential_zero_gamma_gives_zero_c() {
        for kind in [ClosureKind::Hnc, ClosureKind::Py, ClosureKind::RogersYoung(1.0)] {
            let c = apply(0.0, 0.0, 1.0, 1.0, false, kind);
            assert!(c.abs() < 1e-12, "{:?} gave c={}", kind, c);
        }
    }

    #[test]
    fn hard_core_forces_h_minus_one() {
        for kind in [ClosureKind::Hnc, ClosureKind::Py, ClosureKind::RogersYoung(2.0)] {
            let gamma = 0.37;
            let c = apply(gamma, f64::INFINITY, 1.0, 1.0, true, kind);
            assert!((c - (-1.0 - gamma)).abs() < 1e-12);
        }
    }

    #[test]
    fn ry_alpha_zero_matches_py() {
        let gamma = 0.2;
        let u = 0.8;
        let r = 1.0;
        let beta = 1.3;
        let ry = apply(gamma, u, r, beta, false, ClosureKind::RogersYoung(0.0));
        let py = apply(gamma, u, r, beta, false, ClosureKind::Py);
        assert!((ry - py).abs() < 1e-9);
    }

    #[test]
    fn ry_large_alpha_matches_hnc() {
        let gamma = 0.2;
        let u = 0.8;
        let r = 1.0;
        let beta = 1.3;
        let ry = apply(gamma, u, r, beta, false, ClosureKind::RogersYoung(50.0));
        let hnc = apply(gamma, u, r, beta, false, ClosureKind::Hnc);
        assert!((ry - hnc).abs() < 1e-6);
    }

    #[test]
    fn ry_mixing_function_actually_depends_on_r() {
        let gamma = 0.2;
        let u = 0.8;
        let beta = 1.3;
        let alpha = 2.0;
        let near = apply(gamma, u, 0.5, beta, false, ClosureKind::RogersYoung(alpha));
        let far = apply(gamma, u, 5.0, beta, false, ClosureKind::RogersYoung(alpha));
        assert!((near - far).abs() > 1e-6);
    }

    #[test]
    fn unknown_closure_name_is_an_error() {
        assert!(matches!(
            ClosureKind::from_name("xyz", 1.0),
            Err(OzError::UnknownClosure(_))
        ));
    }
}
