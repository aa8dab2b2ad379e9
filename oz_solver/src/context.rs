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

//! Plain-data configuration ([`SolverConfig`]) and its validated, immutable
//! counterpart ([`SolverContext`]).
//!
//! This is the one place the legacy global parameters (sigma, alpha, EZ,
//! xnu, rho, dr, r, q, U, Up) get bundled together and validated. Every
//! other module receives a `&SolverContext` instead of reaching for
//! ambient state.

use crate::closure::ClosureKind;
use crate::error::OzError;
use crate::grid::RadialGrid;
use crate::potential::{PotentialKind, PotentialParams, PotentialTable};

/// Geometric close-packing volume fraction ceiling shared by every
/// potential in the catalogue, since `phi` is defined through the
/// hard-sphere mapping `rho = 6 phi / (pi sigma^3)` regardless of which
/// potential is actually being solved. `pi / (3 sqrt(2))`, the FCC
/// close-packing fraction.
pub const PACKING_LIMIT: f64 = 0.740_480_489_693;

/// Which quantity [`crate::SolveOutput::primary_series`] treats as primary.
/// All four series are always computed; this only selects the convenience
/// accessor's return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    StructureFactor,
    InverseStructureFactor,
    DirectCorrelationK,
    PairDistributionR,
}

/// Plain-data configuration surface, the thing a CLI or any other
/// collaborator fills in before calling [`SolverConfig::into_context`].
#[derive(Clone, Debug)]
pub struct SolverConfig {
    pub nodes: usize,
    pub nrho: u32,
    pub r_max: f64,
    pub potential_id: i32,
    pub closure_name: String,
    pub sigma1: f64,
    pub sigma2: f64,
    pub diameter_scale: f64,
    pub temperature: f64,
    pub temperature2: f64,
    pub lambda_a: f64,
    pub lambda_r: f64,
    pub phi: f64,
    pub alpha_initial: f64,
    /// Lower end of the Rogers-Young consistency bracket (ignored by
    /// closures other than Rogers-Young).
    pub alpha_lo: f64,
    /// Upper end of the Rogers-Young consistency bracket.
    pub alpha_hi: f64,
    pub ez: f64,
    pub xnu: f64,
    pub num_threads: usize,
    pub output: OutputKind,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            nodes: 4096,
            nrho: 100,
            r_max: 160.0,
            potential_id: 7,
            closure_name: "PY".to_string(),
            sigma1: 1.0,
            sigma2: 1.0,
            diameter_scale: 1.0,
            temperature: 1.0,
            temperature2: 1.0,
            lambda_a: 12.0,
            lambda_r: 4.0,
            phi: 0.3,
            alpha_initial: 1.0,
            alpha_lo: 0.1,
            alpha_hi: 5.0,
            ez: 1e-4,
            xnu: 14.0,
            num_threads: 1,
            output: OutputKind::PairDistributionR,
        }
    }
}

/// Validated, immutable solver parameters. Built once per solve by
/// [`SolverConfig::into_context`] and shared by reference through the rest
/// of the call chain.
pub struct SolverContext {
    pub grid: RadialGrid,
    pub potential: PotentialTable,
    pub closure: ClosureKind,
    pub rho_target: f64,
    pub phi_target: f64,
    pub sigma: f64,
    pub beta: f64,
    pub nrho: u32,
    pub ez: f64,
    pub xnu: f64,
    pub alpha_lo: f64,
    pub alpha_hi: f64,
    pub num_threads: usize,
    pub output: OutputKind,
}

impl SolverConfig {
    /// Validate and build the immutable context, resolving aliases and
    /// computing derived quantities (`rho`, `beta`) along the way.
    pub fn into_context(self) -> Result<SolverContext, OzError> {
        if self.nodes == 0 {
            return Err(OzError::InvalidParameter {
                name: "nodes",
                reason: "must be positive".into(),
            });
        }
        if self.r_max <= 0.0 || !self.r_max.is_finite() {
            return Err(OzError::InvalidParameter {
                name: "r_max",
                reason: "must be positive and finite".into(),
            });
        }
        if self.phi <= 0.0 || !self.phi.is_finite() {
            return Err(OzError::InvalidParameter {
                name: "phi",
                reason: "must be positive and finite".into(),
            });
        }
        if self.phi >= PACKING_LIMIT {
            return Err(OzError::PackingLimitExceeded {
                phi: self.phi,
                limit: PACKING_LIMIT,
            });
        }
        if !self.alpha_lo.is_finite() || !self.alpha_hi.is_finite() || self.alpha_lo >= self.alpha_hi {
            return Err(OzError::InvalidParameter {
                name: "alpha_lo/alpha_hi",
                reason: "must be finite with alpha_lo < alpha_hi".into(),
            });
        }
        if self.temperature <= 0.0 || !self.temperature.is_finite() {
            return Err(OzError::InvalidParameter {
                name: "temperature",
                reason: "must be positive and finite".into(),
            });
        }

        // sigma1 / diameter_scale aliasing: treat diameter_scale as a
        // multiplicative correction to sigma1. Warn (do not silently pick
        // one) if both are non-default and disagree.
        let sigma = if (self.diameter_scale - 1.0).abs() > 1e-12
            && (self.sigma1 - 1.0).abs() > 1e-12
            && (self.diameter_scale - self.sigma1).abs() > 1e-9
        {
            log::warn!(
                "both sigma1 ({}) and diameter_scale ({}) were supplied and disagree; \
                 using their product as the effective diameter",
                self.sigma1,
                self.diameter_scale
            );
            self.sigma1 * self.diameter_scale
        } else if (self.diameter_scale - 1.0).abs() > 1e-12 {
            self.diameter_scale
        } else {
            self.sigma1
        };

        // sigma2: carried on `SolverConfig` for parity with the documented
        // external entry-point signature (spec.md / SPEC_FULL.md §6 name a
        // sigma1/sigma2 pair), but this solver is single-component only
        // (§1 PURPOSE & SCOPE) — there is no second species for a second
        // diameter to describe. It is validated like sigma1 so a garbage
        // value is still rejected, but it never reaches `PotentialParams`
        // or the grid; a caller-supplied sigma2 that disagrees with the
        // effective diameter gets a logged warning rather than a silent
        // no-op, the same policy used for the sigma1/diameter_scale alias
        // above. See SPEC_FULL.md §9 for the recorded decision.
        if !self.sigma2.is_finite() || self.sigma2 <= 0.0 {
            return Err(OzError::InvalidParameter {
                name: "sigma2",
                reason: "must be positive and finite".into(),
            });
        }
        if (self.sigma2 - sigma).abs() > 1e-9 {
            log::warn!(
                "sigma2 ({}) was supplied and differs from the effective diameter ({}); \
                 this solver is single-component and sigma2 has no effect on the result",
                self.sigma2,
                sigma
            );
        }

        let kind = PotentialKind::from_id(self.potential_id)?;
        let closure = ClosureKind::from_name(&self.closure_name, self.alpha_initial)?;

        let params = PotentialParams {
            sigma,
            temperature: self.temperature,
            temperature2: self.temperature2,
            lambda_a: self.lambda_a,
            lambda_r: self.lambda_r,
        };

        let grid = RadialGrid::new(self.nodes, self.r_max);
        let potential = PotentialTable::build(kind, params, &grid)?;

        let rho_target = 6.0 * self.phi / (std::f64::consts::PI * sigma.powi(3));
        let beta = 1.0 / self.temperature;

        let num_threads = self.num_threads.max(1);

        Ok(SolverContext {
            grid,
            potential,
            closure,
            rho_target,
            phi_target: self.phi,
            sigma,
            beta,
            nrho: self.nrho.max(1),
            ez: self.ez,
            xnu: self.xnu,
            alpha_lo: self.alpha_lo,
            alpha_hi: self.alpha_hi,
            num_threads,
            output: self.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_a_valid_context() {
        let cfg = SolverConfig::default();
        let ctx = cfg.into_context().unwrap();
        assert_eq!(ctx.grid.len(), 4096);
        assert!(ctx.rho_target > 0.0);
    }

    #[test]
    fn rejects_packing_limit() {
        let mut cfg = SolverConfig::default();
        cfg.phi = 0.9;
        assert!(matches!(
            cfg.into_context(),
            Err(OzError::PackingLimitExceeded { .. })
        ));
    }

    #[test]
    fn rejects_unknown_closure() {
        let mut cfg = SolverConfig::default();
        cfg.closure_name = "XYZ".to_string();
        assert!(cfg.into_context().is_err());
    }

    #[test]
    fn diameter_scale_alias_is_applied_when_sigma1_is_default() {
        let mut cfg = SolverConfig::default();
        cfg.diameter_scale = 1.5;
        let ctx = cfg.into_context().unwrap();
        assert!((ctx.sigma - 1.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_sigma2() {
        let mut cfg = SolverConfig::default();
        cfg.sigma2 = 0.0;
        assert!(matches!(
            cfg.into_context(),
            Err(OzError::InvalidParameter { name: "sigma2", .. })
        ));
    }

    #[test]
    fn sigma2_disagreeing_with_sigma_does_not_change_the_result() {
        // sigma2 is accepted-but-inert (single-component solver, no second
        // species); it must not perturb the effective diameter even when it
        // disagrees with sigma1.
        let mut cfg = SolverConfig::default();
        cfg.sigma2 = 2.0;
        let ctx = cfg.into_context().unwrap();
        assert!((ctx.sigma - 1.0).abs() < 1e-12);
    }
}
