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

//! A self-consistent Picard-Ng solver for the Ornstein-Zernike integral
//! equation of an isotropic, single-component liquid.
//!
//! The crate exposes one entry point, [`solve`], which takes a
//! [`SolverConfig`] (the plain-data surface a CLI or any other caller fills
//! in) and returns a [`SolveOutput`] holding every correlation function and
//! thermodynamic quantity the density ramp produced. Everything upstream
//! of parsing that config and downstream of writing `SolveOutput` to disk
//! (argument parsing, file I/O, directory/timestamp handling) is
//! deliberately out of scope for this crate; see the sibling `oz_solver_cli`
//! crate for that.
//!
//! This crate never reads from or writes to the filesystem, never prints,
//! and never touches the wall clock. Diagnostics go through the `log`
//! facade; failures are returned as [`OzError`], never panicked (outside
//! of programmer-error assertions on malformed internal state).

pub mod closure;
pub mod context;
pub mod driver;
pub mod error;
pub mod grid;
pub mod ng;
pub mod potential;
pub mod ry;
pub mod state;
pub mod thermo;
pub mod transform;

pub use context::{OutputKind, SolverConfig, SolverContext};
pub use error::{OzError, OzResult};

/// Everything a solve produces: the four correlation-function series, plus
/// the scalar thermodynamic quantities computed along the way.
#[derive(Clone, Debug)]
pub struct SolveOutput {
    pub r: Vec<f64>,
    pub k: Vec<f64>,
    /// `g(r) = h(r) + 1`.
    pub g: Vec<f64>,
    /// `S(k) = 1 / (1 - rho*c_hat(k))`.
    pub s: Vec<f64>,
    /// `1/S(k)`.
    pub s_inverse: Vec<f64>,
    /// `c_hat(k)`, the converged direct correlation function in k-space.
    pub c_hat: Vec<f64>,
    /// The closure actually used to reach this result (for Rogers-Young,
    /// carries the consistency-loop's converged `alpha`).
    pub closure: closure::ClosureKind,
    /// `S(k -> 0)`.
    pub s0: f64,
    /// Virial-route pressure.
    pub pressure_virial: f64,
    /// Compressibility-route pressure, integrated over the whole ramp.
    pub pressure_compressibility: f64,
    /// Excess internal energy per particle (beyond the ideal `(3/2)kT`).
    pub internal_energy: f64,
    /// Whether the Rogers-Young consistency bracket actually changed sign.
    /// Always `true` for HNC and PY, which have no consistency search to
    /// fail.
    pub ry_consistency: bool,
    output: context::OutputKind,
}

impl SolveOutput {
    /// The series selected by `config.output`, matching whichever of
    /// `g`, `s`, `s_inverse`, `c_hat` the caller asked for.
    pub fn primary_series(&self) -> &[f64] {
        match self.output {
            context::OutputKind::PairDistributionR => &self.g,
            context::OutputKind::StructureFactor => &self.s,
            context::OutputKind::InverseStructureFactor => &self.s_inverse,
            context::OutputKind::DirectCorrelationK => &self.c_hat,
        }
    }
}

/// Run a full solve: build the validated [`SolverContext`] from `config`,
/// advance the density ramp (or, for Rogers-Young, bisect `alpha` to
/// pressure consistency, re-solving the ramp at each trial), and package
/// up every correlation function and thermodynamic scalar the caller might
/// want.
pub fn solve(config: SolverConfig) -> OzResult<SolveOutput> {
    let ctx = config.into_context()?;

    let (ramp, closure_used, ry_consistency) = match ctx.closure {
        closure::ClosureKind::RogersYoung(_) => {
            let (alpha, ramp, consistent) = ry::solve_consistent(&ctx)?;
            (ramp, closure::ClosureKind::RogersYoung(alpha), consistent)
        }
        other => (driver::run_ramp(&ctx, None)?, other, true),
    };

    let n = ctx.grid.len();
    let rho = ctx.rho_target;

    let g: Vec<f64> = ramp.state.h.iter().map(|h| h + 1.0).collect();
    let mut s = vec![0.0; n];
    for i in 0..n {
        s[i] = 1.0 / (1.0 - rho * ramp.state.c_hat[i]);
    }
    let s_inverse: Vec<f64> = s.iter().map(|si| 1.0 / si).collect();
    let s0 = thermo::structure_factor_k0(&ctx.grid, &s);

    let pressure_virial = thermo::virial_pressure(&ctx, &g);
    let pressure_compressibility = ramp.ledger.pressure(1.0 / ctx.beta);
    let internal_energy = thermo::internal_energy(&ctx, &g);

    Ok(SolveOutput {
        r: ctx.grid.r().to_vec(),
        k: ctx.grid.k().to_vec(),
        g,
        s,
        s_inverse,
        c_hat: ramp.state.c_hat.clone(),
        closure: closure_used,
        s0,
        pressure_virial,
        pressure_compressibility,
        internal_energy,
        ry_consistency,
        output: ctx.output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_sphere_py_solve_has_consistent_series_lengths() {
        let mut cfg = SolverConfig::default();
        cfg.nodes = 256;
        cfg.r_max = 16.0;
        cfg.nrho = 15;
        cfg.potential_id = 7;
        cfg.closure_name = "PY".to_string();
        cfg.phi = 0.3;
        let out = solve(cfg).unwrap();
        assert_eq!(out.r.len(), 256);
        assert_eq!(out.g.len(), 256);
        assert_eq!(out.s.len(), 256);
        assert!(out.s0 > 0.0);
        assert_eq!(out.primary_series().len(), 256);
    }

    #[test]
    fn unknown_potential_id_is_rejected_before_any_solve_runs() {
        let mut cfg = SolverConfig::default();
        cfg.potential_id = -1;
        assert!(matches!(solve(cfg), Err(OzError::UnknownPotential(-1))));
    }
}
