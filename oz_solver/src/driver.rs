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

//! The density-ramp driver: advances a [`CorrelationState`] from the ideal
//! gas (`rho = 0`) up to the target density in steps, Picard-Ng iterating
//! the OZ relation to self-consistency at each step.
//!
//! Each step reuses the previous step's converged `gamma(r)` as its starting
//! guess (continuation), which is both faster and more robust than starting
//! every density from scratch, since it never strays far from a solution in
//! a single step.

use crate::closure::{self, ClosureKind};
use crate::context::SolverContext;
use crate::ng::NgHistory;
use crate::state::CorrelationState;
use crate::thermo::DensityRampLedger;
use crate::{transform, OzError, OzResult};

/// Hard cap on Picard-Ng iterations within a single density step.
pub const MAX_PICARD_ITERATIONS: u32 = 2_000;

/// Hard cap on step-halvings attempted before a density step is abandoned
/// as having crossed the spinodal.
pub const MAX_HALVINGS: u32 = 12;

/// Everything the ramp produces at the end of a converged solve.
pub struct RampResult {
    pub state: CorrelationState,
    pub ledger: DensityRampLedger,
}

enum StepOutcome {
    Converged { iterations: u32, last_residual: f64 },
    Spinodal,
    NotConverged { last_residual: f64 },
}

/// `c_hat(k)`, splitting off the analytic long-range tail when the
/// potential has one: the numerical transform only ever sees the
/// short-ranged remainder, which has actually decayed by `r_max`.
fn transform_c(ctx: &SolverContext, c: &[f64], out: &mut [f64]) {
    match ctx.potential.long_range_tail() {
        None => transform::forward(&ctx.grid, c, ctx.num_threads, out),
        Some(tail) => {
            let r = ctx.grid.r();
            let short: Vec<f64> = c
                .iter()
                .zip(r)
                .map(|(&ci, &ri)| ci - (-ctx.beta * tail.value(ri)))
                .collect();
            transform::forward(&ctx.grid, &short, ctx.num_threads, out);
            for (i, &k) in ctx.grid.k().iter().enumerate() {
                out[i] += -ctx.beta * tail.forward_transform(k);
            }
        }
    }
}

/// Advance the density ramp from the ideal gas to `ctx.rho_target`,
/// returning the converged correlation functions and the compressibility
/// ledger accumulated along the way.
///
/// `closure` overrides `ctx.closure` (used by the Rogers-Young outer loop,
/// which re-solves the whole ramp at several trial `alpha`), defaulting to
/// `ctx.closure` when `None`.
pub fn run_ramp(ctx: &SolverContext, closure: Option<ClosureKind>) -> OzResult<RampResult> {
    let kind = closure.unwrap_or(ctx.closure);
    let n = ctx.grid.len();
    let mut state = CorrelationState::zeros(n);
    let mut ledger = DensityRampLedger::new();

    let mut rho = 0.0;
    let mut delta = ctx.rho_target / ctx.nrho as f64;
    let mut halvings = 0u32;
    let eps = 1e-12 * ctx.rho_target.max(1e-12);

    while rho < ctx.rho_target - eps {
        let next_rho = (rho + delta).min(ctx.rho_target);
        match take_picard_step(ctx, &mut state, next_rho, kind) {
            StepOutcome::Converged { .. } => {
                rho = next_rho;
                halvings = 0;
                let mut s_k = vec![0.0; n];
                for i in 0..n {
                    s_k[i] = 1.0 / (1.0 - rho * state.c_hat[i]);
                }
                let s0 = crate::thermo::structure_factor_k0(&ctx.grid, &s_k);
                ledger.push(rho, s0);
            }
            StepOutcome::Spinodal => {
                halvings += 1;
                if halvings > MAX_HALVINGS {
                    return Err(OzError::SpinodalCrossing {
                        rho: next_rho,
                        halvings,
                    });
                }
                delta /= 2.0;
            }
            StepOutcome::NotConverged { last_residual } => {
                return Err(OzError::NotConverged {
                    rho: next_rho,
                    iterations: MAX_PICARD_ITERATIONS,
                    last_residual,
                });
            }
        }
    }

    Ok(RampResult { state, ledger })
}

/// Run the Picard-Ng iteration at fixed density `rho` and closure `kind`
/// until `gamma` converges (or the iteration cap / a spinodal crossing
/// stops it), mutating `state` in place.
fn take_picard_step(
    ctx: &SolverContext,
    state: &mut CorrelationState,
    rho: f64,
    kind: ClosureKind,
) -> StepOutcome {
    let n = state.len();
    let r = ctx.grid.r();
    let dr = ctx.grid.dr();
    let mut history = NgHistory::new();
    let mut last_residual = f64::INFINITY;

    for iteration in 1..=MAX_PICARD_ITERATIONS {
        closure::apply_all(
            &state.gamma,
            &ctx.potential.u,
            r,
            &ctx.potential.core_mask,
            ctx.beta,
            kind,
            &mut state.c,
        );

        transform_c(ctx, &state.c, &mut state.c_hat);

        for i in 0..n {
            let denom = 1.0 - rho * state.c_hat[i];
            if denom <= 0.0 {
                return StepOutcome::Spinodal;
            }
            state.gamma_hat[i] = rho * state.c_hat[i] * state.c_hat[i] / denom;
        }

        let mut gamma_new = vec![0.0; n];
        transform::inverse(&ctx.grid, &state.gamma_hat, ctx.num_threads, &mut gamma_new);

        let d: Vec<f64> = gamma_new
            .iter()
            .zip(&state.gamma)
            .map(|(new, old)| new - old)
            .collect();

        last_residual = d.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));

        // Check convergence on the just-computed (gamma_in, gamma_out) pair
        // *before* feeding it to the Ng accelerator (SPEC_FULL.md steps 5-6):
        // Ng's extrapolated iterate is not itself bounded by the EZ residual,
        // so accepting it as the converged gamma would report g(r)/S(k) for a
        // never-validated point rather than the (gamma_out, c) pair that
        // actually satisfied the OZ relation to within EZ.
        if last_residual < ctx.ez {
            state.gamma = gamma_new;
            state.sync_h_from_gamma_c();
            state.sync_h_hat_from_gamma_hat_c_hat();
            return StepOutcome::Converged {
                iterations: iteration,
                last_residual,
            };
        }

        history.push(state.gamma.clone(), d);
        let next = crate::ng::accelerate(&history, r, dr, ctx.xnu);
        state.gamma = next;
    }
    StepOutcome::NotConverged { last_residual }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SolverConfig;

    #[test]
    fn hard_sphere_py_ramp_converges() {
        let mut cfg = SolverConfig::default();
        cfg.nodes = 512;
        cfg.r_max = 20.0;
        cfg.nrho = 20;
        cfg.potential_id = 7;
        cfg.closure_name = "PY".to_string();
        cfg.phi = 0.3;
        let ctx = cfg.into_context().unwrap();
        let result = run_ramp(&ctx, None).unwrap();
        assert!(result.state.gamma_residual_linf() < 1e-6);
        assert!(result.ledger.beta_pressure() > 0.0);
    }

    #[test]
    fn low_density_gas_is_nearly_ideal() {
        let mut cfg = SolverConfig::default();
        cfg.nodes = 256;
        cfg.r_max = 20.0;
        cfg.nrho = 10;
        cfg.potential_id = 7;
        cfg.closure_name = "PY".to_string();
        cfg.phi = 0.01;
        let ctx = cfg.into_context().unwrap();
        let result = run_ramp(&ctx, None).unwrap();
        // g(r) should be close to the step function Theta(r - sigma) at
        // very low density.
        for (i, &r) in ctx.grid.r().iter().enumerate() {
            if r > ctx.sigma * 1.5 {
                let g = result.state.h[i] + 1.0;
                assert!((g - 1.0).abs() < 0.1, "g({r})={g}");
            }
        }
    }
}
