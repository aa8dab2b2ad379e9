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

//! Discriminated error type for every failure mode the solver can surface.
//!
//! Internal modules never log or print on their own; they return one of
//! these variants (or log a diagnostic via the `log` facade and keep going,
//! for the non-fatal cases) and let the caller decide what to do.

use thiserror::Error;

/// Everything that can go wrong building or running a solve.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OzError {
    /// `potentialID` is not in the catalogue.
    #[error("unknown potential id {0}")]
    UnknownPotential(i32),

    /// `closureID` does not name HNC, PY or RY.
    #[error("unknown closure {0:?}")]
    UnknownClosure(String),

    /// A caller-supplied numeric parameter is non-positive, NaN or otherwise
    /// cannot produce a physical potential/grid (e.g. `N == 0`, `r_max <= 0`).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// `phi` is at or beyond the closest-packing limit for the chosen geometry.
    #[error("volume fraction {phi} meets or exceeds the packing limit {limit}")]
    PackingLimitExceeded { phi: f64, limit: f64 },

    /// A density step did not converge within the iteration cap.
    #[error("density step at rho={rho} failed to converge after {iterations} iterations (last residual {last_residual:e})")]
    NotConverged {
        rho: f64,
        iterations: u32,
        last_residual: f64,
    },

    /// `1 - rho*c_hat(k) <= 0` at some grid point and step-halving was
    /// exhausted.
    #[error("spinodal crossed at rho={rho} after {halvings} halving attempts")]
    SpinodalCrossing { rho: f64, halvings: u32 },

    /// Working-array allocation could not be satisfied.
    #[error("allocation failure: {0}")]
    Allocation(String),
}

/// Convenience alias used throughout the crate.
pub type OzResult<T> = Result<T, OzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_context_in_their_display() {
        let e = OzError::NotConverged {
            rho: 0.3,
            iterations: 5000,
            last_residual: 1.2e-3,
        };
        let msg = format!("{}", e);
        assert!(msg.contains("0.3"));
        assert!(msg.contains("5000"));
    }
}
