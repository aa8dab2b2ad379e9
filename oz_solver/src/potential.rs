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

//! The pair-potential catalogue: maps a potential id and its species
//! parameters onto a tabulated `U(r)` and `Up(r) = -r dU/dr` (the virial
//! integrand factor) on a [`RadialGrid`].

use crate::error::OzError;
use crate::grid::RadialGrid;

/// Species parameters shared by the whole catalogue. Not every potential
/// uses every field; unused fields are simply ignored by that potential's
/// `tabulate` arm.
#[derive(Clone, Copy, Debug)]
pub struct PotentialParams {
    /// Hard-core / length-scale diameter.
    pub sigma: f64,
    /// Reduced temperature (`beta = 1/T` is applied uniformly by the
    /// closure module, *not* here).
    pub temperature: f64,
    /// Secondary temperature, used only by the double Yukawa potential to
    /// set the repulsive amplitude independently of the attractive one.
    pub temperature2: f64,
    /// Attractive decay rate (Double Yukawa) or reduced exponent (IPL) or
    /// well-width multiplier (square well).
    pub lambda_a: f64,
    /// Repulsive decay rate (Double Yukawa only).
    pub lambda_r: f64,
}

impl Default for PotentialParams {
    fn default() -> Self {
        PotentialParams {
            sigma: 1.0,
            temperature: 1.0,
            temperature2: 1.0,
            lambda_a: 12.0,
            lambda_r: 4.0,
        }
    }
}

/// The tabulated potential: `u[i] = U(r_i)`, `up[i] = -r_i * dU/dr(r_i)`,
/// plus a precomputed hard-core mask (`core[i] == true` iff `r_i` sits
/// inside a hard wall, where `U` is semantically `+infinity`).
#[derive(Clone, Debug)]
pub struct PotentialTable {
    pub u: Vec<f64>,
    pub up: Vec<f64>,
    pub core_mask: Vec<bool>,
    pub kind: PotentialKind,
    pub params: PotentialParams,
}

/// The potentials registered in the catalogue, keyed by the legacy integer
/// ids used by the external interface (`potentialID`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PotentialKind {
    /// ID 1: `U(r) = (sigma/r)^lambda`, exponent taken from `lambda_a`.
    InversePowerLaw,
    /// ID 2: Weeks-Chandler-Andersen (purely repulsive, shifted LJ).
    Wca,
    /// ID 3: full (untruncated) Lennard-Jones.
    LennardJones,
    /// ID 4: double Yukawa (attraction + repulsion), long-ranged.
    DoubleYukawa,
    /// ID 5: hard-core square well.
    SquareWell,
    /// ID 7: hard sphere.
    HardSphere,
    /// ID 13: Hertzian (finite, soft repulsion).
    Hertzian,
}

impl PotentialKind {
    pub fn from_id(id: i32) -> Result<Self, OzError> {
        match id {
            1 => Ok(PotentialKind::InversePowerLaw),
            2 => Ok(PotentialKind::Wca),
            3 => Ok(PotentialKind::LennardJones),
            4 => Ok(PotentialKind::DoubleYukawa),
            5 => Ok(PotentialKind::SquareWell),
            7 => Ok(PotentialKind::HardSphere),
            13 => Ok(PotentialKind::Hertzian),
            other => Err(OzError::UnknownPotential(other)),
        }
    }

    pub fn id(self) -> i32 {
        match self {
            PotentialKind::InversePowerLaw => 1,
            PotentialKind::Wca => 2,
            PotentialKind::LennardJones => 3,
            PotentialKind::DoubleYukawa => 4,
            PotentialKind::SquareWell => 5,
            PotentialKind::HardSphere => 7,
            PotentialKind::Hertzian => 13,
        }
    }

    /// Whether this potential has a hard wall (semantically `U = +inf`) for
    /// `r < sigma`.
    pub fn has_hard_core(self) -> bool {
        matches!(self, PotentialKind::HardSphere | PotentialKind::SquareWell)
    }
}

/// Analytic long-range tail split off the double Yukawa potential so the
/// radial transform only ever sees a function that has decayed by `r_max`.
///
/// `tail(r) = -K_a exp(-lambda_a r) / r`, whose exact forward transform is
/// `tail_hat(k) = -4 pi K_a / (lambda_a^2 + k^2)` (a standard Yukawa
/// transform). The repulsive branch decays at least as fast and is left in
/// the numerically-transformed remainder.
#[derive(Clone, Copy, Debug)]
pub struct YukawaTail {
    pub amplitude: f64,
    pub decay: f64,
}

impl YukawaTail {
    pub fn value(&self, r: f64) -> f64 {
        -self.amplitude * (-self.decay * r).exp() / r
    }

    pub fn forward_transform(&self, k: f64) -> f64 {
        -4.0 * std::f64::consts::PI * self.amplitude / (self.decay * self.decay + k * k)
    }
}

impl PotentialTable {
    /// Build the catalogue entry for `kind` on `grid`.
    pub fn build(kind: PotentialKind, params: PotentialParams, grid: &RadialGrid) -> Result<Self, OzError> {
        validate(&params)?;
        let n = grid.len();
        let mut u = vec![0.0; n];
        let mut up = vec![0.0; n];
        let mut core_mask = vec![false; n];
        let sigma = params.sigma;

        for (i, &r) in grid.r().iter().enumerate() {
            let (ui, upi, core) = match kind {
                PotentialKind::InversePowerLaw => {
                    let lambda = params.lambda_a;
                    let ui = (sigma / r).powf(lambda);
                    (ui, lambda * ui, false)
                }
                PotentialKind::Wca => wca(r, sigma),
                PotentialKind::LennardJones => {
                    let sr6 = (sigma / r).powi(6);
                    let sr12 = sr6 * sr6;
                    let ui = 4.0 * (sr12 - sr6);
                    let upi = 4.0 * (12.0 * sr12 - 6.0 * sr6);
                    (ui, upi, false)
                }
                PotentialKind::DoubleYukawa => double_yukawa(r, params),
                PotentialKind::SquareWell => {
                    if r < sigma {
                        (f64::INFINITY, 0.0, true)
                    } else if r < params.lambda_a * sigma {
                        (-1.0, 0.0, false)
                    } else {
                        (0.0, 0.0, false)
                    }
                }
                PotentialKind::HardSphere => {
                    if r < sigma {
                        (f64::INFINITY, 0.0, true)
                    } else {
                        (0.0, 0.0, false)
                    }
                }
                PotentialKind::Hertzian => {
                    if r < sigma {
                        let x = 1.0 - r / sigma;
                        let ui = x.powf(2.5);
                        let upi = (5.0 * r / (2.0 * sigma)) * x.sqrt().powi(3);
                        (ui, upi, false)
                    } else {
                        (0.0, 0.0, false)
                    }
                }
            };
            u[i] = ui;
            up[i] = upi;
            core_mask[i] = core;
        }

        Ok(PotentialTable {
            u,
            up,
            core_mask,
            kind,
            params,
        })
    }

    /// The analytic long-range tail to subtract before transforming `c(r)`,
    /// if this potential has one (only the double Yukawa potential does).
    pub fn long_range_tail(&self) -> Option<YukawaTail> {
        match self.kind {
            PotentialKind::DoubleYukawa => Some(YukawaTail {
                amplitude: 1.0,
                decay: self.params.lambda_a,
            }),
            _ => None,
        }
    }
}

fn wca(r: f64, sigma: f64) -> (f64, f64, bool) {
    let rc = 2f64.powf(1.0 / 6.0) * sigma;
    if r >= rc {
        return (0.0, 0.0, false);
    }
    let sr6 = (sigma / r).powi(6);
    let sr12 = sr6 * sr6;
    let ui = 4.0 * (sr12 - sr6) + 1.0;
    let upi = 4.0 * (12.0 * sr12 - 6.0 * sr6);
    (ui, upi, false)
}

fn double_yukawa(r: f64, params: PotentialParams) -> (f64, f64, bool) {
    let amp_a = 1.0;
    // `temperature2` has no stated meaning in the distilled spec beyond
    // "secondary temperature, double Yukawa only"; interpreted here as the
    // reciprocal scale of the repulsive amplitude against a fixed
    // attractive amplitude of 1, so raising T2 detunes the repulsive branch
    // relative to the attractive one independently of beta (which already
    // scales the whole potential uniformly in the closure). See DESIGN.md's
    // Open Questions section for the reasoning.
    let amp_r = 1.0 / params.temperature2;
    let la = params.lambda_a;
    let lr = params.lambda_r;
    let ui = -amp_a * (-la * r).exp() / r + amp_r * (-lr * r).exp() / r;
    let upi = -amp_a * (-la * r).exp() * (la + 1.0 / r) + amp_r * (-lr * r).exp() * (lr + 1.0 / r);
    (ui, upi, false)
}

fn validate(params: &PotentialParams) -> Result<(), OzError> {
    let checks: [(&'static str, f64); 5] = [
        ("sigma", params.sigma),
        ("temperature", params.temperature),
        ("temperature2", params.temperature2),
        ("lambda_a", params.lambda_a),
        ("lambda_r", params.lambda_r),
    ];
    for (name, value) in checks {
        if !value.is_finite() {
            return Err(OzError::InvalidParameter {
                name,
                reason: "must be finite".into(),
            });
        }
    }
    if params.sigma <= 0.0 {
        return Err(OzError::InvalidParameter {
            name: "sigma",
            reason: "must be positive".into(),
        });
    }
    if params.temperature <= 0.0 {
        return Err(OzError::InvalidParameter {
            name: "temperature",
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_sphere_core_mask_matches_sigma() {
        let grid = RadialGrid::new(64, 16.0);
        let params = PotentialParams {
            sigma: 1.0,
            ..Default::default()
        };
        let table = PotentialTable::build(PotentialKind::HardSphere, params, &grid).unwrap();
        for (i, &r) in grid.r().iter().enumerate() {
            assert_eq!(table.core_mask[i], r < 1.0);
            if r < 1.0 {
                assert!(table.u[i].is_infinite());
            } else {
                assert_eq!(table.u[i], 0.0);
            }
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        assert!(matches!(
            PotentialKind::from_id(999),
            Err(OzError::UnknownPotential(999))
        ));
    }

    #[test]
    fn wca_is_continuous_and_shifted_at_cutoff() {
        let grid = RadialGrid::new(4096, 16.0);
        let table = PotentialTable::build(PotentialKind::Wca, PotentialParams::default(), &grid).unwrap();
        let rc = 2f64.powf(1.0 / 6.0);
        // Just below the cutoff the potential should be small and positive,
        // and Up should be small too (both vanish continuously at rc): take
        // whichever grid point sits closest to rc from below.
        let idx = grid
            .r()
            .iter()
            .enumerate()
            .filter(|(_, &r)| r < rc)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!(table.u[idx].abs() < 1e-2);
        assert!(table.up[idx].abs() < 1e-1);
    }

    #[test]
    fn ipl_up_equals_lambda_times_u() {
        let grid = RadialGrid::new(32, 16.0);
        let params = PotentialParams {
            lambda_a: 12.0,
            ..Default::default()
        };
        let table = PotentialTable::build(PotentialKind::InversePowerLaw, params, &grid).unwrap();
        for i in 0..grid.len() {
            assert!((table.up[i] - 12.0 * table.u[i]).abs() < 1e-9 * table.u[i].abs().max(1.0));
        }
    }

    #[test]
    fn rejects_non_positive_sigma() {
        let grid = RadialGrid::new(8, 10.0);
        let params = PotentialParams {
            sigma: -1.0,
            ..Default::default()
        };
        assert!(PotentialTable::build(PotentialKind::HardSphere, params, &grid).is_err());
    }
}
