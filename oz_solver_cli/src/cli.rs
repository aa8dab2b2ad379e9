// oz_solver_cli - command-line front end for oz_solver
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

//! Argument parsing, kept to a thin `clap` derive struct that maps
//! one-to-one onto [`oz_solver::SolverConfig`]. This crate is the one place
//! `--closure`/`--potential`/etc. get turned into the plain-data
//! configuration the library validates.

use clap::{Parser, ValueEnum};
use oz_solver::{OutputKind, SolverConfig};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ClosureArg {
    Hnc,
    Py,
    Ry,
}

impl ClosureArg {
    fn as_name(self) -> &'static str {
        match self {
            ClosureArg::Hnc => "HNC",
            ClosureArg::Py => "PY",
            ClosureArg::Ry => "RY",
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputArg {
    /// S(k), the static structure factor.
    S,
    /// 1/S(k).
    SInverse,
    /// c_hat(k), the direct correlation function in k-space.
    CHat,
    /// g(r), the radial distribution function.
    G,
}

impl From<OutputArg> for OutputKind {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::S => OutputKind::StructureFactor,
            OutputArg::SInverse => OutputKind::InverseStructureFactor,
            OutputArg::CHat => OutputKind::DirectCorrelationK,
            OutputArg::G => OutputKind::PairDistributionR,
        }
    }
}

/// Solve the Ornstein-Zernike integral equation for a single-component
/// isotropic fluid and write its correlation functions to disk.
#[derive(Debug, Parser)]
#[command(name = "oz_solver", version, about)]
pub struct Args {
    /// Closure relation.
    #[arg(long, value_enum, default_value = "py")]
    pub closure: ClosureArg,

    /// Potential catalogue id (1=IPL, 2=WCA, 3=LJ, 4=double Yukawa, 5=square well, 7=hard sphere, 13=Hertzian).
    #[arg(long, default_value_t = 7)]
    pub potential: i32,

    /// Target volume fraction.
    #[arg(long = "volfactor", default_value_t = 0.3)]
    pub volfactor: f64,

    /// Reduced temperature (beta = 1/temp).
    #[arg(long = "temp", default_value_t = 1.0)]
    pub temp: f64,

    /// Secondary temperature (double Yukawa repulsive amplitude scale).
    #[arg(long = "temp2", default_value_t = 1.0)]
    pub temp2: f64,

    /// Attractive decay rate / reduced exponent, potential-dependent.
    #[arg(long, default_value_t = 12.0)]
    pub lambda_a: f64,

    /// Repulsive decay rate (double Yukawa only).
    #[arg(long, default_value_t = 4.0)]
    pub lambda_r: f64,

    /// Number of radial grid points.
    #[arg(long, default_value_t = 4096)]
    pub nodes: usize,

    /// Number of wavevector grid points. The radial transform uses a
    /// matching k-grid of the same length as the real-space grid, so this
    /// overrides `--nodes` when given (and a mismatch is logged); kept as
    /// its own flag for compatibility with tooling that expects separate
    /// `--nodes`/`--knodes` flags.
    #[arg(long)]
    pub knodes: Option<usize>,

    /// Outer radius of the real-space grid, in units of sigma.
    #[arg(long = "rmax", default_value_t = 160.0)]
    pub r_max: f64,

    /// Hard-core / length-scale diameter.
    #[arg(long, default_value_t = 1.0)]
    pub sigma: f64,

    /// Diameter-scale alias for sigma; warns if it disagrees with `--sigma`.
    #[arg(long = "diameter-scale", default_value_t = 1.0)]
    pub diameter_scale: f64,

    /// Initial/trial Rogers-Young mixing parameter.
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,

    /// Lower end of the Rogers-Young consistency bisection bracket.
    #[arg(long = "alpha-lo", default_value_t = 0.1)]
    pub alpha_lo: f64,

    /// Upper end of the Rogers-Young consistency bisection bracket.
    #[arg(long = "alpha-hi", default_value_t = 5.0)]
    pub alpha_hi: f64,

    /// Picard-Ng convergence tolerance on max|gamma_out - gamma_in|.
    #[arg(long = "ez", default_value_t = 1e-4)]
    pub ez: f64,

    /// Number of density-ramp steps.
    #[arg(long, default_value_t = 100)]
    pub nrho: u32,

    /// Legacy Picard damping tunable.
    #[arg(long, default_value_t = 14.0)]
    pub xnu: f64,

    /// Worker threads for the radial transform (1 = serial).
    #[arg(long, default_value_t = 1)]
    pub threads: usize,

    /// Which series fills the primary `(x, y)` output column pair.
    #[arg(long, value_enum, default_value = "g")]
    pub output: OutputArg,

    /// Directory to write the timestamped run's `.dat` files into.
    #[arg(long = "out-dir", default_value = "oz_output")]
    pub out_dir: std::path::PathBuf,

    /// Verbosity: pass once for info, twice for debug, three times for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn to_solver_config(&self) -> SolverConfig {
        let mut cfg = SolverConfig::default();
        if let Some(knodes) = self.knodes {
            if knodes != self.nodes {
                log::warn!(
                    "--knodes ({}) was supplied and differs from --nodes ({}); \
                     using --knodes for the (shared) grid length",
                    knodes,
                    self.nodes
                );
            }
        }
        cfg.nodes = self.knodes.unwrap_or(self.nodes);
        cfg.nrho = self.nrho;
        cfg.r_max = self.r_max;
        cfg.potential_id = self.potential;
        cfg.closure_name = self.closure.as_name().to_string();
        cfg.sigma1 = self.sigma;
        cfg.diameter_scale = self.diameter_scale;
        cfg.temperature = self.temp;
        cfg.temperature2 = self.temp2;
        cfg.lambda_a = self.lambda_a;
        cfg.lambda_r = self.lambda_r;
        cfg.phi = self.volfactor;
        cfg.alpha_initial = self.alpha;
        cfg.alpha_lo = self.alpha_lo;
        cfg.alpha_hi = self.alpha_hi;
        cfg.ez = self.ez;
        cfg.xnu = self.xnu;
        cfg.num_threads = self.threads;
        cfg.output = self.output.into();
        cfg
    }
}
