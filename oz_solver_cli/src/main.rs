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

//! Thin CLI front end for `oz_solver`: parses argv, installs a logger,
//! runs one solve, and writes the documented `.dat` files. Everything
//! numerical lives in the library crate; this binary only owns argv, the
//! filesystem and the wall clock.

mod cli;
mod report;

use std::process::ExitCode;

use clap::Parser;
use oz_solver::OzError;

const EXIT_SUCCESS: u8 = 0;
const EXIT_BAD_ARGS: u8 = 1;
const EXIT_NOT_CONVERGED: u8 = 2;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    match run(&args) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<OzError>() {
        Some(OzError::NotConverged { .. }) | Some(OzError::SpinodalCrossing { .. }) => {
            EXIT_NOT_CONVERGED
        }
        Some(_) => EXIT_BAD_ARGS,
        None => EXIT_BAD_ARGS,
    }
}

fn run(args: &cli::Args) -> anyhow::Result<()> {
    let config = args.to_solver_config();
    log::info!(
        "solving: potential={} closure={:?} phi={} nodes={}",
        config.potential_id,
        config.closure_name,
        config.phi,
        config.nodes
    );

    let out = oz_solver::solve(config)?;

    log::info!(
        "converged: S(k->0)={:.6} P_virial={:.6} P_compressibility={:.6}",
        out.s0,
        out.pressure_virial,
        out.pressure_compressibility
    );
    if !out.ry_consistency {
        log::warn!("Rogers-Young consistency bracket did not change sign; reporting best-effort alpha");
    }

    let run_dir = report::make_run_dir(&args.out_dir)?;
    report::write_all(&run_dir, &out)?;
    log::info!("wrote output to {}", run_dir.display());

    Ok(())
}
