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

//! The thin reporter: writes `oz_solver::SolveOutput`'s series to
//! tab-separated `.dat` files, into a fresh timestamped directory under
//! the caller's `--out-dir`. Nothing in `oz_solver` itself touches the
//! filesystem or the wall clock; that split keeps the numerical core
//! testable without any I/O fixtures.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use oz_solver::SolveOutput;

/// Create `<out_dir>/<YYYYmmdd-HHMMSS>/` and return its path.
pub fn make_run_dir(out_dir: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let dir = out_dir.join(stamp);
    fs::create_dir_all(&dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    Ok(dir)
}

fn write_columns(path: &Path, x: &[f64], y: &[f64]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (xi, yi) in x.iter().zip(y) {
        writeln!(writer, "{:.17e}\t{:.17e}", xi, yi)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the three `(x, y)` series
/// (`<closure>_SdeK.dat`, `<closure>_GdeR.dat`, `<closure>_CdeK.dat`) into
/// `run_dir`, prefixed by whichever closure actually produced `out`
/// (important for Rogers-Young, which is reported under its own prefix
/// even though the CLI flag that selected it was spelled `--closure ry`).
pub fn write_all(run_dir: &Path, out: &SolveOutput) -> Result<()> {
    let prefix = out.closure.name();

    write_columns(&run_dir.join(format!("{prefix}_SdeK.dat")), &out.k, &out.s)?;
    write_columns(&run_dir.join(format!("{prefix}_GdeR.dat")), &out.r, &out.g)?;
    write_columns(&run_dir.join(format!("{prefix}_CdeK.dat")), &out.k, &out.c_hat)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_run_dir_creates_a_timestamped_subdirectory() {
        let tmp = std::env::temp_dir().join(format!("oz_solver_cli_test_{}", std::process::id()));
        let dir = make_run_dir(&tmp).unwrap();
        assert!(dir.exists());
        assert!(dir.starts_with(&tmp));
        fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn write_columns_round_trips_full_precision() {
        let tmp = std::env::temp_dir().join(format!("oz_solver_cli_cols_{}", std::process::id()));
        fs::create_dir_all(&tmp).unwrap();
        let path = tmp.join("test.dat");
        let x = vec![1.0, 2.5, std::f64::consts::PI];
        let y = vec![0.1, -2.0, 1e-12];
        write_columns(&path, &x, &y).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: Vec<&str> = lines[0].split('\t').collect();
        let parsed_x: f64 = first[0].parse().unwrap();
        let parsed_y: f64 = first[1].parse().unwrap();
        assert!((parsed_x - 1.0).abs() < 1e-15);
        assert!((parsed_y - 0.1).abs() < 1e-15);
        fs::remove_dir_all(&tmp).ok();
    }
}
