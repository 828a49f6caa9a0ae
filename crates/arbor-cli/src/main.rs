// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `arbor`: diagonalize symmetric 3×3 matrices from JSON files.

mod cli;
mod config;
mod input;
mod report;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use arbor_math::{ql, Eigen, GivensPair, JacobiState, SymmetricMatrix3};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::{ArborConfig, ConfigService, FsConfigStore, SolverKind, CONFIG_KEY};
use crate::report::{EigenRow, SweepRow, VerifyRow};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .with_writer(io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Eigen { file, solver, json } => {
            let matrices = input::load(&file)?;
            let rows = run_eigen(&matrices, solver.unwrap_or(config.solver))?;
            if json {
                report::write_json(&mut out, &rows)?;
            } else {
                writeln!(out, "{}", report::eigen_table(&rows))?;
            }
        }
        Commands::Sweep {
            file,
            max_sweeps,
            tolerance,
            json,
        } => {
            let matrices = input::load(&file)?;
            let rows = run_sweep(
                &matrices,
                max_sweeps.unwrap_or(config.max_sweeps),
                tolerance.unwrap_or(config.tolerance),
            );
            if json {
                report::write_json(&mut out, &rows)?;
            } else {
                writeln!(out, "{}", report::sweep_table(&rows))?;
            }
        }
        Commands::Verify { file, tolerance } => {
            let matrices = input::load(&file)?;
            let rows = run_verify(&matrices, tolerance.unwrap_or(config.check_tolerance));
            writeln!(out, "{}", report::verify_table(&rows))?;
            let failures = rows.iter().filter(|row| !row.passed).count();
            if failures > 0 {
                bail!("{failures} of {} checks failed", rows.len());
            }
            info!(checks = rows.len(), "all checks passed");
        }
        Commands::Config { write } => {
            serde_json::to_writer_pretty(&mut out, &config)?;
            writeln!(out)?;
            if write {
                let store = match cli.config.as_deref() {
                    Some(path) => FsConfigStore::with_file(path),
                    None => FsConfigStore::new().context("failed to resolve config directory")?,
                };
                let path = store.path_for(CONFIG_KEY);
                ConfigService::new(store)
                    .save(CONFIG_KEY, &config)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "wrote config");
            }
        }
    }
    Ok(())
}

/// Loads the CLI config; an explicit path must exist, the platform default may not.
fn load_config(explicit: Option<&Path>) -> Result<ArborConfig> {
    let store = match explicit {
        Some(path) => FsConfigStore::with_file(path),
        None => match FsConfigStore::new() {
            Ok(store) => store,
            Err(err) => {
                debug!(%err, "no config directory; using defaults");
                return Ok(ArborConfig::default());
            }
        },
    };
    let path = store.path_for(CONFIG_KEY);
    let loaded = ConfigService::new(store)
        .load::<ArborConfig>(CONFIG_KEY)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    match loaded {
        Some(config) => {
            debug!(path = %path.display(), ?config, "loaded config");
            Ok(config)
        }
        None if explicit.is_some() => bail!("config file {} not found", path.display()),
        None => Ok(ArborConfig::default()),
    }
}

fn solve(m: &SymmetricMatrix3, solver: SolverKind) -> Result<Eigen> {
    match solver {
        SolverKind::ClosedForm => Ok(m.eigen()),
        SolverKind::Ql => Ok(ql::eigen(m)?),
    }
}

fn run_eigen(matrices: &[SymmetricMatrix3], solver: SolverKind) -> Result<Vec<EigenRow>> {
    let rows = matrices
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let eigen = solve(m, solver).with_context(|| format!("matrix {index}"))?;
            Ok(EigenRow::new(index, solver, &eigen, eigen.residual(m)))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(count = rows.len(), solver = solver.as_str(), "diagonalized");
    Ok(rows)
}

/// Cycles P01, P12, P20 until the off-diagonal energy drops below `tolerance`
/// or `max_sweeps` is spent. Returns the final state, sweeps used and whether
/// the target was met.
fn drive(m: SymmetricMatrix3, max_sweeps: u32, tolerance: f32) -> (JacobiState, u32, bool) {
    let mut state = JacobiState::new(m);
    let mut sweeps = 0;
    while state.off_diagonal_energy() >= tolerance && sweeps < max_sweeps {
        for pair in GivensPair::CYCLE {
            state.rotate(pair);
        }
        sweeps += 1;
        debug!(sweep = sweeps, energy = state.off_diagonal_energy(), "sweep");
    }
    let converged = state.off_diagonal_energy() < tolerance;
    (state, sweeps, converged)
}

fn run_sweep(matrices: &[SymmetricMatrix3], max_sweeps: u32, tolerance: f32) -> Vec<SweepRow> {
    let rows: Vec<SweepRow> = matrices
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let (state, sweeps, converged) = drive(*m, max_sweeps, tolerance);
            if !converged {
                warn!(
                    index,
                    sweeps,
                    energy = state.off_diagonal_energy(),
                    tolerance,
                    "sweep budget exhausted"
                );
            }
            SweepRow::new(index, sweeps, converged, &state)
        })
        .collect();
    let converged = rows.iter().filter(|row| row.converged).count();
    info!(count = rows.len(), converged, max_sweeps, tolerance, "swept");
    rows
}

fn run_verify(matrices: &[SymmetricMatrix3], tolerance: f32) -> Vec<VerifyRow> {
    let mut rows = Vec::with_capacity(matrices.len() * 2);
    for (index, m) in matrices.iter().enumerate() {
        let scale = m.max_abs_element().max(f32::MIN_POSITIVE);
        for solver in [SolverKind::ClosedForm, SolverKind::Ql] {
            let (residual, orthonormality) = match solve(m, solver) {
                Ok(eigen) => (eigen.residual(m) / scale, eigen.orthonormality_error()),
                Err(err) => {
                    warn!(index, solver = solver.as_str(), %err, "solver failed");
                    (f32::INFINITY, f32::INFINITY)
                }
            };
            let passed = residual <= tolerance && orthonormality <= tolerance;
            if !passed {
                warn!(index, solver = solver.as_str(), residual, orthonormality, "check failed");
            }
            rows.push(VerifyRow {
                index,
                solver,
                residual,
                orthonormality,
                passed,
            });
        }
    }
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tridiagonal() -> SymmetricMatrix3 {
        SymmetricMatrix3::new(2.0, 2.0, 2.0, 1.0, 0.0, 1.0)
    }

    #[test]
    fn drive_stops_once_below_tolerance() {
        let (state, sweeps, converged) = drive(tridiagonal(), 10, 1e-6);
        assert!(converged);
        assert!((1..=5).contains(&sweeps), "{sweeps}");
        assert!(state.off_diagonal_energy() < 1e-6);
    }

    #[test]
    fn drive_reports_exhausted_budget() {
        let (state, sweeps, converged) = drive(tridiagonal(), 0, 1e-6);
        assert!(!converged);
        assert_eq!(sweeps, 0);
        assert_eq!(state.matrix, tridiagonal());
    }

    #[test]
    fn verify_checks_both_solvers() {
        let rows = run_verify(&[tridiagonal(), SymmetricMatrix3::ZERO], 1e-4);
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.passed), "{rows:?}");
    }

    #[test]
    fn eigen_rows_follow_requested_solver() {
        let rows = run_eigen(&[tridiagonal()], SolverKind::Ql).unwrap();
        assert_eq!(rows[0].solver, SolverKind::Ql);
        assert!(rows[0].residual < 1e-5);
    }
}
