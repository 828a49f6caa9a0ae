// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-matrix result records and their table/JSON renderings.

use std::io::Write;

use anyhow::Result;
use arbor_math::{Eigen, JacobiState};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;

use crate::config::SolverKind;

/// One eigendecomposition.
#[derive(Debug, Clone, Serialize)]
pub struct EigenRow {
    /// Position in the input file.
    pub index: usize,
    /// Solver that produced the row.
    pub solver: SolverKind,
    /// Eigenvalues, paired with `vectors` column-wise.
    pub values: [f32; 3],
    /// Eigenvectors as columns.
    pub vectors: [[f32; 3]; 3],
    /// Principal-axis frame `[x, y, z, w]`.
    pub rotation: [f32; 4],
    /// Largest reconstruction error.
    pub residual: f32,
}

impl EigenRow {
    /// Builds a row from a solver result.
    pub fn new(index: usize, solver: SolverKind, eigen: &Eigen, residual: f32) -> Self {
        let v = eigen.vectors;
        Self {
            index,
            solver,
            values: eigen.values_array(),
            vectors: [v.col(0).to_array(), v.col(1).to_array(), v.col(2).to_array()],
            rotation: eigen.rotation().to_array(),
            residual,
        }
    }
}

/// Outcome of driving Jacobi sweeps on one matrix.
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    /// Position in the input file.
    pub index: usize,
    /// Sweeps applied.
    pub sweeps: u32,
    /// Whether the energy target was met within budget.
    pub converged: bool,
    /// Remaining off-diagonal energy.
    pub energy: f32,
    /// Diagonal of the final matrix (approximate eigenvalues).
    pub diagonal: [f32; 3],
    /// Accumulated rotation `[x, y, z, w]`.
    pub rotation: [f32; 4],
}

impl SweepRow {
    /// Builds a row from a final state.
    pub fn new(index: usize, sweeps: u32, converged: bool, state: &JacobiState) -> Self {
        Self {
            index,
            sweeps,
            converged,
            energy: state.off_diagonal_energy(),
            diagonal: state.matrix.diagonal().to_array(),
            rotation: state.rotation.to_array(),
        }
    }
}

/// One solver checked against one matrix.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRow {
    /// Position in the input file.
    pub index: usize,
    /// Solver under test.
    pub solver: SolverKind,
    /// Reconstruction error relative to the largest entry.
    pub residual: f32,
    /// Largest deviation of `VᵀV` from the identity.
    pub orthonormality: f32,
    /// Whether both errors are within tolerance.
    pub passed: bool,
}

fn fmt3(v: [f32; 3]) -> String {
    format!("{:.6}, {:.6}, {:.6}", v[0], v[1], v[2])
}

fn fmt4(v: [f32; 4]) -> String {
    format!("{:.6}, {:.6}, {:.6}, {:.6}", v[0], v[1], v[2], v[3])
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

/// Renders eigendecompositions as a table.
pub fn eigen_table(rows: &[EigenRow]) -> Table {
    let mut t = table(vec!["#", "solver", "eigenvalues", "rotation (x, y, z, w)", "residual"]);
    for row in rows {
        t.add_row(vec![
            row.index.to_string(),
            row.solver.as_str().to_owned(),
            fmt3(row.values),
            fmt4(row.rotation),
            format!("{:.3e}", row.residual),
        ]);
    }
    t
}

/// Renders sweep outcomes as a table.
pub fn sweep_table(rows: &[SweepRow]) -> Table {
    let mut t = table(vec!["#", "sweeps", "converged", "energy", "diagonal", "rotation (x, y, z, w)"]);
    for row in rows {
        t.add_row(vec![
            row.index.to_string(),
            row.sweeps.to_string(),
            row.converged.to_string(),
            format!("{:.3e}", row.energy),
            fmt3(row.diagonal),
            fmt4(row.rotation),
        ]);
    }
    t
}

/// Renders verification results as a table.
pub fn verify_table(rows: &[VerifyRow]) -> Table {
    let mut t = table(vec!["#", "solver", "residual", "orthonormality", "status"]);
    for row in rows {
        t.add_row(vec![
            row.index.to_string(),
            row.solver.as_str().to_owned(),
            format!("{:.3e}", row.residual),
            format!("{:.3e}", row.orthonormality),
            if row.passed { "ok" } else { "FAIL" }.to_owned(),
        ]);
    }
    t
}

/// Writes `rows` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut impl Write, rows: &[T]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)?;
    Ok(())
}
