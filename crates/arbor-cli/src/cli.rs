// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::SolverKind;

#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about = "Diagonalize symmetric 3x3 matrices")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Eigendecompose every matrix in a JSON file
    Eigen {
        /// JSON array of matrices (packed or row-major)
        file: PathBuf,
        /// Solver to use (overrides config)
        #[arg(long, value_enum)]
        solver: Option<SolverKind>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run Jacobi sweeps until the off-diagonal energy drops below tolerance
    Sweep {
        /// JSON array of matrices (packed or row-major)
        file: PathBuf,
        /// Sweep budget per matrix (overrides config)
        #[arg(long)]
        max_sweeps: Option<u32>,
        /// Off-diagonal energy target (overrides config)
        #[arg(long)]
        tolerance: Option<f32>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check both solvers against every matrix; exits non-zero on failure
    Verify {
        /// JSON array of matrices (packed or row-major)
        file: PathBuf,
        /// Allowed residual relative to the largest entry (overrides config)
        #[arg(long)]
        tolerance: Option<f32>,
    },
    /// Print the effective configuration
    Config {
        /// Persist the effective configuration to the config store
        #[arg(long)]
        write: bool,
    },
}
