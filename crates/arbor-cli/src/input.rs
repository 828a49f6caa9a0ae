// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Matrix input files: a JSON array whose elements are either packed
//! `{"m00", "m11", "m22", "m01", "m02", "m12"}` objects or row-major
//! `[[..], [..], [..]]` arrays.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use arbor_math::{MathError, SymmetricMatrix3};
use serde::Deserialize;
use thiserror::Error;

/// Why an input document was rejected.
#[derive(Debug, Error)]
pub enum InputError {
    /// Not a JSON array of matrices.
    #[error("invalid matrix document: {0}")]
    Json(#[from] serde_json::Error),
    /// An element parsed but is not a usable symmetric matrix.
    #[error("matrix {index}: {source}")]
    Matrix {
        /// Position in the input array.
        index: usize,
        /// Underlying check failure.
        source: MathError,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MatrixInput {
    Packed(SymmetricMatrix3),
    Rows([[f32; 3]; 3]),
}

impl MatrixInput {
    fn into_matrix(self) -> Result<SymmetricMatrix3, MathError> {
        match self {
            Self::Packed(m) if m.is_finite() => Ok(m),
            Self::Packed(_) => Err(MathError::NonFinite),
            Self::Rows(rows) => SymmetricMatrix3::try_from_rows(rows),
        }
    }
}

/// Parses a matrix document.
pub fn parse(text: &str) -> Result<Vec<SymmetricMatrix3>, InputError> {
    let items: Vec<MatrixInput> = serde_json::from_str(text)?;
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.into_matrix()
                .map_err(|source| InputError::Matrix { index, source })
        })
        .collect()
}

/// Reads and parses a matrix file.
pub fn load(path: &Path) -> Result<Vec<SymmetricMatrix3>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}
