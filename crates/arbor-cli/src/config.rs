// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config service, storage port and filesystem adapter for the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Key the CLI stores its settings under.
pub const CONFIG_KEY: &str = "arbor";

/// Which eigensolver `arbor eigen` runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SolverKind {
    /// Non-iterative trigonometric solver.
    #[default]
    ClosedForm,
    /// Householder + QL reference solver.
    Ql,
}

impl SolverKind {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClosedForm => "closed-form",
            Self::Ql => "ql",
        }
    }
}

/// Persisted CLI settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArborConfig {
    /// Default solver for `arbor eigen`.
    pub solver: SolverKind,
    /// Sweep budget for `arbor sweep`.
    pub max_sweeps: u32,
    /// Off-diagonal energy target for `arbor sweep`.
    pub tolerance: f32,
    /// Residual bound (relative to the largest entry) for `arbor verify`.
    pub check_tolerance: f32,
}

impl Default for ArborConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::ClosedForm,
            max_sweeps: 10,
            tolerance: 1e-6,
            check_tolerance: 1e-4,
        }
    }
}

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Serializes config values and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and deserialize a config value for `key`. Returns `Ok(None)` if missing.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let value = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serialize and persist a config value for `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let data = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &data)
    }
}

/// JSON files under the platform config directory, or one explicit file.
pub struct FsConfigStore {
    base: PathBuf,
    file: Option<PathBuf>,
}

impl FsConfigStore {
    /// Store rooted at the user config directory (e.g. `~/.config/arbor`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "Arbor")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Ok(Self {
            base: proj.config_dir().to_path_buf(),
            file: None,
        })
    }

    /// Store pinned to a single file; every key maps to `path`.
    pub fn with_file(path: &Path) -> Self {
        Self {
            base: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            file: Some(path.to_path_buf()),
        }
    }

    /// Where `key` is read from and written to.
    pub fn path_for(&self, key: &str) -> PathBuf {
        match &self.file {
            Some(file) => file.clone(),
            None => self.base.join(format!("{key}.json")),
        }
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key);
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}
