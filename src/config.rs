//! Solver configuration
//!
//! Loaded from a JSON file; every field is optional:
//!
//! ```json
//! { "threads": 4, "timeout_ms": 30000, "start_nonce": null }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Thread count must be at least 1")]
    InvalidThreads,
}

/// Work solver configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Worker threads (default: one per CPU core)
    pub threads: Option<usize>,
    /// Give up after this many milliseconds (default: run until solved)
    pub timeout_ms: Option<u64>,
    /// First start nonce for deterministic partitioning (default: random every round)
    pub start_nonce: Option<u64>,
}

impl SolverConfig {
    /// Load a configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded solver config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Get the default solver config file path
#[cfg(feature = "cli")]
pub fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("nanolib").join("solver.json")
}
