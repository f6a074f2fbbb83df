//! Configuration System
//!
//! Layered configuration: built-in defaults, the global file, the workspace file
//! inside the marker directory, then `VCSM_*` environment variables.

use crate::error::VcsError;
use crate::logging::LoggingConfig;
use crate::types::{HashMode, DEFAULT_CHUNK_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcsmConfig {
    /// Tree hashing settings
    #[serde(default)]
    pub hashing: HashingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tree hashing settings used when taking new commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Directory digest scheme: rolling or merkle
    #[serde(default)]
    pub mode: HashMode,

    /// Read size when streaming files (bytes)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            mode: HashMode::default(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Hashing(String),
    Logging(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Hashing(msg) => write!(f, "Hashing: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl VcsmConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.hashing.chunk_size == 0 {
            errors.push(ValidationError::Hashing(
                "chunk_size must be greater than zero".to_string(),
            ));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one error
    pub fn ensure_valid(&self) -> Result<(), VcsError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            VcsError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })
    }

    /// Render as TOML, the format of the workspace config file
    pub fn to_toml_string(&self) -> Result<String, VcsError> {
        toml::to_string_pretty(self)
            .map_err(|e| VcsError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}
