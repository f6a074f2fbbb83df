//! Error types for the vcsm snapshot engine.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors: filesystem walks, hashing reads, the commit database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors surfaced by the workspace operations.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("vcsm is not initialized at {0:?}. Run `vcsm init` first.")]
    NotInitialized(PathBuf),

    #[error("vcsm root has already been initialized at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("No such commit: {0}")]
    NotFound(String),

    #[error("Digest prefix {0} matches more than one commit")]
    AmbiguousDigest(String),

    #[error("Commit message must be specified")]
    EmptyMessage,

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for VcsError {
    fn from(err: std::io::Error) -> Self {
        VcsError::StorageError(StorageError::IoError(err))
    }
}

impl From<config::ConfigError> for VcsError {
    fn from(err: config::ConfigError) -> Self {
        VcsError::ConfigError(err.to_string())
    }
}
