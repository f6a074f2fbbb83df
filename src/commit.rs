//! Commit records
//!
//! A commit pairs a user message and a unique id with the snapshot of a tree
//! taken at commit time. Commits are immutable once created.

use crate::error::StorageError;
use crate::tree::{Snapshot, TreeHasher};
use crate::types::{Digest, HashMode, Index};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// A named snapshot of a tree
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    id: String,
    message: String,
    root_digest: Digest,
    hash_mode: HashMode,
    created_at: DateTime<Utc>,
    index: Index,
}

impl Commit {
    /// Build a commit from an already computed snapshot
    pub fn new(message: impl Into<String>, snapshot: Snapshot, hash_mode: HashMode) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            message: message.into(),
            root_digest: snapshot.root_digest,
            hash_mode,
            created_at: Utc::now(),
            index: snapshot.index,
        }
    }

    /// Hash `root` and wrap the result in a new commit
    pub fn capture(
        root: PathBuf,
        message: impl Into<String>,
        hash_mode: HashMode,
        chunk_size: usize,
    ) -> Result<Self, StorageError> {
        let snapshot = TreeHasher::new(root)
            .with_mode(hash_mode)
            .with_chunk_size(chunk_size)
            .compute()?;
        Ok(Self::new(message, snapshot, hash_mode))
    }

    /// Reassemble a commit read back from storage
    pub(crate) fn from_parts(
        id: String,
        message: String,
        root_digest: Digest,
        hash_mode: HashMode,
        created_at: DateTime<Utc>,
        index: Index,
    ) -> Self {
        Self {
            id,
            message,
            root_digest,
            hash_mode,
            created_at,
            index,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn root_digest(&self) -> &str {
        &self.root_digest
    }

    pub fn hash_mode(&self) -> HashMode {
        self.hash_mode
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn summary(&self) -> CommitSummary {
        CommitSummary {
            id: self.id.clone(),
            message: self.message.clone(),
            root_digest: self.root_digest.clone(),
            hash_mode: self.hash_mode,
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            entries: self.index.len(),
        }
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Commit: {}\n\tUUID: {}\n\tHash: {}",
            self.message, self.id, self.root_digest
        )
    }
}

/// Listing view of a commit, without its index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub id: String,
    pub message: String,
    pub root_digest: Digest,
    pub hash_mode: HashMode,
    pub created_at: String,
    pub entries: usize,
}
