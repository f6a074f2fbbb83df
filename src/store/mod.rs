//! Commit Store
//!
//! Append-only persistent storage for commits, keyed by root digest.

pub mod persistence;

pub use persistence::SledCommitStore;

use crate::commit::Commit;
use crate::error::StorageError;
use crate::types::{Digest, EntryKind, HashMode, Index, IndexEntry, PathKey};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk layout version of [`StoredCommit`]
pub const SCHEMA_VERSION: u32 = 1;

/// Result of an insert-if-absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Committed,
    AlreadyCommitted,
}

/// Commit Store interface
///
/// There is no update or delete: history is append-only.
pub trait CommitStore {
    /// Persist `commit` unless its root digest is already present
    fn insert(&self, commit: &Commit) -> Result<InsertOutcome, StorageError>;

    fn get(&self, root_digest: &str) -> Result<Option<Commit>, StorageError>;

    fn load_all(&self) -> Result<BTreeMap<Digest, Commit>, StorageError>;

    fn len(&self) -> Result<usize, StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

/// Serialized commit record
///
/// Kept separate from [`Commit`] so the database format stays explicit: plain
/// strings and an ordered list of index rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCommit {
    pub schema_version: u32,
    pub id: String,
    pub message: String,
    pub root_digest: Digest,
    pub hash_mode: HashMode,
    /// RFC 3339, UTC
    pub created_at: String,
    pub index: Vec<(PathKey, EntryKind, Digest)>,
}

impl From<&Commit> for StoredCommit {
    fn from(commit: &Commit) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            id: commit.id().to_string(),
            message: commit.message().to_string(),
            root_digest: commit.root_digest().to_string(),
            hash_mode: commit.hash_mode(),
            created_at: commit
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Nanos, true),
            index: commit
                .index()
                .iter()
                .map(|(path, entry)| (path.clone(), entry.kind, entry.digest.clone()))
                .collect(),
        }
    }
}

impl TryFrom<StoredCommit> for Commit {
    type Error = StorageError;

    fn try_from(stored: StoredCommit) -> Result<Self, Self::Error> {
        if stored.schema_version != SCHEMA_VERSION {
            return Err(StorageError::Serialization(format!(
                "Unsupported commit schema version {} for {}",
                stored.schema_version, stored.root_digest
            )));
        }

        let created_at = DateTime::parse_from_rfc3339(&stored.created_at)
            .map_err(|e| {
                StorageError::Serialization(format!(
                    "Invalid commit timestamp {:?}: {}",
                    stored.created_at, e
                ))
            })?
            .with_timezone(&Utc);

        let index: Index = stored
            .index
            .into_iter()
            .map(|(path, kind, digest)| (path, IndexEntry { kind, digest }))
            .collect();

        Ok(Commit::from_parts(
            stored.id,
            stored.message,
            stored.root_digest,
            stored.hash_mode,
            created_at,
            index,
        ))
    }
}
