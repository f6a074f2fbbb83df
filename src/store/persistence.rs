//! Persistence layer for the Commit Store

use crate::commit::Commit;
use crate::error::StorageError;
use crate::store::{CommitStore, InsertOutcome, StoredCommit};
use crate::types::Digest;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

const COMMITS_TREE: &str = "commits";

/// Sled-based implementation of CommitStore
pub struct SledCommitStore {
    db: sled::Db,
    commits: sled::Tree,
}

impl SledCommitStore {
    /// Open (or create) the commit database at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::Database(format!(
                "Failed to open commit database {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_db(db)
    }

    /// Open a database that lives only as long as this store
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        let commits = db.open_tree(COMMITS_TREE)?;
        Ok(Self { db, commits })
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn decode(value: &[u8]) -> Result<Commit, StorageError> {
        let stored: StoredCommit = bincode::deserialize(value)?;
        Commit::try_from(stored)
    }
}

impl CommitStore for SledCommitStore {
    fn insert(&self, commit: &Commit) -> Result<InsertOutcome, StorageError> {
        let key = commit.root_digest().as_bytes();
        let value = bincode::serialize(&StoredCommit::from(commit))?;

        // Only succeeds when the key is absent, so an existing record is never replaced.
        let swapped = self
            .commits
            .compare_and_swap(key, None as Option<&[u8]>, Some(value))?;

        match swapped {
            Ok(()) => {
                self.flush()?;
                info!(root_digest = %commit.root_digest(), id = %commit.id(), "Commit stored");
                Ok(InsertOutcome::Committed)
            }
            Err(_) => {
                debug!(root_digest = %commit.root_digest(), "Commit already present");
                Ok(InsertOutcome::AlreadyCommitted)
            }
        }
    }

    fn get(&self, root_digest: &str) -> Result<Option<Commit>, StorageError> {
        match self.commits.get(root_digest.as_bytes())? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }

    fn load_all(&self) -> Result<BTreeMap<Digest, Commit>, StorageError> {
        let mut commits = BTreeMap::new();
        for item in self.commits.iter() {
            let (_, value) = item?;
            let commit = Self::decode(&value)?;
            commits.insert(commit.root_digest().to_string(), commit);
        }
        Ok(commits)
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.commits.len())
    }
}
