//! Rollback reconciliation
//!
//! Compares a stored commit's index with the live tree, deletes entries the
//! commit never contained, and reports entries the commit has that the live tree
//! lacks or holds with different content. File bytes are never restored.

use crate::commit::Commit;
use crate::error::StorageError;
use crate::tree::walker::{self, EntryType};
use crate::tree::{path, TreeHasher};
use crate::types::{Digest, EntryKind, Index, PathKey, DEFAULT_CHUNK_SIZE};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Why a snapshot entry could not be matched against the live tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscrepancyKind {
    /// Nothing exists at the path any more
    Missing,
    /// Something exists at the path but its content or kind differs
    Modified,
}

impl fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscrepancyKind::Missing => write!(f, "missing"),
            DiscrepancyKind::Modified => write!(f, "modified"),
        }
    }
}

/// A snapshot entry left unsatisfied after reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub path: PathKey,
    pub expected_kind: EntryKind,
    pub expected_digest: Digest,
    pub kind: DiscrepancyKind,
}

/// Outcome of a rollback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RollbackReport {
    /// Root digest of the target commit
    pub target: Digest,
    /// Entries deleted because the target commit did not contain them
    pub removed: Vec<PathKey>,
    /// Entries of the target commit that the live tree does not match, in key order
    pub discrepancies: Vec<Discrepancy>,
}

impl RollbackReport {
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

/// Reconciler bound to one live root
pub struct Reconciler {
    root: PathBuf,
    chunk_size: usize,
}

impl Reconciler {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Reconcile the live tree against `target`
    ///
    /// The live index is recomputed with the hash mode the target was recorded
    /// with, so digests are comparable.
    #[instrument(skip(self, target), fields(root = %self.root.display(), target = %target.root_digest()))]
    pub fn rollback(&self, target: &Commit) -> Result<RollbackReport, StorageError> {
        let start = Instant::now();

        let live = TreeHasher::new(self.root.clone())
            .with_mode(target.hash_mode())
            .with_chunk_size(self.chunk_size)
            .compute()?
            .index;

        let mut pending = target.index().clone();
        let mut report = RollbackReport {
            target: target.root_digest().to_string(),
            ..Default::default()
        };

        self.reconcile_dir(&self.root, "", &mut pending, &live, &mut report)?;

        report.discrepancies = pending
            .into_iter()
            .map(|(path, expected)| {
                let kind = if live.contains_key(&path) {
                    DiscrepancyKind::Modified
                } else {
                    DiscrepancyKind::Missing
                };
                warn!(path = %path, kind = %kind, "Discrepancy in object");
                Discrepancy {
                    path,
                    expected_kind: expected.kind,
                    expected_digest: expected.digest,
                    kind,
                }
            })
            .collect();

        info!(
            removed = report.removed.len(),
            discrepancies = report.discrepancies.len(),
            duration_ms = start.elapsed().as_millis(),
            "Rollback completed"
        );

        Ok(report)
    }

    fn reconcile_dir(
        &self,
        dir: &Path,
        prefix: &str,
        pending: &mut Index,
        live: &Index,
        report: &mut RollbackReport,
    ) -> Result<(), StorageError> {
        for entry in walker::read_sorted(dir)? {
            if entry.is_marker() {
                continue;
            }
            let key = path::join_key(prefix, &entry.name);

            let Some(expected) = pending.get(&key) else {
                remove_entry(&entry.path, entry.entry_type)?;
                info!(path = %key, "Removed entry absent from target");
                report.removed.push(key);
                continue;
            };

            if live.get(&key) == Some(expected) {
                debug!(path = %key, "Unchanged");
                satisfy(pending, &key);
                continue;
            }

            if entry.entry_type == EntryType::Directory {
                let expected_kind = expected.kind;
                self.reconcile_dir(&entry.path, &key, pending, live, report)?;
                // Still a directory: any difference now sits on a child key.
                if expected_kind == EntryKind::Directory {
                    pending.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// Mark `key` and everything beneath it as matched
fn satisfy(pending: &mut Index, key: &str) {
    pending.remove(key);
    let (lower, upper) = path::descendant_range(key);
    let beneath: Vec<PathKey> = pending.range(lower..upper).map(|(k, _)| k.clone()).collect();
    for k in beneath {
        pending.remove(&k);
    }
}

fn remove_entry(entry_path: &Path, entry_type: EntryType) -> Result<(), StorageError> {
    let result = match entry_type {
        EntryType::Directory => std::fs::remove_dir_all(entry_path),
        EntryType::File | EntryType::Other => std::fs::remove_file(entry_path),
    };
    result.map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to remove {:?}: {}", entry_path, e),
        ))
    })
}
