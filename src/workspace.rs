//! Workspace operations
//!
//! The entry points an external caller uses: initialize a managed root, purge
//! its stored state, commit, list commits, and roll back. Every operation takes
//! the root explicitly; there is no process-wide notion of a current tree.

use crate::commit::{Commit, CommitSummary};
use crate::config::{workspace_config_path, ConfigLoader, VcsmConfig};
use crate::error::VcsError;
use crate::reconcile::{Reconciler, RollbackReport};
use crate::store::{CommitStore, InsertOutcome, SledCommitStore};
use crate::tree::path;
use crate::types::{DB_NAME, MARKER_DIR};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Shortest digest prefix accepted by [`Workspace::rollback`]
pub const MIN_DIGEST_PREFIX: usize = 4;

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    Committed(Commit),
    /// A commit with the same root digest already exists; nothing was written.
    AlreadyCommitted(Commit),
}

impl CommitOutcome {
    pub fn commit(&self) -> &Commit {
        match self {
            CommitOutcome::Committed(c) | CommitOutcome::AlreadyCommitted(c) => c,
        }
    }
}

/// A managed (or to-be-managed) directory tree
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: VcsmConfig,
}

impl Workspace {
    /// Open `root` with configuration loaded from the standard sources
    pub fn open(root: &Path) -> Result<Self, VcsError> {
        let root = path::canonicalize_root(root)?;
        let config = ConfigLoader::load(&root)?;
        Self::with_config(&root, config)
    }

    /// Open `root` with an explicit configuration
    pub fn with_config(root: &Path, config: VcsmConfig) -> Result<Self, VcsError> {
        config.ensure_valid()?;
        Ok(Self {
            root: path::canonicalize_root(root)?,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &VcsmConfig {
        &self.config
    }

    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(MARKER_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.marker_dir().is_dir()
    }

    /// Create the marker directory and a default workspace config file
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn init(&self) -> Result<PathBuf, VcsError> {
        let marker = self.marker_dir();
        if marker.exists() {
            return Err(VcsError::AlreadyInitialized(self.root.clone()));
        }

        std::fs::create_dir_all(&marker)?;
        std::fs::write(
            workspace_config_path(&self.root),
            self.config.to_toml_string()?,
        )?;

        info!(marker = %marker.display(), "Workspace initialized");
        Ok(marker)
    }

    /// Remove everything inside the marker directory, keeping the directory itself
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn purge(&self) -> Result<usize, VcsError> {
        self.require_initialized()?;

        let mut removed = 0;
        for entry in std::fs::read_dir(self.marker_dir())? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(entry.path())?;
            } else {
                std::fs::remove_file(entry.path())?;
            }
            removed += 1;
        }

        info!(removed, "Workspace purged");
        Ok(removed)
    }

    /// Snapshot the tree and store it under `message`
    #[instrument(skip(self, message), fields(root = %self.root.display()))]
    pub fn commit(&self, message: &str) -> Result<CommitOutcome, VcsError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(VcsError::EmptyMessage);
        }
        self.require_initialized()?;

        let commit = Commit::capture(
            self.root.clone(),
            message,
            self.config.hashing.mode,
            self.config.hashing.chunk_size,
        )?;

        let store = self.open_store()?;
        match store.insert(&commit)? {
            InsertOutcome::Committed => Ok(CommitOutcome::Committed(commit)),
            InsertOutcome::AlreadyCommitted => Ok(CommitOutcome::AlreadyCommitted(commit)),
        }
    }

    /// All stored commits, oldest first
    pub fn list_commits(&self) -> Result<Vec<CommitSummary>, VcsError> {
        self.require_initialized()?;

        let mut commits: Vec<Commit> = self.open_store()?.load_all()?.into_values().collect();
        commits.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.root_digest().cmp(b.root_digest()))
        });
        Ok(commits.iter().map(Commit::summary).collect())
    }

    /// Reconcile the tree against the commit identified by `digest`
    ///
    /// `digest` may be a unique prefix of at least [`MIN_DIGEST_PREFIX`] characters.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn rollback(&self, digest: &str) -> Result<RollbackReport, VcsError> {
        self.require_initialized()?;

        let store = self.open_store()?;
        let target = self.resolve(&store, digest.trim())?;
        drop(store);

        let report = Reconciler::new(self.root.clone())
            .with_chunk_size(self.config.hashing.chunk_size)
            .rollback(&target)?;
        Ok(report)
    }

    fn resolve(&self, store: &SledCommitStore, digest: &str) -> Result<Commit, VcsError> {
        if let Some(commit) = store.get(digest)? {
            return Ok(commit);
        }
        if digest.len() < MIN_DIGEST_PREFIX {
            return Err(VcsError::NotFound(digest.to_string()));
        }

        let mut matches: Vec<Commit> = store
            .load_all()?
            .into_iter()
            .filter(|(key, _)| key.starts_with(digest))
            .map(|(_, commit)| commit)
            .collect();

        match matches.len() {
            0 => Err(VcsError::NotFound(digest.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(VcsError::AmbiguousDigest(digest.to_string())),
        }
    }

    fn require_initialized(&self) -> Result<(), VcsError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(VcsError::NotInitialized(self.root.clone()))
        }
    }

    fn open_store(&self) -> Result<SledCommitStore, VcsError> {
        Ok(SledCommitStore::new(self.marker_dir().join(DB_NAME))?)
    }
}
