//! Core types shared across the snapshot engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reserved directory marking a managed root. Skipped during hashing at every level.
pub const MARKER_DIR: &str = ".vcsm";

/// Commit database location inside the marker directory.
pub const DB_NAME: &str = "vcsmdb";

/// Workspace configuration file inside the marker directory.
pub const WORKSPACE_CONFIG_FILE: &str = "config.toml";

/// Default read size when streaming file bytes into the hashers.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Lowercase hex BLAKE3 digest.
pub type Digest = String;

/// Tree-relative path with `/` separators. Names are kept exactly as on disk.
pub type PathKey = String;

/// Per-path digest table of one snapshot.
pub type Index = BTreeMap<PathKey, IndexEntry>;

/// Filesystem entry kind recorded in an [`Index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlink or other special entry, recorded but never followed.
    Other,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "dir"),
            EntryKind::Other => write!(f, "other"),
        }
    }
}

/// One index row: what kind of entry sat at the path and its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub kind: EntryKind,
    pub digest: Digest,
}

impl IndexEntry {
    pub fn file(digest: Digest) -> Self {
        Self {
            kind: EntryKind::File,
            digest,
        }
    }

    pub fn directory(digest: Digest) -> Self {
        Self {
            kind: EntryKind::Directory,
            digest,
        }
    }

    pub fn other(digest: Digest) -> Self {
        Self {
            kind: EntryKind::Other,
            digest,
        }
    }
}

/// How directory digests are derived.
///
/// `Rolling` threads one accumulator through the whole traversal, so a directory's
/// recorded digest depends on every entry hashed before it. `Merkle` hashes each
/// subtree on its own and combines child digests explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashMode {
    #[default]
    Rolling,
    Merkle,
}

impl fmt::Display for HashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashMode::Rolling => write!(f, "rolling"),
            HashMode::Merkle => write!(f, "merkle"),
        }
    }
}

impl FromStr for HashMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rolling" => Ok(HashMode::Rolling),
            "merkle" => Ok(HashMode::Merkle),
            other => Err(format!(
                "Invalid hash mode: {} (must be 'rolling' or 'merkle')",
                other
            )),
        }
    }
}
