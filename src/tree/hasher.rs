//! Digest computation for directory trees using BLAKE3
//!
//! Two modes are supported. In rolling mode a single accumulator absorbs every
//! entry name and every file byte in traversal order; a directory's index digest
//! is that accumulator's value when the directory's recursion completes. In merkle
//! mode each directory is hashed independently from its children's digests.
//!
//! Symlinks and other special entries are never followed. Their index digest is
//! the hash of the link target path (empty for sockets and devices).

use crate::error::StorageError;
use crate::tree::path;
use crate::tree::walker::{self, EntryType};
use crate::types::{Digest, HashMode, Index, IndexEntry, DEFAULT_CHUNK_SIZE};
use blake3::Hasher;
use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Result of hashing a tree: root digest plus the per-path index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub root_digest: Digest,
    pub index: Index,
}

const FILE_TAG: &[u8] = b"f";
const DIR_TAG: &[u8] = b"d";
const OTHER_TAG: &[u8] = b"o";

/// Tree hasher for a single root
pub struct TreeHasher {
    root: PathBuf,
    mode: HashMode,
    chunk_size: usize,
}

impl TreeHasher {
    /// Create a hasher for the given root in rolling mode
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            mode: HashMode::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_mode(mut self, mode: HashMode) -> Self {
        self.mode = mode;
        self
    }

    /// Read size for streaming file bytes. Does not affect digests.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Hash the whole tree
    #[instrument(skip(self), fields(root = %self.root.display(), mode = %self.mode))]
    pub fn compute(&self) -> Result<Snapshot, StorageError> {
        let start = Instant::now();
        debug!("Starting tree hash");

        let mut index = Index::new();
        let root_digest = match self.mode {
            HashMode::Rolling => {
                let mut running = Hasher::new();
                if self.root.is_dir() {
                    self.hash_rolling(&self.root, "", &mut running, &mut index)?;
                } else {
                    hash_file(&self.root, self.chunk_size, Some(&mut running))?;
                }
                hex_digest(&running)
            }
            HashMode::Merkle => {
                if self.root.is_dir() {
                    self.hash_merkle(&self.root, "", &mut index)?
                } else {
                    hash_file(&self.root, self.chunk_size, None)?
                }
            }
        };

        info!(
            root_digest = %root_digest,
            entries = index.len(),
            duration_ms = start.elapsed().as_millis(),
            "Tree hash completed"
        );

        Ok(Snapshot { root_digest, index })
    }

    /// Convenience wrapper returning only the root digest
    pub fn compute_root(&self) -> Result<Digest, StorageError> {
        Ok(self.compute()?.root_digest)
    }

    fn hash_rolling(
        &self,
        dir: &Path,
        prefix: &str,
        running: &mut Hasher,
        index: &mut Index,
    ) -> Result<(), StorageError> {
        for entry in walker::read_sorted(dir)? {
            // The name is absorbed before anything else, the marker directory included.
            running.update(entry.name.as_bytes());

            let key = path::join_key(prefix, &entry.name);
            match entry.entry_type {
                EntryType::File => {
                    let digest = hash_file(&entry.path, self.chunk_size, Some(&mut *running))?;
                    trace!(path = %key, digest = %digest, "Hashed file");
                    index.insert(key, IndexEntry::file(digest));
                }
                EntryType::Directory if entry.is_marker() => {}
                EntryType::Directory => {
                    self.hash_rolling(&entry.path, &key, running, index)?;
                    index.insert(key, IndexEntry::directory(hex_digest(running)));
                }
                EntryType::Other => {
                    let digest = hash_special(&entry.path, Some(&mut *running))?;
                    trace!(path = %key, digest = %digest, "Hashed special entry");
                    index.insert(key, IndexEntry::other(digest));
                }
            }
        }
        Ok(())
    }

    fn hash_merkle(
        &self,
        dir: &Path,
        prefix: &str,
        index: &mut Index,
    ) -> Result<Digest, StorageError> {
        let mut children: Vec<(String, &[u8], Digest)> = Vec::new();

        for entry in walker::read_sorted(dir)? {
            if entry.is_marker() {
                continue;
            }
            let key = path::join_key(prefix, &entry.name);
            match entry.entry_type {
                EntryType::File => {
                    let digest = hash_file(&entry.path, self.chunk_size, None)?;
                    index.insert(key, IndexEntry::file(digest.clone()));
                    children.push((entry.name, FILE_TAG, digest));
                }
                EntryType::Directory => {
                    let digest = self.hash_merkle(&entry.path, &key, index)?;
                    index.insert(key, IndexEntry::directory(digest.clone()));
                    children.push((entry.name, DIR_TAG, digest));
                }
                EntryType::Other => {
                    let digest = hash_special(&entry.path, None)?;
                    index.insert(key, IndexEntry::other(digest.clone()));
                    children.push((entry.name, OTHER_TAG, digest));
                }
            }
        }

        Ok(compute_directory_digest(&children))
    }
}

/// Combine sorted `(name, kind tag, digest)` children into a directory digest
///
/// digest = hash("dir" || count || for each child: name_len || name || tag || digest)
pub fn compute_directory_digest(children: &[(String, &[u8], Digest)]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(b"dir");
    hasher.update(&(children.len() as u64).to_be_bytes());
    for (name, tag, digest) in children {
        hasher.update(&(name.len() as u64).to_be_bytes());
        hasher.update(name.as_bytes());
        hasher.update(tag);
        hasher.update(digest.as_bytes());
    }
    hex_digest(&hasher)
}

/// Stream a file's bytes into a fresh content hasher and, when given, the running accumulator
///
/// Returns the content-only digest.
pub fn hash_file(
    file_path: &Path,
    chunk_size: usize,
    mut running: Option<&mut Hasher>,
) -> Result<Digest, StorageError> {
    let mut file = File::open(file_path).map_err(|e| read_error(file_path, e))?;

    let mut content = Hasher::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_error(file_path, e)),
        };
        content.update(&buf[..n]);
        if let Some(running) = running.as_deref_mut() {
            running.update(&buf[..n]);
        }
    }

    Ok(hex_digest(&content))
}

/// Digest a special entry without following it
///
/// A symlink contributes its target path bytes; anything else contributes nothing.
pub fn hash_special(
    entry_path: &Path,
    running: Option<&mut Hasher>,
) -> Result<Digest, StorageError> {
    let metadata = std::fs::symlink_metadata(entry_path).map_err(|e| read_error(entry_path, e))?;
    let target = if metadata.file_type().is_symlink() {
        std::fs::read_link(entry_path)
            .map_err(|e| read_error(entry_path, e))?
            .into_os_string()
    } else {
        OsString::new()
    };

    let bytes = target.as_encoded_bytes();
    if let Some(running) = running {
        running.update(bytes);
    }
    Ok(compute_content_hash(bytes))
}

fn read_error(entry_path: &Path, e: std::io::Error) -> StorageError {
    error!("Failed to read {:?}: {}", entry_path, e);
    StorageError::IoError(std::io::Error::new(
        e.kind(),
        format!("Failed to read {:?}: {}", entry_path, e),
    ))
}

/// Compute the content digest of in-memory bytes
pub fn compute_content_hash(content: &[u8]) -> Digest {
    hex::encode(blake3::hash(content).as_bytes())
}

/// Current value of a hasher as lowercase hex, leaving the hasher usable
fn hex_digest(hasher: &Hasher) -> Digest {
    hex::encode(hasher.finalize().as_bytes())
}
