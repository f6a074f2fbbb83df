//! Sorted single-level directory listing shared by the hasher and the reconciler

use crate::error::StorageError;
use crate::types::MARKER_DIR;
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Filesystem entry types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    File,
    Directory,
    /// Symlinks, sockets, devices. Never followed.
    Other,
}

/// One child of a directory
#[derive(Debug, Clone)]
pub struct Entry {
    /// Bare name, byte-for-byte as stored on disk
    pub name: String,
    pub path: PathBuf,
    pub entry_type: EntryType,
}

impl Entry {
    /// The reserved marker directory, skipped wherever it appears
    pub fn is_marker(&self) -> bool {
        self.entry_type == EntryType::Directory && self.name == MARKER_DIR
    }
}

/// Case-insensitive name order, raw name as tie-breaker so the order is total
///
/// The primary key folds case on the NFC form, so canonically equivalent
/// spellings sort next to each other. They still stay distinct entries.
pub fn compare_names(a: &OsStr, b: &OsStr) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(name: &OsStr) -> String {
    name.to_string_lossy().nfc().collect::<String>().to_lowercase()
}

/// List the direct children of `dir` in traversal order
pub fn read_sorted(dir: &Path) -> Result<Vec<Entry>, StorageError> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by(|a, b| compare_names(a.file_name(), b.file_name()));

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to read directory {:?}: {}", dir, e),
            ))
        })?;

        let file_type = entry.file_type();
        let entry_type = if file_type.is_file() {
            EntryType::File
        } else if file_type.is_dir() {
            EntryType::Directory
        } else {
            EntryType::Other
        };

        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| {
                StorageError::InvalidPath(format!(
                    "File name {:?} in {:?} is not valid UTF-8",
                    entry.file_name(),
                    dir
                ))
            })?
            .to_string();

        entries.push(Entry {
            name,
            path: entry.into_path(),
            entry_type,
        });
    }

    Ok(entries)
}
