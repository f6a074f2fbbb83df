//! Root canonicalization and index key construction

use crate::error::StorageError;
use crate::types::PathKey;
use std::path::{Path, PathBuf};

/// Canonicalize a managed root directory
///
/// Resolves symlinks, `..` and `.` so every operation on the same tree sees the
/// same absolute path regardless of how the caller spelled it.
pub fn canonicalize_root(path: &Path) -> Result<PathBuf, StorageError> {
    dunce::canonicalize(path).map_err(|e| {
        StorageError::InvalidPath(format!("Failed to canonicalize {:?}: {}", path, e))
    })
}

/// Append an entry name to a parent key. The tree root has the empty key.
///
/// The name is used verbatim: two names that differ on disk never share a key.
pub fn join_key(parent: &str, name: &str) -> PathKey {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

/// Half-open key range `[lower, upper)` holding exactly the keys strictly beneath `key`
///
/// `'0'` is the successor of `'/'`, so every `key/...` sorts inside the range.
pub fn descendant_range(key: &str) -> (PathKey, PathKey) {
    (format!("{}/", key), format!("{}0", key))
}
