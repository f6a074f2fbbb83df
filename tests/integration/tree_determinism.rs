//! Integration tests for tree hashing determinism and its locality behavior

use super::test_utils::write_files;
use std::fs;
use tempfile::TempDir;
use vcsm::tree::TreeHasher;
use vcsm::error::StorageError;
use vcsm::types::HashMode;

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_files(
        temp_dir.path(),
        &[
            ("file1.txt", "content1"),
            ("file2.txt", "content2"),
            ("dir1/file3.txt", "content3"),
            ("dir1/nested/file4.txt", "content4"),
        ],
    );
    temp_dir
}

/// Hashing the same tree twice yields identical root and index
#[test]
fn test_same_filesystem_same_snapshot() {
    let temp_dir = fixture();
    for mode in [HashMode::Rolling, HashMode::Merkle] {
        let hasher = TreeHasher::new(temp_dir.path().to_path_buf()).with_mode(mode);
        assert_eq!(hasher.compute().unwrap(), hasher.compute().unwrap());
    }
}

/// File content changes produce different root digests
#[test]
fn test_file_content_change_different_root() {
    let temp_dir = fixture();
    let hasher = TreeHasher::new(temp_dir.path().to_path_buf());
    let root1 = hasher.compute_root().unwrap();

    fs::write(temp_dir.path().join("dir1/nested/file4.txt"), "content4!").unwrap();

    assert_ne!(root1, hasher.compute_root().unwrap());
}

/// File addition produces a different root digest
#[test]
fn test_file_addition_different_root() {
    let temp_dir = fixture();
    let hasher = TreeHasher::new(temp_dir.path().to_path_buf());
    let root1 = hasher.compute_root().unwrap();

    fs::write(temp_dir.path().join("file5.txt"), "content").unwrap();

    assert_ne!(root1, hasher.compute_root().unwrap());
}

/// Renaming a file changes the root even though no bytes changed
#[test]
fn test_rename_different_root() {
    let temp_dir = fixture();
    let hasher = TreeHasher::new(temp_dir.path().to_path_buf());
    let root1 = hasher.compute_root().unwrap();

    fs::rename(
        temp_dir.path().join("file2.txt"),
        temp_dir.path().join("file9.txt"),
    )
    .unwrap();

    assert_ne!(root1, hasher.compute_root().unwrap());
}

/// Rolling mode: renaming an earlier sibling changes a later directory's digest
#[test]
fn test_rolling_earlier_sibling_rename_changes_later_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_files(root, &[("a_first.txt", "x"), ("z_dir/inner.txt", "unchanged")]);

    let hasher = TreeHasher::new(root.to_path_buf());
    let before = hasher.compute().unwrap();

    fs::rename(root.join("a_first.txt"), root.join("b_first.txt")).unwrap();
    let after = hasher.compute().unwrap();

    assert_ne!(before.index["z_dir"].digest, after.index["z_dir"].digest);
    assert_eq!(
        before.index["z_dir/inner.txt"].digest,
        after.index["z_dir/inner.txt"].digest
    );
}

/// Merkle mode: the same rename leaves the later directory's digest alone
#[test]
fn test_merkle_earlier_sibling_rename_keeps_later_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_files(root, &[("a_first.txt", "x"), ("z_dir/inner.txt", "unchanged")]);

    let hasher = TreeHasher::new(root.to_path_buf()).with_mode(HashMode::Merkle);
    let before = hasher.compute().unwrap();

    fs::rename(root.join("a_first.txt"), root.join("b_first.txt")).unwrap();
    let after = hasher.compute().unwrap();

    assert_eq!(before.index["z_dir"].digest, after.index["z_dir"].digest);
    assert_ne!(before.root_digest, after.root_digest);
}

/// Unreadable input surfaces as an I/O error rather than a partial snapshot
#[test]
fn test_missing_root_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let hasher = TreeHasher::new(temp_dir.path().join("does-not-exist"));
    assert!(hasher.compute().is_err());
}

/// A file that cannot be opened mid-walk fails the whole hash with an I/O error
#[cfg(unix)]
#[test]
fn test_unreadable_file_is_io_error() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = fixture();
    let locked = temp_dir.path().join("dir1/nested/file4.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through mode bits; nothing to check then.
    if fs::File::open(&locked).is_err() {
        for mode in [HashMode::Rolling, HashMode::Merkle] {
            let result = TreeHasher::new(temp_dir.path().to_path_buf())
                .with_mode(mode)
                .compute();
            assert!(matches!(result, Err(StorageError::IoError(_))));
        }
    }

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
}
