//! End-to-end workspace tests: init, commit, list, rollback

use super::test_utils::{initialized_workspace, write_files};
use std::fs;
use vcsm::error::VcsError;
use vcsm::reconcile::DiscrepancyKind;
use vcsm::types::{EntryKind, HashMode};
use vcsm::workspace::{CommitOutcome, Workspace};

#[test]
fn test_rollback_removes_added_file() {
    for mode in [HashMode::Rolling, HashMode::Merkle] {
        let (temp_dir, ws) = initialized_workspace(mode);
        let root = temp_dir.path();
        write_files(root, &[("a.txt", "hello"), ("b.txt", "world")]);

        let c1 = ws.commit("C1").unwrap();
        assert!(matches!(c1, CommitOutcome::Committed(_)));
        let c1_digest = c1.commit().root_digest().to_string();

        write_files(root, &[("c.txt", "new")]);
        let c2 = ws.commit("C2").unwrap();
        assert_ne!(c2.commit().root_digest(), c1_digest);

        let report = ws.rollback(&c1_digest).unwrap();
        assert_eq!(report.target, c1_digest);
        assert_eq!(report.removed, vec!["c.txt".to_string()]);
        assert!(report.discrepancies.is_empty());

        assert!(!root.join("c.txt").exists());
        assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello");
        assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "world");
        assert_eq!(ws.list_commits().unwrap().len(), 2);
    }
}

#[test]
fn test_rollback_of_identical_tree_is_noop() {
    let (temp_dir, ws) = initialized_workspace(HashMode::Rolling);
    write_files(temp_dir.path(), &[("a.txt", "hello"), ("d/e/f.txt", "deep")]);
    let digest = ws.commit("base").unwrap().commit().root_digest().to_string();

    let report = ws.rollback(&digest).unwrap();
    assert!(report.is_clean());
    assert!(report.removed.is_empty());
    assert!(temp_dir.path().join("d/e/f.txt").exists());
}

#[test]
fn test_rollback_prunes_nested_additions() {
    let (temp_dir, ws) = initialized_workspace(HashMode::Rolling);
    let root = temp_dir.path();
    write_files(root, &[("d/x.txt", "x")]);
    let digest = ws.commit("base").unwrap().commit().root_digest().to_string();

    write_files(root, &[("d/y.txt", "y"), ("extra/z.txt", "z")]);
    let report = ws.rollback(&digest).unwrap();

    assert_eq!(report.removed, vec!["d/y.txt".to_string(), "extra".to_string()]);
    assert!(report.discrepancies.is_empty());
    assert!(root.join("d/x.txt").exists());
    assert!(!root.join("extra").exists());
}

#[test]
fn test_rollback_reports_missing_and_modified() {
    let (temp_dir, ws) = initialized_workspace(HashMode::Merkle);
    let root = temp_dir.path();
    write_files(root, &[("a.txt", "hello"), ("b.txt", "world")]);
    let digest = ws.commit("base").unwrap().commit().root_digest().to_string();

    fs::remove_file(root.join("a.txt")).unwrap();
    fs::write(root.join("b.txt"), "changed").unwrap();

    let report = ws.rollback(&digest).unwrap();
    assert!(report.removed.is_empty());
    assert_eq!(report.discrepancies.len(), 2);

    let missing = &report.discrepancies[0];
    assert_eq!(missing.path, "a.txt");
    assert_eq!(missing.kind, DiscrepancyKind::Missing);
    assert_eq!(missing.expected_kind, EntryKind::File);

    let modified = &report.discrepancies[1];
    assert_eq!(modified.path, "b.txt");
    assert_eq!(modified.kind, DiscrepancyKind::Modified);

    // Nothing is restored.
    assert!(!root.join("a.txt").exists());
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "changed");
}

#[test]
fn test_rollback_keeps_marker_directory() {
    let (temp_dir, ws) = initialized_workspace(HashMode::Rolling);
    write_files(temp_dir.path(), &[("a.txt", "hello")]);
    let digest = ws.commit("base").unwrap().commit().root_digest().to_string();

    write_files(temp_dir.path(), &[("b.txt", "extra")]);
    ws.rollback(&digest).unwrap();

    assert!(ws.is_initialized());
    assert_eq!(ws.list_commits().unwrap().len(), 1);
}

#[test]
fn test_operations_on_uninitialized_root() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let ws = Workspace::open(temp_dir.path()).unwrap();

    assert!(matches!(ws.commit("msg"), Err(VcsError::NotInitialized(_))));
    assert!(matches!(ws.rollback("abcdef"), Err(VcsError::NotInitialized(_))));
}

#[test]
fn test_empty_message_and_unknown_digest() {
    let (_temp_dir, ws) = initialized_workspace(HashMode::Rolling);

    assert!(matches!(ws.commit(""), Err(VcsError::EmptyMessage)));
    assert!(matches!(
        ws.rollback(&"0".repeat(64)),
        Err(VcsError::NotFound(_))
    ));
}

#[test]
fn test_list_commits_oldest_first() {
    let (temp_dir, ws) = initialized_workspace(HashMode::Rolling);
    write_files(temp_dir.path(), &[("a.txt", "1")]);
    ws.commit("first").unwrap();
    write_files(temp_dir.path(), &[("a.txt", "2")]);
    ws.commit("second").unwrap();

    let listed = ws.list_commits().unwrap();
    let messages: Vec<_> = listed.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_kept_across_commit_and_rollback() {
    for mode in [HashMode::Rolling, HashMode::Merkle] {
        let (temp_dir, ws) = initialized_workspace(mode);
        let root = temp_dir.path();
        write_files(root, &[("a.txt", "hello"), ("docs/readme.md", "read me")]);
        std::os::unix::fs::symlink("a.txt", root.join("link")).unwrap();
        std::os::unix::fs::symlink("docs", root.join("docs-link")).unwrap();
        std::os::unix::fs::symlink("nowhere", root.join("broken")).unwrap();

        let digest = ws.commit("with links").unwrap().commit().root_digest().to_string();
        let report = ws.rollback(&digest).unwrap();

        assert!(report.removed.is_empty(), "removed {:?}", report.removed);
        assert!(report.is_clean());
        for name in ["link", "docs-link", "broken"] {
            assert!(fs::symlink_metadata(root.join(name)).is_ok(), "{} deleted", name);
        }
        assert!(root.join("docs/readme.md").exists());
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_unusual_names_survive_identical_rollback() {
    for mode in [HashMode::Rolling, HashMode::Merkle] {
        let (temp_dir, ws) = initialized_workspace(mode);
        let root = temp_dir.path();
        write_files(
            root,
            &[
                ("with space.txt", "1"),
                ("UPPER.txt", "2"),
                ("upper.TXT", "3"),
                ("\u{00fc}ber/na\u{00ef}ve.txt", "4"),
                ("dir.d/x", "5"),
                ("dir/x", "6"),
            ],
        );

        let digest = ws.commit("names").unwrap().commit().root_digest().to_string();
        let report = ws.rollback(&digest).unwrap();

        assert!(report.removed.is_empty(), "removed {:?}", report.removed);
        assert!(report.is_clean());
        assert_eq!(fs::read_to_string(root.join("upper.TXT")).unwrap(), "3");
        assert_eq!(fs::read_to_string(root.join("UPPER.txt")).unwrap(), "2");
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_normalization_variants_are_separate_entries() {
    let (temp_dir, ws) = initialized_workspace(HashMode::Rolling);
    let root = temp_dir.path();
    write_files(root, &[("caf\u{00e9}", "composed"), ("cafe\u{0301}", "decomposed")]);

    let outcome = ws.commit("both spellings").unwrap();
    assert_eq!(outcome.commit().index().len(), 2);

    let report = ws.rollback(outcome.commit().root_digest()).unwrap();
    assert!(report.removed.is_empty(), "removed {:?}", report.removed);
    assert!(root.join("caf\u{00e9}").exists());
    assert!(root.join("cafe\u{0301}").exists());
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_names_refused_by_commit() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (temp_dir, ws) = initialized_workspace(HashMode::Rolling);
    let root = temp_dir.path();
    fs::write(root.join(OsStr::from_bytes(b"x\xff")), "a").unwrap();
    fs::write(root.join(OsStr::from_bytes(b"x\xfe")), "b").unwrap();

    assert!(matches!(
        ws.commit("bad names"),
        Err(VcsError::StorageError(vcsm::error::StorageError::InvalidPath(_)))
    ));
    assert!(root.join(OsStr::from_bytes(b"x\xff")).exists());
    assert!(root.join(OsStr::from_bytes(b"x\xfe")).exists());
}
