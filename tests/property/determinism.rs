//! Property-based tests for determinism guarantees

use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;
use vcsm::tree::hasher;
use vcsm::tree::TreeHasher;
use vcsm::types::HashMode;

fn materialize(files: &[(String, Vec<u8>)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(temp_dir.path().join(name), content).unwrap();
    }
    temp_dir
}

/// Test that content hash computation is deterministic
#[test]
fn test_content_hash_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(any::<Vec<u8>>(), any::<Vec<u8>>()), |(content1, content2)| {
            let hash1 = hasher::compute_content_hash(&content1);
            let hash2 = hasher::compute_content_hash(&content2);

            if content1 == content2 {
                assert_eq!(hash1, hash2);
            } else {
                prop_assume!(hash1 != hash2);
            }
            assert_eq!(hash1, hasher::compute_content_hash(&content1));

            Ok(())
        })
        .unwrap();
}

/// Streaming in any chunk size yields the same file digest
#[test]
fn test_chunk_size_does_not_change_digest() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(proptest::collection::vec(any::<u8>(), 0..4096), 1usize..512),
            |(content, chunk_size)| {
                let temp_dir = TempDir::new().unwrap();
                let path = temp_dir.path().join("data.bin");
                fs::write(&path, &content).unwrap();

                let streamed = hasher::hash_file(&path, chunk_size, None).unwrap();
                assert_eq!(streamed, hasher::compute_content_hash(&content));

                Ok(())
            },
        )
        .unwrap();
}

/// Hashing an unchanged tree twice gives the same snapshot in both modes
#[test]
fn test_tree_hash_determinism_property() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 32,
        ..Default::default()
    });

    let files = proptest::collection::btree_map(
        "[a-zA-Z0-9_]{1,12}",
        proptest::collection::vec(any::<u8>(), 0..256),
        1..8,
    );

    runner
        .run(&files, |files| {
            let files: Vec<(String, Vec<u8>)> = files.into_iter().collect();
            let temp_dir = materialize(&files);

            for mode in [HashMode::Rolling, HashMode::Merkle] {
                let hasher = TreeHasher::new(temp_dir.path().to_path_buf()).with_mode(mode);
                let first = hasher.compute().unwrap();
                let second = hasher.compute().unwrap();
                assert_eq!(first, second);
            }

            Ok(())
        })
        .unwrap();
}

/// Identical trees in different locations hash identically
#[test]
fn test_tree_hash_location_independent() {
    let mut runner = proptest::test_runner::TestRunner::new(proptest::test_runner::Config {
        cases: 32,
        ..Default::default()
    });

    let files = proptest::collection::btree_map(
        "[a-z0-9]{1,10}\\.txt",
        proptest::collection::vec(any::<u8>(), 0..128),
        0..6,
    );

    runner
        .run(&files, |files| {
            let files: Vec<(String, Vec<u8>)> = files.into_iter().collect();
            let left = materialize(&files);
            let right = materialize(&files);

            for mode in [HashMode::Rolling, HashMode::Merkle] {
                let a = TreeHasher::new(left.path().to_path_buf()).with_mode(mode).compute().unwrap();
                let b = TreeHasher::new(right.path().to_path_buf()).with_mode(mode).compute().unwrap();
                assert_eq!(a, b);
            }

            Ok(())
        })
        .unwrap();
}
