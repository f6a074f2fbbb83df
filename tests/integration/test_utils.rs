//! Shared fixtures for integration tests

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vcsm::config::VcsmConfig;
use vcsm::types::HashMode;
use vcsm::workspace::Workspace;

/// Write `(relative path, contents)` pairs under `root`, creating parent directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

/// An initialized workspace in a fresh temp dir, using `mode` for new commits.
pub fn initialized_workspace(mode: HashMode) -> (TempDir, Workspace) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = VcsmConfig::default();
    config.hashing.mode = mode;
    let ws = Workspace::with_config(temp_dir.path(), config).unwrap();
    ws.init().unwrap();
    (temp_dir, ws)
}
