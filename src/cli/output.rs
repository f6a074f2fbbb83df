//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::VcsError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &VcsError) -> String {
    match e {
        VcsError::NotInitialized(_) => "vcsm is not initialized here! Run `vcsm init`.".to_string(),
        VcsError::AlreadyInitialized(_) => {
            "The vcsm root has already been initialized here".to_string()
        }
        VcsError::NotFound(digest) => format!("No such hash: {}", digest),
        other => other.to_string(),
    }
}
