//! vcsm: Minimal Local Version Control
//!
//! Snapshots a directory tree into a content-derived digest plus a per-path
//! index, stores named snapshots in a local commit database, and rolls a working
//! tree back against a stored snapshot by deleting entries it did not contain and
//! reporting entries it contains that the tree no longer matches.

pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod store;
pub mod tree;
pub mod types;
pub mod workspace;
