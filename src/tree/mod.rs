//! Tree hashing
//!
//! Turns a directory into a deterministic root digest plus a flat index of
//! per-path digests.

pub mod hasher;
pub mod path;
pub mod walker;

pub use hasher::{Snapshot, TreeHasher};
