//! Merge policy and the service applying it.

pub mod merge_policy;
pub mod service;
