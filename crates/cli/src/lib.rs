//! Batch content loader behind the `misite-load` binary.

pub mod loader;
