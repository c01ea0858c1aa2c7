//! Domain logic for the misite content backend.
//!
//! Everything here is free of I/O: pagination and cursors, the search query
//! tokenizer, the join-row flattener, tag ranking, and the vocabulary used by
//! the content loader. Storage and transport crates build on these.

pub mod error;
pub mod flatten;
pub mod freshness;
pub mod ingest;
pub mod pagination;
pub mod ranking;
pub mod search_query;
pub mod types;
