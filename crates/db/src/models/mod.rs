//! Model structs and DTOs.
//!
//! Read-side modules pair a flat `FromRow` join row (child columns as
//! `Option`) with the nested `Serialize` entity it flattens into. The
//! `content` module holds the write records consumed by the loader.

pub mod article;
pub mod content;
pub mod project;
pub mod serie;
pub mod tag;
