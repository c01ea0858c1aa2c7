//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod content_repo;
pub mod project_repo;
pub mod serie_repo;
pub mod tag_repo;

pub use article_repo::ArticleRepo;
pub use content_repo::ContentRepo;
pub use project_repo::ProjectRepo;
pub use serie_repo::SerieRepo;
pub use tag_repo::TagRepo;
