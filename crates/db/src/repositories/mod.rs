//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_link_repo;
pub mod article_repo;
pub mod article_version_repo;

pub use article_link_repo::ArticleLinkRepo;
pub use article_repo::ArticleRepo;
pub use article_version_repo::ArticleVersionRepo;

/// Whether an error is a unique violation on the named constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
