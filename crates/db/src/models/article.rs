//! Article entity and DTO models.

use lorebase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `articles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub body_md: String,
    pub status: String,
    pub author_id: DbId,
    pub folder_id: Option<DbId>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new article.
///
/// `author_id` is not part of the payload; it comes from the authenticated
/// request context. The slug is always generated from the title.
#[derive(Debug, Deserialize)]
pub struct CreateArticle {
    pub title: String,
    /// Defaults to the empty string.
    pub body_md: Option<String>,
    pub folder_id: Option<DbId>,
    /// Defaults to `draft`.
    pub status: Option<String>,
}

/// DTO for updating an existing article. Omitted fields are left unchanged.
/// The slug is never regenerated on title edits, keeping existing URLs stable.
#[derive(Debug, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub body_md: Option<String>,
    pub folder_id: Option<DbId>,
    pub status: Option<String>,
}

/// One entry in a `[[` autocomplete suggestion list.
#[derive(Debug, FromRow, Serialize)]
pub struct TitleSuggestion {
    pub id: DbId,
    pub title: String,
}
