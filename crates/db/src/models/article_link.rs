//! Wiki-link edge models.

use lorebase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `article_links` table.
///
/// `target_article_id` is `None` while the edge is orphaned; `target_title`
/// keeps the referenced text verbatim even after resolution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleLink {
    pub id: DbId,
    pub source_article_id: DbId,
    pub target_article_id: Option<DbId>,
    pub target_title: String,
    pub position: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An inbound reference, joined with the referring article for display.
#[derive(Debug, FromRow, Serialize)]
pub struct Backlink {
    pub article_id: DbId,
    pub title: String,
    pub slug: String,
}
