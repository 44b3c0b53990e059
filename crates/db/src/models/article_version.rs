//! Article version models.
//!
//! Versions are immutable snapshots of the post-change state of an article's
//! versionable fields; rows are never updated after insert.

use lorebase_core::diff::DiffSegment;
use lorebase_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `article_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleVersion {
    pub id: DbId,
    pub article_id: DbId,
    pub version: i32,
    pub title: String,
    pub body_md: String,
    pub status: String,
    pub change_type: String,
    pub author_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Body-less version row for history listings.
#[derive(Debug, FromRow, Serialize)]
pub struct VersionSummary {
    pub id: DbId,
    pub version: i32,
    pub title: String,
    pub status: String,
    pub change_type: String,
    pub author_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// The versionable fields captured by a snapshot.
#[derive(Debug, Clone)]
pub struct VersionSnapshot<'a> {
    pub title: &'a str,
    pub body_md: &'a str,
    pub status: &'a str,
}

/// Query params for comparing two article versions.
///
/// `from` defaults to the version immediately preceding `to`; `from = 0`
/// compares against the empty pre-creation state.
#[derive(Debug, Deserialize)]
pub struct DiffParams {
    pub to: i32,
    pub from: Option<i32>,
}

/// Response for a version diff.
#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub article_id: DbId,
    pub slug: String,
    pub from: i32,
    pub to: i32,
    pub content: Vec<DiffSegment>,
}
