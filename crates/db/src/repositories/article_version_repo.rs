//! Repository for the `article_versions` table.
//!
//! Versions are immutable snapshots created on every content-changing save;
//! there is no update or delete here by design (deletes cascade from the
//! article row).

use sqlx::{PgExecutor, PgPool};

use lorebase_core::types::DbId;

use crate::models::article_version::{ArticleVersion, VersionSnapshot, VersionSummary};

/// Column list for article_versions queries.
const COLUMNS: &str =
    "id, article_id, version, title, body_md, status, change_type, author_id, created_at";

/// Body-less column list for history listings.
const SUMMARY_COLUMNS: &str = "id, version, title, status, change_type, author_id, created_at";

/// Provides read and create operations for article versions.
pub struct ArticleVersionRepo;

impl ArticleVersionRepo {
    /// Insert the next version snapshot for an article.
    ///
    /// Must run on the caller's transaction while the caller holds the
    /// article row lock, so the `MAX(version) + 1` assignment is serialized
    /// per article. The `(article_id, version)` unique constraint is the
    /// backstop if a caller ever skips the lock.
    pub async fn create<'e, E>(
        executor: E,
        article_id: DbId,
        snapshot: &VersionSnapshot<'_>,
        change_type: &str,
        author_id: Option<DbId>,
    ) -> Result<ArticleVersion, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO article_versions
                (article_id, version, title, body_md, status, change_type, author_id)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version), 0) + 1 FROM article_versions WHERE article_id = $1),
                $2, $3, $4, $5, $6
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArticleVersion>(&query)
            .bind(article_id)
            .bind(snapshot.title)
            .bind(snapshot.body_md)
            .bind(snapshot.status)
            .bind(change_type)
            .bind(author_id)
            .fetch_one(executor)
            .await
    }

    /// List version summaries for an article, newest first.
    pub async fn list_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<VersionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM article_versions
             WHERE article_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, VersionSummary>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    /// Find a specific version of an article.
    pub async fn find_by_article_and_version(
        pool: &PgPool,
        article_id: DbId,
        version: i32,
    ) -> Result<Option<ArticleVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM article_versions
             WHERE article_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, ArticleVersion>(&query)
            .bind(article_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// Latest version number for an article (0 if none exist).
    pub async fn latest_version_number(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let row: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version), 0) FROM article_versions WHERE article_id = $1",
        )
        .bind(article_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
