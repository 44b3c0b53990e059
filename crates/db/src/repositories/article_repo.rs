//! Repository for the `articles` table.
//!
//! Also owns the transactional core of article mutation: slug assignment with
//! collision retry, version snapshots, and the publish-timestamp rule. Link
//! graph maintenance deliberately happens outside these transactions (see
//! `ArticleLinkRepo::sync_links`).

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use lorebase_core::article::{CHANGE_CREATE, CHANGE_REVERT, CHANGE_UPDATE, STATUS_DRAFT};
use lorebase_core::slug;
use lorebase_core::types::DbId;

use crate::models::article::{Article, CreateArticle, TitleSuggestion, UpdateArticle};
use crate::models::article_version::{ArticleVersion, VersionSnapshot};
use crate::repositories::article_version_repo::ArticleVersionRepo;
use crate::repositories::is_unique_violation;

/// Column list for articles queries.
const COLUMNS: &str = "id, title, slug, body_md, status, author_id, folder_id, \
    published_at, created_at, updated_at";

/// Timestamp-token slug attempts before falling back to a UUID suffix.
const MAX_SLUG_ATTEMPTS: u32 = 3;

/// Provides CRUD and the transactional mutation core for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Create a new article and its first version in one transaction.
    ///
    /// The slug is generated from the title; on collision the base slug is
    /// retried with a millisecond-timestamp token, and finally with a UUID
    /// suffix, so the loop is bounded even under pathological title reuse.
    pub async fn create(
        pool: &PgPool,
        input: &CreateArticle,
        author_id: DbId,
    ) -> Result<Article, sqlx::Error> {
        let base = slug::slugify(&input.title);
        let body = input.body_md.as_deref().unwrap_or_default();
        let status = input.status.as_deref().unwrap_or(STATUS_DRAFT);

        let mut last_err = None;
        for attempt in 0..=MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 0 {
                base.clone()
            } else if attempt < MAX_SLUG_ATTEMPTS {
                slug::disambiguate(&base, Utc::now().timestamp_millis())
            } else {
                format!("{base}-{}", Uuid::new_v4().simple())
            };

            match Self::insert(pool, input, &candidate, body, status, author_id).await {
                Ok(article) => {
                    if attempt > 0 {
                        tracing::info!(slug = %article.slug, attempt, "Slug collision resolved");
                    }
                    return Ok(article);
                }
                Err(err) if is_unique_violation(&err, "uq_articles_slug") => last_err = Some(err),
                Err(err) => return Err(err),
            }
        }
        Err(last_err.expect("at least one slug attempt"))
    }

    /// Insert the article row and its version 1 snapshot atomically.
    async fn insert(
        pool: &PgPool,
        input: &CreateArticle,
        slug_text: &str,
        body: &str,
        status: &str,
        author_id: DbId,
    ) -> Result<Article, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO articles (title, slug, body_md, status, author_id, folder_id, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $4 = 'published' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(slug_text)
            .bind(body)
            .bind(status)
            .bind(author_id)
            .bind(input.folder_id)
            .fetch_one(&mut *tx)
            .await?;

        // The snapshot captures the post-change state.
        ArticleVersionRepo::create(
            &mut *tx,
            article.id,
            &VersionSnapshot {
                title: &article.title,
                body_md: &article.body_md,
                status: &article.status,
            },
            CHANGE_CREATE,
            Some(author_id),
        )
        .await?;

        tx.commit().await?;
        Ok(article)
    }

    /// Update an article, snapshotting a new version when any versionable
    /// field (title, body, status) changed. Returns `None` if the slug does
    /// not exist.
    ///
    /// The slug is never regenerated on title edits. `published_at` is set
    /// once on the first draft -> published transition and never cleared.
    pub async fn update(
        pool: &PgPool,
        slug_text: &str,
        input: &UpdateArticle,
        author_id: DbId,
    ) -> Result<Option<Article>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // The row lock serializes the per-article version sequence.
        let locked = format!("SELECT {COLUMNS} FROM articles WHERE slug = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Article>(&locked)
            .bind(slug_text)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let title = input.title.as_deref().unwrap_or(&current.title);
        let body = input.body_md.as_deref().unwrap_or(&current.body_md);
        let status = input.status.as_deref().unwrap_or(&current.status);

        // A save that changes no versionable field writes no version row.
        let changed =
            title != current.title || body != current.body_md || status != current.status;
        if changed {
            ArticleVersionRepo::create(
                &mut *tx,
                current.id,
                &VersionSnapshot {
                    title,
                    body_md: body,
                    status,
                },
                CHANGE_UPDATE,
                Some(author_id),
            )
            .await?;
        }

        let query = format!(
            "UPDATE articles SET
                title = $1,
                body_md = $2,
                status = $3,
                folder_id = COALESCE($4, folder_id),
                published_at = CASE
                    WHEN $3 = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END
             WHERE id = $5
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(title)
            .bind(body)
            .bind(status)
            .bind(input.folder_id)
            .bind(current.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(article))
    }

    /// Copy a stored version's fields back onto the article, appending a new
    /// `revert` version. History is append-only: nothing between the current
    /// and target versions is touched.
    ///
    /// Reverting to content identical to the current state writes no version
    /// row, same as any other no-op save.
    pub async fn revert_to_version(
        pool: &PgPool,
        article_id: DbId,
        target: &ArticleVersion,
        author_id: DbId,
    ) -> Result<Article, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked = format!("SELECT {COLUMNS} FROM articles WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Article>(&locked)
            .bind(article_id)
            .fetch_one(&mut *tx)
            .await?;

        let changed = target.title != current.title
            || target.body_md != current.body_md
            || target.status != current.status;
        if changed {
            ArticleVersionRepo::create(
                &mut *tx,
                article_id,
                &VersionSnapshot {
                    title: &target.title,
                    body_md: &target.body_md,
                    status: &target.status,
                },
                CHANGE_REVERT,
                Some(author_id),
            )
            .await?;
        }

        let query = format!(
            "UPDATE articles SET
                title = $1,
                body_md = $2,
                status = $3,
                published_at = CASE
                    WHEN $3 = 'published' AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END
             WHERE id = $4
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(&target.title)
            .bind(&target.body_md)
            .bind(&target.status)
            .bind(article_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(article)
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an article by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug_text: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE slug = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(slug_text)
            .fetch_optional(pool)
            .await
    }

    /// List articles with an optional status filter, most recently updated
    /// first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY updated_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Substring search across title and body using ILIKE.
    pub async fn search(
        pool: &PgPool,
        query_str: &str,
        limit: i64,
    ) -> Result<Vec<Article>, sqlx::Error> {
        let pattern = format!("%{query_str}%");
        let query = format!(
            "SELECT {COLUMNS} FROM articles
             WHERE title ILIKE $1 OR body_md ILIKE $1
             ORDER BY updated_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Title suggestions for `[[` autocomplete: prefix matches first, then
    /// other substring matches, alphabetical within each group.
    pub async fn suggest_titles(
        pool: &PgPool,
        query_str: &str,
        limit: i64,
    ) -> Result<Vec<TitleSuggestion>, sqlx::Error> {
        sqlx::query_as::<_, TitleSuggestion>(
            "SELECT id, title FROM articles
             WHERE title ILIKE $1
             ORDER BY (title ILIKE $2) DESC, LOWER(title) ASC
             LIMIT $3",
        )
        .bind(format!("%{query_str}%"))
        .bind(format!("{query_str}%"))
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Case-insensitive exact title lookup for a batch of lowercased titles.
    ///
    /// Titles are not unique; rows come back ordered by id so callers that
    /// build a first-wins map bind duplicates to the oldest article.
    pub async fn resolve_titles(
        pool: &PgPool,
        lowered_titles: &[String],
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, title FROM articles
             WHERE LOWER(title) = ANY($1)
             ORDER BY id ASC",
        )
        .bind(lowered_titles)
        .fetch_all(pool)
        .await
    }

    /// Delete an article by slug. Returns `true` if a row was deleted.
    ///
    /// The schema does the graph work: versions and outbound edges cascade,
    /// inbound edges get their target nulled back to orphan.
    pub async fn delete(pool: &PgPool, slug_text: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE slug = $1")
            .bind(slug_text)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
