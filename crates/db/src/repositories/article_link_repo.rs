//! Repository for the `article_links` table: wiki-link graph synchronization
//! and orphan resolution.
//!
//! Edge reconciliation is planned in pure code (`lorebase_core::link_graph`)
//! and applied as one transaction per source article, so a partial failure
//! never leaves a half-updated edge set. Callers run these methods after the
//! article/version transaction commits; a failure here is logged by the
//! caller and never unwinds a committed save.

use std::collections::HashMap;

use sqlx::PgPool;

use lorebase_core::link_graph::{plan_sync, DesiredLink, LinkSyncPlan, StoredLink};
use lorebase_core::types::DbId;
use lorebase_core::wikilink;

use crate::models::article_link::{ArticleLink, Backlink};
use crate::repositories::article_repo::ArticleRepo;

/// Column list for article_links queries.
const COLUMNS: &str = "id, source_article_id, target_article_id, target_title, \
    position, created_at, updated_at";

/// Provides graph synchronization and read operations for wiki-link edges.
pub struct ArticleLinkRepo;

impl ArticleLinkRepo {
    /// List outbound edges for a source article in body order.
    pub async fn list_by_source(
        pool: &PgPool,
        source_article_id: DbId,
    ) -> Result<Vec<ArticleLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM article_links
             WHERE source_article_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, ArticleLink>(&query)
            .bind(source_article_id)
            .fetch_all(pool)
            .await
    }

    /// List articles whose bodies link to the given article.
    pub async fn list_backlinks(
        pool: &PgPool,
        target_article_id: DbId,
    ) -> Result<Vec<Backlink>, sqlx::Error> {
        sqlx::query_as::<_, Backlink>(
            "SELECT a.id AS article_id, a.title, a.slug
             FROM article_links l
             JOIN articles a ON a.id = l.source_article_id
             WHERE l.target_article_id = $1
             ORDER BY LOWER(a.title) ASC",
        )
        .bind(target_article_id)
        .fetch_all(pool)
        .await
    }

    /// Reconcile the stored edge set for a source article against its body.
    ///
    /// Idempotent: re-running with an unchanged body is a no-op. After this
    /// returns, the edge set equals the case-insensitively deduplicated,
    /// order-preserved `[[...]]` references in `body` — resolved where the
    /// title matches an existing article, orphaned where it does not.
    pub async fn sync_links(
        pool: &PgPool,
        source_article_id: DbId,
        body: &str,
    ) -> Result<(), sqlx::Error> {
        let refs = wikilink::extract_links(body);
        let titles = wikilink::dedupe_titles(&refs);

        // One round trip resolves every referenced title; first-wins keeps
        // duplicate titles bound to the oldest article.
        let lowered: Vec<String> = titles.iter().map(|t| t.to_lowercase()).collect();
        let mut by_title: HashMap<String, DbId> = HashMap::new();
        for (id, title) in ArticleRepo::resolve_titles(pool, &lowered).await? {
            by_title.entry(title.to_lowercase()).or_insert(id);
        }

        let desired: Vec<DesiredLink> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| DesiredLink {
                target_title: (*title).to_string(),
                target_article_id: by_title.get(&title.to_lowercase()).copied(),
                position: i as i32,
            })
            .collect();

        let rows: Vec<(DbId, String, Option<DbId>)> = sqlx::query_as(
            "SELECT id, target_title, target_article_id FROM article_links
             WHERE source_article_id = $1
             ORDER BY position ASC",
        )
        .bind(source_article_id)
        .fetch_all(pool)
        .await?;
        let current: Vec<StoredLink> = rows
            .into_iter()
            .map(|(id, target_title, target_article_id)| StoredLink {
                id,
                target_title,
                target_article_id,
            })
            .collect();

        let plan = plan_sync(&current, &desired);
        if plan.is_noop() {
            return Ok(());
        }
        Self::apply_plan(pool, source_article_id, &plan).await
    }

    /// Apply a reconciliation plan as a single transaction.
    async fn apply_plan(
        pool: &PgPool,
        source_article_id: DbId,
        plan: &LinkSyncPlan,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !plan.delete.is_empty() {
            sqlx::query("DELETE FROM article_links WHERE id = ANY($1)")
                .bind(&plan.delete)
                .execute(&mut *tx)
                .await?;
        }

        for &(id, target) in &plan.rebind {
            sqlx::query("UPDATE article_links SET target_article_id = $2 WHERE id = $1")
                .bind(id)
                .bind(target)
                .execute(&mut *tx)
                .await?;
        }

        for link in &plan.insert {
            sqlx::query(
                "INSERT INTO article_links
                    (source_article_id, target_article_id, target_title, position)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(source_article_id)
            .bind(link.target_article_id)
            .bind(&link.target_title)
            .bind(link.position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            source_article_id,
            inserted = plan.insert.len(),
            deleted = plan.delete.len(),
            rebound = plan.rebind.len(),
            "Link graph synchronized"
        );
        Ok(())
    }

    /// Bind every orphan edge whose target title matches a newly created
    /// article. Returns the number of edges bound.
    ///
    /// `target_title` is left verbatim so the original reference text
    /// survives resolution. Matching is a global case-insensitive title
    /// comparison with no folder/author scoping: when titles collide over
    /// time an orphan can bind to an unintended article. Known limitation.
    pub async fn resolve_orphans(
        pool: &PgPool,
        article_id: DbId,
        title: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE article_links SET target_article_id = $1
             WHERE target_article_id IS NULL AND LOWER(target_title) = LOWER($2)",
        )
        .bind(article_id)
        .bind(title)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
