//! Handlers for article CRUD, version history, diff, revert, and the
//! wiki-link graph read endpoints.
//!
//! These handlers are the article mutation coordinator: validation first,
//! then the transactional core (article row + version snapshot, owned by
//! `ArticleRepo`), then post-commit link-graph maintenance. Graph failures
//! never unwind a committed save — losing a user's edit is worse than a
//! stale graph, which the next save repairs. Keep it that way.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use lorebase_core::article::{validate_body, validate_status, validate_title};
use lorebase_core::diff::diff_texts;
use lorebase_core::error::CoreError;
use lorebase_core::search::{
    clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, DEFAULT_SUGGEST_LIMIT, MAX_LIST_LIMIT,
    MAX_SUGGEST_LIMIT, MIN_SUGGEST_QUERY_LEN,
};
use lorebase_core::types::DbId;
use lorebase_db::models::article::{Article, CreateArticle, TitleSuggestion, UpdateArticle};
use lorebase_db::models::article_version::{DiffParams, DiffResponse};
use lorebase_db::repositories::{ArticleLinkRepo, ArticleRepo, ArticleVersionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

#[derive(Debug, serde::Deserialize)]
pub struct ListArticlesParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch an article by slug or return 404.
async fn ensure_article_by_slug(pool: &sqlx::PgPool, slug: &str) -> AppResult<Article> {
    ArticleRepo::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Article", slug)))
}

/// Post-commit link-graph maintenance for a saved body.
///
/// Failures are logged, never surfaced: the save is already committed and
/// the graph converges on the next successful sync.
async fn sync_graph_after_save(pool: &sqlx::PgPool, article_id: DbId, body: &str) {
    if let Err(err) = ArticleLinkRepo::sync_links(pool, article_id, body).await {
        tracing::error!(
            article_id,
            error = %err,
            "Link graph sync failed; graph is stale until the next save"
        );
    }
}

/// Validate the optional fields shared by create and update payloads.
fn validate_optional_fields(
    body_md: Option<&str>,
    status: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(body) = body_md {
        validate_body(body)?;
    }
    if let Some(status) = status {
        validate_status(status)?;
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Article CRUD
-------------------------------------------------------------------------- */

/// GET /articles
///
/// List articles with optional status filtering, most recently updated first.
pub async fn list_articles(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListArticlesParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        validate_status(status).map_err(AppError::Core)?;
    }

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let articles = ArticleRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// POST /articles
///
/// Create a new article: slug generation, version 1, then link-graph sync
/// and orphan resolution against the new title.
pub async fn create_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateArticle>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title).map_err(AppError::Core)?;
    validate_optional_fields(input.body_md.as_deref(), input.status.as_deref())
        .map_err(AppError::Core)?;

    let article = ArticleRepo::create(&state.pool, &input, auth.user_id).await?;

    sync_graph_after_save(&state.pool, article.id, &article.body_md).await;

    // Bind any pre-existing orphan references to the new title. Runs on every
    // create; a false-positive bind on a reused title is accepted behavior.
    match ArticleLinkRepo::resolve_orphans(&state.pool, article.id, &article.title).await {
        Ok(0) => {}
        Ok(bound) => {
            tracing::info!(article_id = article.id, bound, "Orphan links resolved");
        }
        Err(err) => {
            tracing::error!(
                article_id = article.id,
                error = %err,
                "Orphan resolution failed; affected links stay orphaned"
            );
        }
    }

    tracing::info!(
        user_id = auth.user_id,
        article_id = article.id,
        slug = %article.slug,
        "Article created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: article })))
}

/// GET /articles/{slug}
///
/// Fetch a single article by its slug.
pub async fn get_article_by_slug(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;
    Ok(Json(DataResponse { data: article }))
}

/// PUT /articles/{slug}
///
/// Partial update. Creates a new version when title/body/status changed;
/// re-syncs the link graph when the body was part of the payload.
pub async fn update_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<UpdateArticle>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        validate_title(title).map_err(AppError::Core)?;
    }
    validate_optional_fields(input.body_md.as_deref(), input.status.as_deref())
        .map_err(AppError::Core)?;

    let article = ArticleRepo::update(&state.pool, &slug, &input, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Article", &slug)))?;

    if input.body_md.is_some() {
        sync_graph_after_save(&state.pool, article.id, &article.body_md).await;
    }

    tracing::info!(
        user_id = auth.user_id,
        article_id = article.id,
        slug = %slug,
        "Article updated"
    );

    Ok(Json(DataResponse { data: article }))
}

/// DELETE /articles/{slug}
///
/// Delete an article. Versions and outbound edges cascade; inbound edges are
/// re-orphaned by the schema, preserving the referrers' link text.
pub async fn delete_article(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;

    ArticleRepo::delete(&state.pool, &slug).await?;

    tracing::info!(
        user_id = auth.user_id,
        article_id = article.id,
        slug = %slug,
        "Article deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Search & suggest
-------------------------------------------------------------------------- */

/// GET /articles/search?q=query&limit=N
///
/// Substring search across title and body.
pub async fn search_articles(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Ok(Json(DataResponse {
            data: Vec::<Article>::new(),
        }));
    }

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let articles = ArticleRepo::search(&state.pool, &q, limit).await?;
    Ok(Json(DataResponse { data: articles }))
}

/// GET /articles/suggest?q=partial&limit=N
///
/// Title suggestions for editor-side `[[` autocomplete. Backed by the same
/// case-insensitive title index the link resolver uses.
pub async fn suggest_titles(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.q.unwrap_or_default();
    let suggestions = if q.trim().len() < MIN_SUGGEST_QUERY_LEN {
        Vec::<TitleSuggestion>::new()
    } else {
        let limit = clamp_limit(params.limit, DEFAULT_SUGGEST_LIMIT, MAX_SUGGEST_LIMIT);
        ArticleRepo::suggest_titles(&state.pool, q.trim(), limit).await?
    };
    Ok(Json(DataResponse { data: suggestions }))
}

/* --------------------------------------------------------------------------
Link graph reads
-------------------------------------------------------------------------- */

/// GET /articles/{slug}/links
///
/// Outbound wiki-link edges in body order, orphans included.
pub async fn list_links(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;
    let links = ArticleLinkRepo::list_by_source(&state.pool, article.id).await?;
    Ok(Json(DataResponse { data: links }))
}

/// GET /articles/{slug}/backlinks
///
/// Articles whose bodies link to this one.
pub async fn list_backlinks(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;
    let backlinks = ArticleLinkRepo::list_backlinks(&state.pool, article.id).await?;
    Ok(Json(DataResponse { data: backlinks }))
}

/* --------------------------------------------------------------------------
Versions
-------------------------------------------------------------------------- */

/// GET /articles/{slug}/versions
///
/// Version history, newest first.
pub async fn list_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;
    let versions = ArticleVersionRepo::list_by_article(&state.pool, article.id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// GET /articles/{slug}/versions/{version}
///
/// Fetch a specific version snapshot.
pub async fn get_version(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, i32)>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;
    let ver = ArticleVersionRepo::find_by_article_and_version(&state.pool, article.id, version)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Version", version)))?;
    Ok(Json(DataResponse { data: ver }))
}

/// POST /articles/{slug}/revert/{version}
///
/// Revert an article to a previous version. The revert is itself a new
/// version; intervening history stays untouched.
pub async fn revert_to_version(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((slug, version)): Path<(String, i32)>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;
    let target = ArticleVersionRepo::find_by_article_and_version(&state.pool, article.id, version)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Version", version)))?;

    let updated =
        ArticleRepo::revert_to_version(&state.pool, article.id, &target, auth.user_id).await?;

    // The body may have changed; bring the graph back in line with it.
    sync_graph_after_save(&state.pool, updated.id, &updated.body_md).await;

    tracing::info!(
        user_id = auth.user_id,
        article_id = article.id,
        reverted_to = version,
        "Article reverted"
    );

    Ok(Json(DataResponse { data: updated }))
}

/* --------------------------------------------------------------------------
Diff
-------------------------------------------------------------------------- */

/// GET /articles/{slug}/diff?to=Y&from=X
///
/// Token-level diff between two version bodies. `from` defaults to the
/// version immediately preceding `to`; `from=0` compares against the empty
/// pre-creation state, so version 1 diffs as one added segment.
pub async fn diff_versions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<DiffParams>,
) -> AppResult<impl IntoResponse> {
    let article = ensure_article_by_slug(&state.pool, &slug).await?;

    let to = ArticleVersionRepo::find_by_article_and_version(&state.pool, article.id, params.to)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Version", params.to)))?;

    let from = params.from.unwrap_or(to.version - 1);
    if from < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "'from' must not be negative".into(),
        )));
    }

    let old_body = if from == 0 {
        String::new()
    } else {
        ArticleVersionRepo::find_by_article_and_version(&state.pool, article.id, from)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::not_found("Version", from)))?
            .body_md
    };

    let response = DiffResponse {
        article_id: article.id,
        slug: article.slug,
        from,
        to: to.version,
        content: diff_texts(&old_body, &to.body_md),
    };

    Ok(Json(DataResponse { data: response }))
}
