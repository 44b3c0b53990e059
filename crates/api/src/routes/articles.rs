//! Route definitions for articles, versions, and the wiki-link graph.
//!
//! Registered under `/articles`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

/// Article routes, registered as `/articles`.
///
/// ```text
/// GET    /                          list_articles
/// POST   /                          create_article
/// GET    /search                    search_articles
/// GET    /suggest                   suggest_titles
/// GET    /{slug}                    get_article_by_slug
/// PUT    /{slug}                    update_article
/// DELETE /{slug}                    delete_article
/// GET    /{slug}/links              list_links
/// GET    /{slug}/backlinks          list_backlinks
/// GET    /{slug}/versions           list_versions
/// GET    /{slug}/versions/{version} get_version
/// POST   /{slug}/revert/{version}   revert_to_version
/// GET    /{slug}/diff               diff_versions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(articles::list_articles).post(articles::create_article))
        .route("/search", get(articles::search_articles))
        .route("/suggest", get(articles::suggest_titles))
        .route(
            "/{slug}",
            get(articles::get_article_by_slug)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/{slug}/links", get(articles::list_links))
        .route("/{slug}/backlinks", get(articles::list_backlinks))
        .route("/{slug}/versions", get(articles::list_versions))
        .route("/{slug}/versions/{version}", get(articles::get_version))
        .route("/{slug}/revert/{version}", post(articles::revert_to_version))
        .route("/{slug}/diff", get(articles::diff_versions))
}
