pub mod articles;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /articles/...    article CRUD, search, suggest, links, versions, diff
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/articles", articles::router())
}
