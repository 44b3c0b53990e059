//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the full router via `tower::ServiceExt::oneshot`, so they
//! exercise the same middleware stack (CORS, request ID, timeout, panic
//! recovery) that production uses.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use lorebase_api::config::ServerConfig;
use lorebase_api::middleware::auth::USER_ID_HEADER;
use lorebase_api::routes;
use lorebase_api::state::AppState;

/// Author id attached to authenticated test requests.
pub const TEST_USER_ID: i64 = 1;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Mirrors the router construction in `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Send a request, optionally with a JSON body and an authenticated user.
pub async fn request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
    user_id: Option<i64>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(uid) = user_id {
        builder = builder.header(USER_ID_HEADER, uid.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

/// GET as the test user.
pub async fn get(app: &Router, path: &str) -> Response {
    request(app, Method::GET, path, None, Some(TEST_USER_ID)).await
}

/// POST a JSON body as the test user.
pub async fn post_json(app: &Router, path: &str, json: serde_json::Value) -> Response {
    request(app, Method::POST, path, Some(json), Some(TEST_USER_ID)).await
}

/// PUT a JSON body as the test user.
pub async fn put_json(app: &Router, path: &str, json: serde_json::Value) -> Response {
    request(app, Method::PUT, path, Some(json), Some(TEST_USER_ID)).await
}

/// DELETE as the test user.
pub async fn delete(app: &Router, path: &str) -> Response {
    request(app, Method::DELETE, path, None, Some(TEST_USER_ID)).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
