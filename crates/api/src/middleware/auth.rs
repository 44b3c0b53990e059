//! Authenticated-author extractor for Axum handlers.
//!
//! Authentication and permission checks live in the upstream gateway, which
//! strips any client-supplied `x-user-id` and installs the verified author id
//! on requests it forwards. This service only needs that id; requests that
//! arrive without it are rejected.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lorebase_core::error::CoreError;
use lorebase_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the gateway-verified author id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated author extracted from the [`USER_ID_HEADER`] header.
///
/// Use this as an extractor parameter in any handler that requires an author:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The author's internal database id.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(format!(
                    "Missing {USER_ID_HEADER} header"
                )))
            })?;

        let user_id: DbId = header.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Invalid {USER_ID_HEADER} header"
            )))
        })?;

        Ok(AuthUser { user_id })
    }
}
