//! Shared-password authentication extractor for Axum handlers.
//!
//! The dashboard uses a single shared password rather than per-user
//! accounts. Reads stay public; every mutating handler takes
//! [`DashboardAuth`] as an extractor parameter.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bosswatch_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the request carried the shared dashboard password.
///
/// Use this as an extractor parameter in any handler that mutates state:
///
/// ```ignore
/// async fn my_handler(_auth: DashboardAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DashboardAuth;

impl FromRequestParts<AppState> for DashboardAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <password>".into(),
            ))
        })?;

        if !state.dashboard_token_matches(token) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid dashboard password".into(),
            )));
        }

        Ok(DashboardAuth)
    }
}
