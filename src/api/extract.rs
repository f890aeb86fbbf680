//! Token extraction and the authenticated-user extractor

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, StatusCode};
use std::sync::Arc;

use crate::auth::AuthenticatedUser;

use super::server::AppState;

/// Pull the session token out of request headers.
///
/// Checks the Authorization header first (Bearer scheme), then the
/// session cookie.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = headers.get("Cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(rest) = cookie.trim().strip_prefix(cookie_name) {
                    if let Some(token) = rest.strip_prefix('=') {
                        return Some(token.to_string());
                    }
                }
            }
        }
    }

    None
}

/// Extractor resolving the request's token to an authenticated user.
///
/// Missing, invalid and stale tokens all reject with 401; the response
/// does not say which. A store failure is a 500, not a 401.
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers, &state.config.auth.cookie_name)
            .ok_or(StatusCode::UNAUTHORIZED)?;

        match state.sessions.resolve(&token).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(StatusCode::UNAUTHORIZED),
            Err(e) => {
                tracing::error!("session resolution failed: {}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
