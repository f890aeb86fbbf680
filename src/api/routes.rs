//! API route handlers
//!
//! Handlers translate core outcomes into transport: 401 for anything
//! that means "not authenticated", 403 for insufficient role or
//! self-action guards, 409 for duplicate usernames.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{capabilities_for, require_admin, AuthenticatedUser, Capability, Role};
use crate::auth::models::{LoginRequest, LoginResponse, UserInfo};
use crate::error::Error;

use super::server::AppState;
use super::validation::{validate_password, validate_username};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserInfo,
    pub capabilities: &'static [Capability],
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::InvalidCredentials | Error::TokenInvalid | Error::SessionInvalid => {
            StatusCode::UNAUTHORIZED
        }
        Error::Forbidden | Error::SelfActionDenied => StatusCode::FORBIDDEN,
        Error::DuplicateUsername(_) => StatusCode::CONFLICT,
        Error::UserNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: Error) -> Response {
    let status = error_status(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {}", error);
        // Internal detail stays in the logs
        return (
            status,
            Json(ApiResponse::<()>::err("Internal server error")),
        )
            .into_response();
    }
    (status, Json(ApiResponse::<()>::err(error.to_string()))).into_response()
}

fn bad_request(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::err(message)),
    )
        .into_response()
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth routes

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    match state.sessions.login(&req.username, &req.password).await {
        Ok((user, token)) => {
            let cookie = Cookie::build((state.config.auth.cookie_name.clone(), token.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();

            let body = LoginResponse {
                token,
                user: UserInfo::from(&user),
            };
            (jar.add(cookie), Json(ApiResponse::ok(body))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Revoke the cookie's session and clear the cookie.
///
/// A request without a usable token still clears the cookie and
/// succeeds; a store failure while revoking is reported, not swallowed.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let cookie_name = state.config.auth.cookie_name.clone();

    let result = match jar.get(&cookie_name).map(|c| c.value().to_string()) {
        Some(token) => match state.sessions.session_id(&token) {
            Some(sid) => state.sessions.logout(&sid).await,
            None => Ok(()),
        },
        None => Ok(()),
    };

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/").build());

    match result {
        Ok(()) => (jar, Json(ApiResponse::ok("logged out"))).into_response(),
        Err(e) => {
            tracing::error!("logout failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                jar,
                Json(ApiResponse::<()>::err("Logout failed")),
            )
                .into_response()
        }
    }
}

pub async fn me(user: AuthenticatedUser) -> impl IntoResponse {
    let capabilities = capabilities_for(Some(&user));
    Json(ApiResponse::ok(MeResponse {
        user: UserInfo::from(&user),
        capabilities,
    }))
}

// User administration

pub async fn list_users(State(state): State<Arc<AppState>>, user: AuthenticatedUser) -> Response {
    if let Err(e) = require_admin(Some(&user)) {
        return error_response(e);
    }

    match state.sessions.list_users().await {
        Ok(users) => {
            let users: Vec<UserInfo> = users.iter().map(UserInfo::from).collect();
            Json(ApiResponse::ok(users)).into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if let Err(e) = require_admin(Some(&user)) {
        return error_response(e);
    }
    if let Err(message) = validate_username(&req.username) {
        return bad_request(message);
    }
    if let Err(message) = validate_password(&req.password) {
        return bad_request(message);
    }

    match state
        .sessions
        .create_user(&req.username, &req.password, req.role)
        .await
    {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::ok(UserInfo::from(&created))),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Response {
    if let Err(e) = require_admin(Some(&user)) {
        return error_response(e);
    }

    match state.sessions.update_role(&user, &id, req.role).await {
        Ok(updated) => Json(ApiResponse::ok(UserInfo::from(&updated))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn set_active(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<SetActiveRequest>,
) -> Response {
    if let Err(e) = require_admin(Some(&user)) {
        return error_response(e);
    }

    match state.sessions.set_active(&user, &id, req.active).await {
        Ok(updated) => Json(ApiResponse::ok(UserInfo::from(&updated))).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Response {
    if let Err(e) = require_admin(Some(&user)) {
        return error_response(e);
    }

    match state.sessions.delete_user(&user, &id).await {
        Ok(()) => Json(ApiResponse::ok("deleted")).into_response(),
        Err(e) => error_response(e),
    }
}
