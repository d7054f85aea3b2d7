// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and admin user-management routes.

use super::{forwarded, validate_id};
use crate::error::Result;
use crate::middleware::AuthToken;
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Method,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

/// Routes for the signed-in user's own profile.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/me", get(get_me).put(update_me))
}

/// Routes for the admin console. Callers must pass the admin check.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}/ban", post(ban_user))
        .route("/api/users/{id}/unban", post(unban_user))
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
) -> Result<Response> {
    let answer = state
        .upstream
        .forward(Method::GET, paths::USER_ME, Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}

/// Profile fields are owned by the upstream and passed through untouched.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = payload?;
    let answer = state
        .upstream
        .forward(Method::PUT, paths::USER_ME, Some(token.as_str()), Some(&body))
        .await?;
    Ok(forwarded(answer))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
) -> Result<Response> {
    let answer = state
        .upstream
        .forward(Method::GET, paths::USER_GET_ALL, Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}

async fn ban_user(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = validate_id(&id, "користувач")?;
    tracing::info!(user_id = %id, "Admin banning user");
    let answer = state
        .upstream
        .forward(Method::PUT, &paths::user_ban(id), Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}

async fn unban_user(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = validate_id(&id, "користувач")?;
    tracing::info!(user_id = %id, "Admin unbanning user");
    let answer = state
        .upstream
        .forward(Method::PUT, &paths::user_unban(id), Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}
