// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification drawer routes.

use super::{forwarded, validate_id};
use crate::error::Result;
use crate::middleware::AuthToken;
use crate::models::{parse_unseen_count, NotificationItem, NotificationTab};
use crate::services::normalize::{parse_wrapped_list, ITEMS_KEY};
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::Method,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/notifications", get(list))
        .route("/api/notifications/unseen-count", get(unseen_count))
        .route("/api/notifications/read-all", post(mark_all_as_read))
        .route("/api/notifications/{id}/read", post(mark_as_read))
}

#[derive(Debug, Deserialize)]
struct TabQuery {
    #[serde(default)]
    tab: NotificationTab,
}

async fn list(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Query(query): Query<TabQuery>,
) -> Result<Json<Vec<NotificationItem>>> {
    let raw: Option<Value> = state
        .upstream
        .get_optional_json(&paths::notifications(query.tab), Some(token.as_str()))
        .await?;
    let items = parse_wrapped_list(raw, ITEMS_KEY, "notifications")?;
    Ok(Json(items))
}

async fn unseen_count(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>> {
    let raw: Option<Value> = state
        .upstream
        .get_optional_json(paths::NOTIFICATION_UNSEEN_COUNT, Some(token.as_str()))
        .await?;
    let count = raw.as_ref().map(parse_unseen_count).unwrap_or(0);
    Ok(Json(json!({ "count": count })))
}

async fn mark_as_read(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = validate_id(&id, "сповіщення")?;
    let answer = state
        .upstream
        .forward(
            Method::POST,
            &paths::notification_mark_read(id),
            Some(token.as_str()),
            None,
        )
        .await?;
    Ok(forwarded(answer))
}

async fn mark_all_as_read(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
) -> Result<Response> {
    let answer = state
        .upstream
        .forward(Method::POST, paths::NOTIFICATION_MARK_ALL, Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}
