// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Product review routes.

use super::{forwarded, validate_id};
use crate::error::Result;
use crate::middleware::{AuthToken, OptionalToken};
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Method,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

/// Reviews are readable by anyone. The token is forwarded when present so
/// the upstream can mark the caller's own reactions.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/reviews/{id}", get(by_product))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reviews", post(create_review))
        .route("/api/reviews/{id}", axum::routing::delete(delete_review))
        .route("/api/reviews/{id}/reaction", post(react))
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[validate(length(min = 1, message = "Некоректний ідентифікатор товару"))]
    pub product_id: String,
    #[validate(range(min = 1, max = 5, message = "Оцінка має бути від 1 до 5"))]
    pub rating: u8,
    #[validate(length(max = 2000, message = "Відгук задовгий"))]
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReactionRequest {
    is_like: bool,
}

async fn by_product(
    State(state): State<Arc<AppState>>,
    token: OptionalToken,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = validate_id(&id, "товар")?;
    let answer = state
        .upstream
        .forward(Method::GET, &paths::reviews_by_product(id), token.as_deref(), None)
        .await?;
    Ok(forwarded(answer))
}

async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    payload: std::result::Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    request.validate()?;
    validate_id(&request.product_id, "товар")?;

    let body = serde_json::to_value(&request).map_err(anyhow::Error::from)?;
    let answer = state
        .upstream
        .forward(Method::POST, paths::REVIEW_CREATE, Some(token.as_str()), Some(&body))
        .await?;
    Ok(forwarded(answer))
}

async fn delete_review(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = validate_id(&id, "відгук")?;
    let answer = state
        .upstream
        .forward(Method::DELETE, &paths::review(id), Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}

async fn react(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<ReactionRequest>, JsonRejection>,
) -> Result<Response> {
    let id = validate_id(&id, "відгук")?;
    let Json(request) = payload?;
    let body: Value = serde_json::to_value(&request).map_err(anyhow::Error::from)?;
    let answer = state
        .upstream
        .forward(
            Method::POST,
            &paths::review_reaction(id),
            Some(token.as_str()),
            Some(&body),
        )
        .await?;
    Ok(forwarded(answer))
}
