// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorite collection routes.

use super::{forwarded, validate_id};
use crate::error::{AppError, Result};
use crate::middleware::AuthToken;
use crate::models::FavoriteList;
use crate::services::normalize::{parse_wrapped_list, LISTS_KEY};
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::Method,
    response::Response,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/favorites/lists", get(my_lists).post(create_list))
        .route("/api/favorites/lists/{list_id}", delete(delete_list))
        .route("/api/favorites/lists/{list_id}/products", post(add_product))
        .route(
            "/api/favorites/lists/{list_id}/products/{product_id}",
            delete(remove_product),
        )
        .route("/api/favorites/default", post(add_to_default))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRef {
    product_id: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    #[validate(length(min = 1, max = 50, message = "Назва списку має містити від 1 до 50 символів"))]
    pub name: String,
}

/// Lists are decoded into [`FavoriteList`] so malformed entries are
/// rejected here rather than in every consumer.
async fn my_lists(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Vec<FavoriteList>>> {
    let raw: Option<Value> = state
        .upstream
        .get_optional_json(paths::FAVORITE_MY_LISTS, Some(token.as_str()))
        .await?;
    let lists = parse_wrapped_list(raw, LISTS_KEY, "favorite lists")?;
    Ok(Json(lists))
}

async fn create_list(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    payload: std::result::Result<Json<CreateListRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(mut request) = payload?;
    request.name = request.name.trim().to_string();
    request.validate()?;

    let body = json!({ "name": request.name });
    let answer = state
        .upstream
        .forward(Method::POST, paths::FAVORITE_CREATE, Some(token.as_str()), Some(&body))
        .await?;
    Ok(forwarded(answer))
}

async fn delete_list(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(list_id): Path<String>,
) -> Result<Response> {
    let list_id = validate_id(&list_id, "список")?;
    let answer = state
        .upstream
        .forward(Method::DELETE, &paths::favorite_list(list_id), Some(token.as_str()), None)
        .await?;
    Ok(forwarded(answer))
}

fn product_body(payload: std::result::Result<Json<ProductRef>, JsonRejection>) -> Result<Value> {
    let Json(product) = payload?;
    let product_id = validate_id(&product.product_id, "товар").map_err(|_| {
        AppError::BadRequest("Некоректний ідентифікатор товару".to_string())
    })?;
    Ok(json!({ "productId": product_id }))
}

async fn add_product(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path(list_id): Path<String>,
    payload: std::result::Result<Json<ProductRef>, JsonRejection>,
) -> Result<Response> {
    let list_id = validate_id(&list_id, "список")?;
    let body = product_body(payload)?;
    let answer = state
        .upstream
        .forward(
            Method::POST,
            &paths::favorite_add_product(list_id),
            Some(token.as_str()),
            Some(&body),
        )
        .await?;
    Ok(forwarded(answer))
}

async fn remove_product(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    Path((list_id, product_id)): Path<(String, String)>,
) -> Result<Response> {
    let list_id = validate_id(&list_id, "список")?;
    let product_id = validate_id(&product_id, "товар")?;
    let answer = state
        .upstream
        .forward(
            Method::DELETE,
            &paths::favorite_remove_product(list_id, product_id),
            Some(token.as_str()),
            None,
        )
        .await?;
    Ok(forwarded(answer))
}

async fn add_to_default(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    payload: std::result::Result<Json<ProductRef>, JsonRejection>,
) -> Result<Response> {
    let body = product_body(payload)?;
    let answer = state
        .upstream
        .forward(
            Method::POST,
            paths::FAVORITE_ADD_TO_DEFAULT,
            Some(token.as_str()),
            Some(&body),
        )
        .await?;
    Ok(forwarded(answer))
}
