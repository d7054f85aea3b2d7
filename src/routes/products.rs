// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Product listing and detail routes.

use super::{validate_id, validate_query};
use crate::error::{AppError, Result};
use crate::middleware::OptionalToken;
use crate::models::{Product, ProductPage};
use crate::services::normalize;
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_RANDOM_COUNT: u32 = 8;
const MAX_RANDOM_COUNT: u32 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/products/all", post(get_all))
        .route("/api/products/search", get(search))
        .route("/api/products/random", get(random))
        .route("/api/products/{id}", get(get_product))
}

/// Filtered product listing. The filter body (category, price range, sort,
/// page) is forwarded as-is; the answer always comes back as a
/// [`ProductPage`].
async fn get_all(
    State(state): State<Arc<AppState>>,
    token: OptionalToken,
    body: Bytes,
) -> Result<Json<ProductPage>> {
    let filter = parse_filter(&body)?;

    let (_, raw) = state
        .upstream
        .forward(
            Method::POST,
            paths::PRODUCT_GET_ALL,
            token.as_deref(),
            Some(&filter),
        )
        .await?;

    let page = normalize::normalize_product_page(raw)?;
    tracing::debug!(
        count = page.count,
        returned = page.products.len(),
        "Product listing normalized"
    );
    Ok(Json(page))
}

/// An absent body means "no filter"; anything else must be a JSON object.
fn parse_filter(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(Value::Null) => Ok(json!({})),
        _ => Err(AppError::BadRequest(
            "Фільтр має бути JSON-об'єктом".to_string(),
        )),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let query = validate_query(params.q.as_deref())?;
    let raw: Option<Value> = state
        .upstream
        .get_optional_json(&paths::product_search(query), None)
        .await?;
    Ok(Json(normalize::normalize_product_list(
        raw.unwrap_or(Value::Null),
    )?))
}

#[derive(Deserialize)]
struct RandomQuery {
    count: Option<u32>,
}

async fn random(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomQuery>,
) -> Result<Json<Vec<Product>>> {
    let count = params
        .count
        .unwrap_or(DEFAULT_RANDOM_COUNT)
        .clamp(1, MAX_RANDOM_COUNT);
    let raw: Option<Value> = state
        .upstream
        .get_optional_json(&paths::product_random(count), None)
        .await?;
    Ok(Json(normalize::normalize_product_list(
        raw.unwrap_or(Value::Null),
    )?))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    token: OptionalToken,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = validate_id(&id, "товар")?;
    let not_found = || AppError::NotFound("Товар не знайдено".to_string());

    let raw = match state
        .upstream
        .get_optional_json::<Value>(&paths::product(id), token.as_deref())
        .await
    {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => return Err(not_found()),
        Err(e) => return Err(e.into()),
    };

    raw.map(normalize::normalize_product)
        .transpose()?
        .flatten()
        .map(Json)
        .ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter(b"").unwrap(), json!({}));
        assert_eq!(parse_filter(b"null").unwrap(), json!({}));
        assert_eq!(
            parse_filter(br#"{"categoryId": 3, "page": 2}"#).unwrap(),
            json!({"categoryId": 3, "page": 2})
        );
        assert!(parse_filter(b"[1]").is_err());
        assert!(parse_filter(b"{oops").is_err());
    }
}
