// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Product media routes.

use super::validate_id;
use crate::error::{AppError, Result};
use crate::models::ProductMedia;
use crate::services::normalize;
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_MANY_IDS: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/media/many", get(many))
        .route("/api/media/{product_id}", get(by_product))
}

async fn by_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<ProductMedia>>> {
    let product_id = validate_id(&product_id, "товар")?;
    let raw = match state
        .upstream
        .get_optional_json::<Value>(&paths::media_by_product(product_id), None)
        .await
    {
        Ok(raw) => raw,
        // No media uploaded yet.
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(normalize::normalize_media(raw.unwrap_or(Value::Null))?))
}

#[derive(Deserialize)]
struct ManyQuery {
    /// Comma-separated product ids
    ids: Option<String>,
}

/// Media for several products at once, grouped by product id.
async fn many(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ManyQuery>,
) -> Result<Json<HashMap<String, Vec<ProductMedia>>>> {
    let ids = params
        .ids
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| validate_id(id, "товар").map(str::to_string))
        .collect::<Result<Vec<String>>>()?;

    if ids.is_empty() {
        return Err(AppError::BadRequest("Не вказано товари".to_string()));
    }
    if ids.len() > MAX_MANY_IDS {
        return Err(AppError::BadRequest("Забагато товарів у запиті".to_string()));
    }

    let raw: Option<Value> = state
        .upstream
        .get_optional_json(&paths::media_many(&ids), None)
        .await?;
    let media = normalize::normalize_media(raw.unwrap_or(Value::Null))?;

    let mut grouped: HashMap<String, Vec<ProductMedia>> =
        ids.into_iter().map(|id| (id, Vec::new())).collect();
    for item in media {
        if let Some(list) = item
            .product_id
            .as_ref()
            .and_then(|pid| grouped.get_mut(pid))
        {
            list.push(item);
        }
    }
    Ok(Json(grouped))
}
