// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Category browsing routes.

use super::{validate_id, validate_query};
use crate::error::{AppError, Result};
use crate::models::Category;
use crate::services::normalize;
use crate::services::upstream::paths;
use crate::services::resolve_chain;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/categories/full-tree", get(full_tree))
        .route("/api/categories/search", get(search))
        .route("/api/categories/{id}", get(get_category))
        .route("/api/categories/{id}/children", get(children))
        .route("/api/categories/{id}/breadcrumbs", get(breadcrumbs))
}

/// Full category tree, served from the in-process cache.
async fn full_tree(State(state): State<Arc<AppState>>) -> Result<Response> {
    let roots = state.categories.full_tree(&state.upstream).await?;

    tracing::debug!(roots = roots.len(), "Serving category tree");

    let cache_control = format!("public, max-age={}", state.config.category_tree_ttl.as_secs());
    let mut response = Json(roots.as_ref().clone()).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<Category>>> {
    let query = validate_query(params.q.as_deref())?;
    let raw: Option<Value> = state
        .upstream
        .get_optional_json(&paths::category_search(query), None)
        .await?;
    Ok(Json(normalize::normalize_categories(
        raw.unwrap_or(Value::Null),
    )?))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Category>> {
    let id = validate_id(&id, "категорія")?;
    state
        .categories
        .category(&state.upstream, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Категорію не знайдено".to_string()))
}

/// Direct children of a category. Entries missing `id` or `name` are dropped.
async fn children(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Category>>> {
    let id = validate_id(&id, "категорія")?;
    let raw = match state
        .upstream
        .get_optional_json::<Value>(&paths::category_children(id), None)
        .await
    {
        Ok(raw) => raw,
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };
    Ok(Json(normalize::normalize_categories(
        raw.unwrap_or(Value::Null),
    )?))
}

/// Ancestor chain for a category page, root first.
async fn breadcrumbs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Category>>> {
    let id = validate_id(&id, "категорія")?;
    let state_ref = state.as_ref();

    let chain = resolve_chain(id, |category_id| async move {
        state_ref
            .categories
            .category(&state_ref.upstream, &category_id)
            .await
    })
    .await?;

    if chain.is_empty() {
        return Err(AppError::NotFound("Категорію не знайдено".to_string()));
    }

    // Breadcrumbs carry no subtrees.
    let chain = chain
        .into_iter()
        .map(|c| Category {
            children: vec![],
            ..c
        })
        .collect();
    Ok(Json(chain))
}
