// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.
//!
//! Every handler is a stateless forward to the upstream API. Inputs are
//! checked before any upstream call; upstream failures are reshaped by
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod categories;
pub mod favorites;
pub mod media;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use crate::error::{AppError, Result};
use crate::middleware::auth::{require_admin, require_auth};
use crate::AppState;
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_ID_LEN: usize = 64;
const MAX_QUERY_LEN: usize = 100;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Reject ids that cannot be upstream identifiers before spending a call.
pub(crate) fn validate_id<'a>(raw: &'a str, what: &str) -> Result<&'a str> {
    let id = raw.trim();
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id)
    } else {
        Err(AppError::BadRequest(format!("Некоректний ідентифікатор: {}", what)))
    }
}

/// Validate a free-text search query.
pub(crate) fn validate_query(raw: Option<&str>) -> Result<&str> {
    let query = raw.map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::BadRequest("Введіть пошуковий запит".to_string()));
    }
    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest("Пошуковий запит задовгий".to_string()));
    }
    Ok(query)
}

/// Turn a pass-through upstream answer into a response with the same status.
pub(crate) fn forwarded((status, body): (StatusCode, Value)) -> Response {
    if status == StatusCode::NO_CONTENT {
        return StatusCode::NO_CONTENT.into_response();
    }
    (status, Json(body)).into_response()
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(categories::routes())
        .merge(products::routes())
        .merge(media::routes())
        .merge(reviews::public_routes())
        .merge(auth::public_routes())
        .merge(orders::public_routes());

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(reviews::protected_routes())
        .merge(users::routes())
        .merge(favorites::routes())
        .merge(notifications::routes())
        .merge(orders::protected_routes())
        .route_layer(middleware::from_fn(require_auth));

    // Admin routes: bearer token plus upstream admin confirmation
    let admin_routes = users::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn(require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id(" 42 ", "товар").unwrap(), "42");
        assert!(validate_id("3fa85f64-5717-4562-b3fc-2c963f66afa6", "товар").is_ok());
        assert!(validate_id("", "товар").is_err());
        assert!(validate_id("../etc", "товар").is_err());
        assert!(validate_id(&"a".repeat(65), "товар").is_err());
    }

    #[test]
    fn test_validate_query() {
        assert_eq!(validate_query(Some("  чайник ")).unwrap(), "чайник");
        assert!(validate_query(None).is_err());
        assert!(validate_query(Some("   ")).is_err());
        assert!(validate_query(Some(&"я".repeat(101))).is_err());
    }
}
