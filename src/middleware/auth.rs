// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token extraction and admin gating.
//!
//! The storefront never inspects tokens itself: they are opaque strings
//! minted by the upstream API and forwarded with each proxied call.

use crate::error::AppError;
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;

/// Cookie the storefront sets alongside its `auth_token` local storage key.
pub const AUTH_COOKIE: &str = "auth_token";

/// Token of the signed-in user, inserted by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthToken(pub String);

impl AuthToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Token if the caller sent one. For public routes whose upstream answers
/// differ for signed-in users.
#[derive(Debug, Clone, Default)]
pub struct OptionalToken(pub Option<String>);

impl OptionalToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for OptionalToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalToken(bearer_token(&parts.headers)))
    }
}

/// Token from the `Authorization: Bearer` header, else the auth cookie.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(AUTH_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Middleware that requires a bearer token.
pub async fn require_auth(mut request: Request, next: Next) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthorized)?;
    request.extensions_mut().insert(AuthToken(token));
    Ok(next.run(request).await)
}

/// Middleware that requires the upstream to confirm the caller is an admin.
///
/// Must run after [`require_auth`].
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .extensions()
        .get::<AuthToken>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let answer: Value = state
        .upstream
        .get_json(paths::AUTH_CHECK_ADMIN, Some(token.as_str()))
        .await
        .map_err(|e| {
            if e.is_unauthorized() {
                AppError::Unauthorized
            } else if e.status() == Some(403) {
                AppError::Forbidden
            } else {
                AppError::Upstream(e)
            }
        })?;

    if !is_admin_answer(&answer) {
        tracing::warn!("Blocked admin request from non-admin user");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

/// `check-admin` answers either a bare boolean or `{"isAdmin": bool}`.
pub fn is_admin_answer(answer: &Value) -> bool {
    match answer {
        Value::Bool(b) => *b,
        Value::Object(obj) => obj
            .get("isAdmin")
            .or_else(|| obj.get("admin"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        _ => false,
    }
}

/// Find the session token in an upstream auth answer.
pub fn extract_token(answer: &Value) -> Option<String> {
    match answer {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => ["token", "accessToken", "jwt"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=from-cookie"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("from-cookie"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_rejects_non_bearer_and_blank() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert!(bearer_token(&headers).is_none());
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token(&json!({"token": "abc"})).as_deref(), Some("abc"));
        assert_eq!(extract_token(&json!({"accessToken": "xyz", "user": {}})).as_deref(), Some("xyz"));
        assert_eq!(extract_token(&json!("raw-token")).as_deref(), Some("raw-token"));
        assert!(extract_token(&json!({"token": ""})).is_none());
        assert!(extract_token(&json!({"message": "ok"})).is_none());
    }

    #[test]
    fn test_admin_answer_shapes() {
        assert!(is_admin_answer(&json!(true)));
        assert!(is_admin_answer(&json!({"isAdmin": true})));
        assert!(!is_admin_answer(&json!({"isAdmin": false})));
        assert!(!is_admin_answer(&json!("yes")));
    }
}
