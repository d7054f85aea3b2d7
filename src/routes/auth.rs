// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication routes.
//!
//! Credentials are checked by the upstream; on success the returned token is
//! echoed in the JSON body (for the `auth_token` local storage key) and set
//! as an HttpOnly cookie so server-rendered pages can forward it.

use crate::error::{AppError, Result};
use crate::middleware::auth::{extract_token, is_admin_answer, AuthToken, AUTH_COOKIE};
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use validator::Validate;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/google-login", post(google_login))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/check-admin", get(check_admin))
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Некоректна електронна пошта"))]
    pub email: String,
    #[validate(length(min = 1, message = "Введіть пароль"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Некоректна електронна пошта"))]
    pub email: String,
    #[validate(length(min = 8, message = "Пароль має містити щонайменше 8 символів"))]
    pub password: String,
    #[validate(length(min = 2, max = 60, message = "Вкажіть ім'я"))]
    pub full_name: String,
    /// Phone and any other profile fields, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleLoginRequest {
    /// ID token returned by Google Identity Services
    credential: String,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"))
        .build()
}

/// Expired session cookie. Sent on every logout, whether or not the
/// request carried the cookie.
fn removal_cookie(state: &AppState) -> Cookie<'static> {
    let mut cookie = session_cookie(state, String::new());
    cookie.make_removal();
    cookie
}

/// Forward an auth request and start a session from the answer.
async fn authenticate(
    state: &AppState,
    jar: CookieJar,
    path: &str,
    body: &Value,
) -> Result<(CookieJar, Response)> {
    let (status, answer) = state
        .upstream
        .forward(Method::POST, path, None, Some(body))
        .await?;

    let Some(token) = extract_token(&answer) else {
        tracing::error!(path, "Upstream auth answer carried no token");
        return Err(AppError::Internal(anyhow::anyhow!(
            "auth answer from {} has no token",
            path
        )));
    };

    let jar = jar.add(session_cookie(state, token));
    Ok((jar, (status, Json(answer)).into_response()))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Response)> {
    let Json(request) = payload?;
    request.validate()?;

    let body = serde_json::to_value(&request).map_err(anyhow::Error::from)?;
    authenticate(&state, jar, paths::AUTH_LOGIN, &body).await
}

async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;
    request.validate()?;

    let body = serde_json::to_value(&request).map_err(anyhow::Error::from)?;
    let (status, answer) = state
        .upstream
        .forward(Method::POST, paths::AUTH_REGISTER, None, Some(&body))
        .await?;

    tracing::info!("New storefront account registered");

    // Some deployments sign the user in straight away.
    match extract_token(&answer) {
        Some(token) => {
            let jar = jar.add(session_cookie(&state, token));
            Ok((jar, (status, Json(answer))).into_response())
        }
        None => Ok((status, Json(answer)).into_response()),
    }
}

async fn google_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<GoogleLoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Response)> {
    let Json(request) = payload?;
    if request.credential.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Не отримано відповідь від Google".to_string(),
        ));
    }
    let client_id = state.config.google_client_id.as_deref().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("GOOGLE_CLIENT_ID is not configured"))
    })?;

    let body = json!({
        "idToken": request.credential.trim(),
        "clientId": client_id,
    });
    authenticate(&state, jar, paths::AUTH_GOOGLE_LOGIN, &body).await
}

/// End the session. The cookie is cleared even if the upstream call fails,
/// so the shopper is never stuck signed in locally.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    if let Err(e) = state
        .upstream
        .send_empty::<Value>(Method::POST, paths::AUTH_LOGOUT, Some(token.as_str()), None)
        .await
    {
        tracing::warn!(error = %e, "Upstream logout failed, clearing local session anyway");
    }

    let jar = jar.add(removal_cookie(&state));
    let body = json!({ "message": "Ви вийшли з акаунта" });
    (jar, (StatusCode::OK, Json(body)).into_response())
}

async fn check_admin(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
) -> Result<Json<Value>> {
    let answer: Value = match state
        .upstream
        .get_json(paths::AUTH_CHECK_ADMIN, Some(token.as_str()))
        .await
    {
        Ok(answer) => answer,
        Err(e) if e.status() == Some(403) => Value::Bool(false),
        Err(e) => return Err(e.into()),
    };
    Ok(Json(json!({ "isAdmin": is_admin_answer(&answer) })))
}
