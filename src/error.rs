// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Generic message shown to shoppers when the upstream API is unreachable.
pub const SERVER_ERROR_MESSAGE: &str = "Помилка сервера. Спробуйте пізніше.";

/// Errors from calls to the upstream Sell Point API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Upstream JSON parse error: {0}")]
    Decode(String),

    #[error("Malformed upstream payload: {0}")]
    Payload(String),
}

impl UpstreamError {
    /// HTTP status reported by upstream, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Потрібна авторизація".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Доступ заборонено".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Upstream(UpstreamError::Status { status, message }) => {
                let status =
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(status = %status, message = %message, "Upstream server error");
                } else {
                    tracing::debug!(status = %status, message = %message, "Upstream client error");
                }
                (status, "upstream_error", message.clone())
            }
            AppError::Upstream(UpstreamError::Payload(msg)) => {
                tracing::error!(error = %msg, "Rejected malformed upstream payload");
                (
                    StatusCode::BAD_GATEWAY,
                    "bad_upstream_payload",
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "Upstream transport error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_unavailable",
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    SERVER_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        AppError::BadRequest("Некоректні дані запиту".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(validation_messages(&errors).join("; "))
    }
}

/// Human-readable messages from a validation failure, nested fields included.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    use validator::ValidationErrorsKind;

    fn collect(errors: &validator::ValidationErrors, out: &mut Vec<String>) {
        let mut fields: Vec<_> = errors.errors().iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, kind) in fields {
            match kind {
                ValidationErrorsKind::Field(list) => {
                    out.extend(list.iter().map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{}: {}", field, e.code),
                    }))
                }
                ValidationErrorsKind::Struct(inner) => collect(inner, out),
                ValidationErrorsKind::List(items) => {
                    for inner in items.values() {
                        collect(inner, out);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    collect(errors, &mut out);
    out.dedup();
    out
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
