// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Checkout and payment routes.
//!
//! Orders and card details are validated here so obviously bad input never
//! reaches the upstream. Settlement itself is entirely upstream.

use super::forwarded;
use crate::error::Result;
use crate::middleware::AuthToken;
use crate::models::{CardPayment, RegisteredOrder, UnregisteredOrder};
use crate::services::upstream::paths;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    response::Response,
    routing::post,
    Extension, Json, Router,
};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/orders/unregistered", post(buy_unregistered))
        .route("/api/payments/pay", post(pay))
}

pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/orders/registered", post(buy_registered))
}

async fn buy_registered(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<AuthToken>,
    payload: std::result::Result<Json<RegisteredOrder>, JsonRejection>,
) -> Result<Response> {
    let Json(order) = payload?;
    order.validate()?;

    let body = serde_json::to_value(&order).map_err(anyhow::Error::from)?;
    let answer = state
        .upstream
        .forward(
            Method::POST,
            paths::ORDER_BUY_REGISTERED,
            Some(token.as_str()),
            Some(&body),
        )
        .await?;
    tracing::info!(lines = order.items.len(), "Registered order placed");
    Ok(forwarded(answer))
}

async fn buy_unregistered(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<UnregisteredOrder>, JsonRejection>,
) -> Result<Response> {
    let Json(order) = payload?;
    order.validate()?;

    let body = serde_json::to_value(&order).map_err(anyhow::Error::from)?;
    let answer = state
        .upstream
        .forward(Method::POST, paths::ORDER_BUY_UNREGISTERED, None, Some(&body))
        .await?;
    tracing::info!(lines = order.items.len(), "Guest order placed");
    Ok(forwarded(answer))
}

/// Card details are never logged.
async fn pay(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CardPayment>, JsonRejection>,
) -> Result<Response> {
    let Json(mut payment) = payload?;
    payment.validate()?;
    payment.card_number = payment.digits();

    let body: Value = serde_json::to_value(&payment).map_err(anyhow::Error::from)?;
    let answer = state
        .upstream
        .forward(Method::POST, paths::BUY_PAY, None, Some(&body))
        .await?;
    tracing::info!(order_id = %payment.order_id, "Payment submitted");
    Ok(forwarded(answer))
}
