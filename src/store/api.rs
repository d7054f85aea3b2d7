// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upstream operations used by the state services.
//!
//! The services are generic over these traits so tests can drive them with
//! in-memory fakes. [`SellPointClient`] is the real implementation.

use super::session::AuthSession;
use crate::error::UpstreamError;
use crate::middleware::auth::{extract_token, is_admin_answer};
use crate::models::{CartItem, Category, FavoriteList, NotificationItem, NotificationTab};
use crate::services::normalize::{
    normalize_categories, parse_wrapped_list, ITEMS_KEY, LISTS_KEY,
};
use crate::services::upstream::{paths, UpstreamClient};
use axum::http::Method;
use serde_json::{json, Value};

#[allow(async_fn_in_trait)]
pub trait FavoritesApi {
    async fn my_lists(&self) -> Result<Vec<FavoriteList>, UpstreamError>;
    async fn add_to_default(&self, product_id: &str) -> Result<(), UpstreamError>;
    async fn add_to_list(&self, list_id: &str, product_id: &str) -> Result<(), UpstreamError>;
    async fn remove_from_list(&self, list_id: &str, product_id: &str)
        -> Result<(), UpstreamError>;
    async fn create_list(&self, name: &str) -> Result<Option<FavoriteList>, UpstreamError>;
    async fn delete_list(&self, list_id: &str) -> Result<(), UpstreamError>;
}

#[allow(async_fn_in_trait)]
pub trait CartApi {
    async fn cart(&self) -> Result<Vec<CartItem>, UpstreamError>;
    async fn add(&self, product_id: &str, quantity: u32) -> Result<(), UpstreamError>;
    async fn update(&self, product_id: &str, quantity: u32) -> Result<(), UpstreamError>;
    async fn remove(&self, product_id: &str) -> Result<(), UpstreamError>;
    async fn clear(&self) -> Result<(), UpstreamError>;
}

#[allow(async_fn_in_trait)]
pub trait NotificationsApi {
    async fn notifications(
        &self,
        tab: NotificationTab,
    ) -> Result<Vec<NotificationItem>, UpstreamError>;
    async fn unseen_count(&self) -> Result<u64, UpstreamError>;
    async fn mark_as_read(&self, id: &str) -> Result<(), UpstreamError>;
    async fn mark_all_as_read(&self) -> Result<(), UpstreamError>;
}

/// Upstream client bound to the current session's token.
#[derive(Clone)]
pub struct SellPointClient {
    upstream: UpstreamClient,
    session: AuthSession,
}

impl SellPointClient {
    pub fn new(upstream: UpstreamClient, session: AuthSession) -> Self {
        Self { upstream, session }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    fn token(&self) -> Result<String, UpstreamError> {
        self.session.token().ok_or_else(|| UpstreamError::Status {
            status: 401,
            message: "Потрібна авторизація".to_string(),
        })
    }

    /// Sign in with email and password and store the issued token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), UpstreamError> {
        let answer: Value = self
            .upstream
            .send_json(
                Method::POST,
                paths::AUTH_LOGIN,
                None,
                Some(&json!({ "email": email, "password": password })),
            )
            .await?;
        let token = extract_token(&answer)
            .ok_or_else(|| UpstreamError::Payload("login answer has no token".to_string()))?;
        let display_name = answer
            .get("fullName")
            .or_else(|| answer.get("name"))
            .and_then(Value::as_str);
        self.session.sign_in(&token, display_name);
        Ok(())
    }

    /// Clear the local session. The upstream is told on a best-effort basis.
    pub async fn logout(&self) {
        if let Some(token) = self.session.token() {
            if let Err(e) = self
                .upstream
                .send_empty::<Value>(Method::POST, paths::AUTH_LOGOUT, Some(&token), None)
                .await
            {
                tracing::warn!(error = %e, "Upstream logout failed");
            }
        }
        self.session.sign_out();
    }

    /// Whether the admin console may open. The local development bypass
    /// skips the upstream check; otherwise a `403` means "not an admin".
    pub async fn is_admin(&self) -> Result<bool, UpstreamError> {
        if self.session.admin_dev_bypass() {
            tracing::debug!("Admin check bypassed by local flag");
            return Ok(true);
        }
        let token = self.token()?;
        match self
            .upstream
            .get_json::<Value>(paths::AUTH_CHECK_ADMIN, Some(&token))
            .await
        {
            Ok(answer) => Ok(is_admin_answer(&answer)),
            Err(e) if e.status() == Some(403) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Full category tree for the flyout. `204 No Content` is an empty tree.
    pub async fn category_tree(&self) -> Result<Vec<Category>, UpstreamError> {
        let raw: Option<Value> = self
            .upstream
            .get_optional_json(paths::CATEGORY_FULL_TREE, None)
            .await?;
        normalize_categories(raw.unwrap_or(Value::Null))
    }

    async fn list_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        wrapper: &str,
        what: &str,
    ) -> Result<Vec<T>, UpstreamError> {
        let token = self.token()?;
        let raw: Option<Value> = self.upstream.get_optional_json(path, Some(&token)).await?;
        parse_wrapped_list(raw, wrapper, what)
    }

    async fn mutate(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(), UpstreamError> {
        let token = self.token()?;
        self.upstream
            .send_empty(method, path, Some(&token), body)
            .await
    }
}

impl FavoritesApi for SellPointClient {
    async fn my_lists(&self) -> Result<Vec<FavoriteList>, UpstreamError> {
        self.list_json(paths::FAVORITE_MY_LISTS, LISTS_KEY, "favorite lists")
            .await
    }

    async fn add_to_default(&self, product_id: &str) -> Result<(), UpstreamError> {
        let body = json!({ "productId": product_id });
        self.mutate(Method::POST, paths::FAVORITE_ADD_TO_DEFAULT, Some(&body))
            .await
    }

    async fn add_to_list(&self, list_id: &str, product_id: &str) -> Result<(), UpstreamError> {
        let body = json!({ "productId": product_id });
        self.mutate(
            Method::POST,
            &paths::favorite_add_product(list_id),
            Some(&body),
        )
        .await
    }

    async fn remove_from_list(
        &self,
        list_id: &str,
        product_id: &str,
    ) -> Result<(), UpstreamError> {
        self.mutate(
            Method::DELETE,
            &paths::favorite_remove_product(list_id, product_id),
            None,
        )
        .await
    }

    async fn create_list(&self, name: &str) -> Result<Option<FavoriteList>, UpstreamError> {
        let token = self.token()?;
        let (_, answer) = self
            .upstream
            .forward(
                Method::POST,
                paths::FAVORITE_CREATE,
                Some(&token),
                Some(&json!({ "name": name })),
            )
            .await?;
        // Some deployments answer with the new list, others with nothing.
        Ok(serde_json::from_value(answer).ok())
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), UpstreamError> {
        self.mutate(Method::DELETE, &paths::favorite_list(list_id), None)
            .await
    }
}

impl CartApi for SellPointClient {
    async fn cart(&self) -> Result<Vec<CartItem>, UpstreamError> {
        self.list_json(paths::CART, ITEMS_KEY, "cart").await
    }

    async fn add(&self, product_id: &str, quantity: u32) -> Result<(), UpstreamError> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        self.mutate(Method::POST, paths::CART_ADD, Some(&body)).await
    }

    async fn update(&self, product_id: &str, quantity: u32) -> Result<(), UpstreamError> {
        let body = json!({ "productId": product_id, "quantity": quantity });
        self.mutate(Method::PUT, paths::CART_UPDATE, Some(&body)).await
    }

    async fn remove(&self, product_id: &str) -> Result<(), UpstreamError> {
        self.mutate(Method::DELETE, &paths::cart_remove(product_id), None)
            .await
    }

    async fn clear(&self) -> Result<(), UpstreamError> {
        self.mutate(Method::DELETE, paths::CART_CLEAR, None).await
    }
}

impl NotificationsApi for SellPointClient {
    async fn notifications(
        &self,
        tab: NotificationTab,
    ) -> Result<Vec<NotificationItem>, UpstreamError> {
        self.list_json(&paths::notifications(tab), ITEMS_KEY, "notifications")
            .await
    }

    async fn unseen_count(&self) -> Result<u64, UpstreamError> {
        let token = self.token()?;
        let raw: Option<Value> = self
            .upstream
            .get_optional_json(paths::NOTIFICATION_UNSEEN_COUNT, Some(&token))
            .await?;
        Ok(raw.as_ref().map(crate::models::parse_unseen_count).unwrap_or(0))
    }

    async fn mark_as_read(&self, id: &str) -> Result<(), UpstreamError> {
        self.mutate(Method::POST, &paths::notification_mark_read(id), None)
            .await
    }

    async fn mark_all_as_read(&self) -> Result<(), UpstreamError> {
        self.mutate(Method::POST, paths::NOTIFICATION_MARK_ALL, None)
            .await
    }
}
