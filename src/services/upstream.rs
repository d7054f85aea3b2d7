// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the upstream Sell Point REST API.
//!
//! Handles:
//! - Bearer token forwarding
//! - Mapping non-2xx responses to [`UpstreamError::Status`] with the
//!   upstream's own message when it sent one
//! - Treating `204 No Content` as "nothing" rather than a parse failure

use crate::error::UpstreamError;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Upstream endpoint paths, relative to the configured base URL.
pub mod paths {
    use urlencoding::encode;

    pub const CATEGORY_FULL_TREE: &str = "/api/Category/full-tree";
    pub const PRODUCT_GET_ALL: &str = "/api/Product/get-all";
    pub const AUTH_LOGIN: &str = "/api/Auth/login";
    pub const AUTH_REGISTER: &str = "/api/Auth/register";
    pub const AUTH_LOGOUT: &str = "/api/Auth/logout";
    pub const AUTH_GOOGLE_LOGIN: &str = "/api/Auth/google-login";
    pub const AUTH_CHECK_ADMIN: &str = "/api/Auth/check-admin";
    pub const USER_ME: &str = "/api/User/me";
    pub const USER_GET_ALL: &str = "/api/User/get-all";
    pub const ORDER_BUY_REGISTERED: &str = "/api/Order/BuyRegistered";
    pub const ORDER_BUY_UNREGISTERED: &str = "/api/Order/BuyUnRegistered";
    pub const BUY_PAY: &str = "/api/Buy/Pay";
    pub const REVIEW_CREATE: &str = "/api/ProductReview/create";
    pub const FAVORITE_MY_LISTS: &str = "/Favorite/my-lists";
    pub const FAVORITE_ADD_TO_DEFAULT: &str = "/Favorite/add-to-default";
    pub const FAVORITE_CREATE: &str = "/Favorite/create";
    pub const NOTIFICATION_UNSEEN_COUNT: &str = "/Notification/unseen-count";
    pub const NOTIFICATION_MARK_ALL: &str = "/Notification/mark-all-as-read";
    pub const CART: &str = "/api/Cart";
    pub const CART_ADD: &str = "/api/Cart/add";
    pub const CART_UPDATE: &str = "/api/Cart/update";
    pub const CART_CLEAR: &str = "/api/Cart/clear";

    pub fn category(id: &str) -> String {
        format!("/api/Category/{}", encode(id))
    }

    pub fn category_children(id: &str) -> String {
        format!("/api/Category/children/{}", encode(id))
    }

    pub fn category_search(query: &str) -> String {
        format!("/api/Category/search?query={}", encode(query))
    }

    pub fn product(id: &str) -> String {
        format!("/api/Product/get-by-id/{}", encode(id))
    }

    pub fn product_search(query: &str) -> String {
        format!("/api/Product/search?query={}", encode(query))
    }

    pub fn product_random(count: u32) -> String {
        format!("/api/Product/random?count={}", count)
    }

    pub fn media_by_product(id: &str) -> String {
        format!("/api/ProductMedia/by-product-id/{}", encode(id))
    }

    pub fn media_many(ids: &[String]) -> String {
        let query = ids
            .iter()
            .map(|id| format!("productIds={}", encode(id)))
            .collect::<Vec<_>>()
            .join("&");
        format!("/api/ProductMedia/many?{}", query)
    }

    pub fn reviews_by_product(id: &str) -> String {
        format!("/api/ProductReview/by-product/{}", encode(id))
    }

    pub fn review(id: &str) -> String {
        format!("/api/ProductReview/{}", encode(id))
    }

    pub fn review_reaction(id: &str) -> String {
        format!("/api/ProductReview/{}/reaction", encode(id))
    }

    pub fn user_ban(id: &str) -> String {
        format!("/api/User/{}/ban", encode(id))
    }

    pub fn user_unban(id: &str) -> String {
        format!("/api/User/{}/unban", encode(id))
    }

    pub fn favorite_list(list_id: &str) -> String {
        format!("/Favorite/{}", encode(list_id))
    }

    pub fn favorite_add_product(list_id: &str) -> String {
        format!("/Favorite/{}/add-product", encode(list_id))
    }

    pub fn favorite_remove_product(list_id: &str, product_id: &str) -> String {
        format!(
            "/Favorite/{}/remove-product/{}",
            encode(list_id),
            encode(product_id)
        )
    }

    pub fn notifications(tab: crate::models::NotificationTab) -> String {
        format!("/Notification/{}", tab.path())
    }

    pub fn notification_mark_read(id: &str) -> String {
        format!("/Notification/mark-as-read/{}", encode(id))
    }

    pub fn cart_remove(product_id: &str) -> String {
        format!("/api/Cart/remove/{}", encode(product_id))
    }
}

/// Upstream API client.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client for `base_url` (no trailing slash).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET and decode JSON. A 204 or empty body is a decode error here;
    /// use [`get_optional_json`](Self::get_optional_json) where "no content"
    /// is a legitimate answer.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, UpstreamError> {
        self.get_optional_json(path, token)
            .await?
            .ok_or_else(|| UpstreamError::Decode(format!("empty response from {}", path)))
    }

    /// GET and decode JSON, mapping `204 No Content` and empty bodies to `None`.
    pub async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Option<T>, UpstreamError> {
        let response = self.request(Method::GET, path, token).send().await?;
        let response = check_response(response).await?;
        decode_optional(response).await
    }

    /// Send a request with an optional JSON body and decode the JSON reply.
    pub async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, UpstreamError> {
        let response = self.send(method, path, token, body).await?;
        decode_optional(response)
            .await?
            .ok_or_else(|| UpstreamError::Decode(format!("empty response from {}", path)))
    }

    /// Send a request whose reply body is irrelevant.
    pub async fn send_empty<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<(), UpstreamError> {
        self.send(method, path, token, body).await?;
        Ok(())
    }

    /// Pass-through used by the thin proxy routes: returns the upstream
    /// status and JSON body (`null` when the body is empty).
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value), UpstreamError> {
        let response = self.send(method, path, token, body).await?;
        let status = response.status();
        let value = decode_optional(response).await?.unwrap_or(Value::Null);
        Ok((status, value))
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<reqwest::Response, UpstreamError> {
        let mut builder = self.request(method, path, token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        check_response(response).await
    }
}

/// Check response status and return error if not successful.
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, UpstreamError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body).unwrap_or_else(|| default_message(status));

    if status.is_server_error() {
        tracing::error!(status = %status, url = %url, body = %body, "Upstream request failed");
    } else {
        tracing::debug!(status = %status, url = %url, "Upstream rejected request");
    }

    Err(UpstreamError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode_optional<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Option<T>, UpstreamError> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an upstream error body.
///
/// The upstream uses `{message}`, `{error}` or ASP.NET problem details
/// (`{title}`) depending on the controller; plain-text bodies are used as-is.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(obj)) => ["message", "error", "title"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Ok(Value::String(s)) => Some(s),
        Ok(_) => None,
        Err(_) if trimmed.len() <= 500 => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

fn default_message(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "Потрібна авторизація".to_string(),
        StatusCode::FORBIDDEN => "Доступ заборонено".to_string(),
        StatusCode::NOT_FOUND => "Не знайдено".to_string(),
        s if s.is_server_error() => crate::error::SERVER_ERROR_MESSAGE.to_string(),
        s => format!("Помилка запиту ({})", s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_shapes() {
        assert_eq!(
            extract_message(r#"{"message":"Товар не знайдено"}"#).as_deref(),
            Some("Товар не знайдено")
        );
        assert_eq!(
            extract_message(r#"{"title":"One or more validation errors occurred."}"#).as_deref(),
            Some("One or more validation errors occurred.")
        );
        assert_eq!(extract_message("Bad token").as_deref(), Some("Bad token"));
        assert_eq!(extract_message("   "), None);
        assert_eq!(extract_message("[1,2]"), None);
    }

    #[test]
    fn test_paths_are_encoded() {
        assert_eq!(
            paths::product_search("чай зелений"),
            "/api/Product/search?query=%D1%87%D0%B0%D0%B9%20%D0%B7%D0%B5%D0%BB%D0%B5%D0%BD%D0%B8%D0%B9"
        );
        assert_eq!(
            paths::media_many(&["a".to_string(), "b c".to_string()]),
            "/api/ProductMedia/many?productIds=a&productIds=b%20c"
        );
        assert_eq!(
            paths::favorite_remove_product("l1", "p/2"),
            "/Favorite/l1/remove-product/p%2F2"
        );
    }

    #[tokio::test]
    async fn test_no_content_is_none() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/Category/full-tree")
            .with_status(204)
            .create_async()
            .await;

        let client = UpstreamClient::new(&server.url(), None).unwrap();
        let tree: Option<Vec<Value>> = client
            .get_optional_json(paths::CATEGORY_FULL_TREE, None)
            .await
            .unwrap();

        assert!(tree.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_carries_upstream_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/User/me")
            .match_header("authorization", "Bearer tok")
            .with_status(403)
            .with_body(r#"{"message":"Користувача заблоковано"}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new(&server.url(), None).unwrap();
        let err = client
            .get_json::<Value>(paths::USER_ME, Some("tok"))
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Користувача заблоковано");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
