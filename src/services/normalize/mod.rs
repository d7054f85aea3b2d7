// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upstream payload validation and reshaping for the proxy routes.
//!
//! Each normalizer parses the raw upstream JSON into typed input structs.
//! Payloads whose top-level shape is wrong are rejected with
//! [`UpstreamError::Payload`]; individual items that lack required fields
//! or fail to parse are dropped.

pub mod category;
pub mod media;
pub mod product;

pub use category::{normalize_categories, normalize_category};
pub use media::{classify_media_kind, normalize_media};
pub use product::{normalize_product, normalize_product_list, normalize_product_page};

use crate::error::UpstreamError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse `value` as `T`, naming `what` in the rejection message.
pub(crate) fn parse_payload<T: DeserializeOwned>(
    value: Value,
    what: &str,
) -> Result<T, UpstreamError> {
    serde_json::from_value(value)
        .map_err(|e| UpstreamError::Payload(format!("{}: {}", what, e)))
}

/// Wrapper key some upstream list endpoints use: `{"lists": [...]}`.
pub const LISTS_KEY: &str = "lists";
/// Wrapper key for cart and notification listings: `{"items": [...]}`.
pub const ITEMS_KEY: &str = "items";

/// Parse a user-scoped listing. The upstream sends these bare, under
/// `wrapper`, or not at all (`204`/`null`, an empty list).
pub fn parse_wrapped_list<T: DeserializeOwned>(
    raw: Option<Value>,
    wrapper: &str,
    what: &str,
) -> Result<Vec<T>, UpstreamError> {
    let value = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(mut obj)) if obj.contains_key(wrapper) => {
            match obj.remove(wrapper) {
                None | Some(Value::Null) => return Ok(Vec::new()),
                Some(inner) => inner,
            }
        }
        Some(value) => value,
    };
    parse_payload(value, what)
}

/// Parse one list item as `T`. Items that do not fit are dropped with a
/// debug log instead of failing the whole list.
pub(crate) fn parse_item<T: DeserializeOwned>(item: Value, what: &str) -> Option<T> {
    match serde_json::from_value(item) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(item = what, error = %e, "Dropped malformed list item");
            None
        }
    }
}
