// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Category payload normalization.

use super::{parse_item, parse_payload};
use crate::error::UpstreamError;
use crate::models::Category;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCategory {
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    parent_id: Option<String>,
    #[serde(default)]
    children: Option<Vec<Value>>,
}

impl RawCategory {
    fn into_category(self) -> Option<Category> {
        let id = self.id?;
        let name = self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
        Some(Category {
            id,
            name,
            parent_id: self.parent_id,
            children: self
                .children
                .unwrap_or_default()
                .into_iter()
                .filter_map(|child| parse_item::<RawCategory>(child, "category"))
                .filter_map(RawCategory::into_category)
                .collect(),
        })
    }
}

/// Normalize a list of categories (children listings, search results, the
/// full tree). Entries missing `id` or `name` are dropped at every level.
pub fn normalize_categories(value: Value) -> Result<Vec<Category>, UpstreamError> {
    let raw = match value {
        Value::Null => return Ok(vec![]),
        // Some endpoints wrap the list: {"categories": [...]}
        Value::Object(mut obj) if obj.contains_key("categories") => obj
            .remove("categories")
            .unwrap_or(Value::Array(vec![])),
        other => other,
    };
    let raw: Vec<Value> = parse_payload(raw, "category list")?;
    let total = raw.len();
    let categories: Vec<Category> = raw
        .into_iter()
        .filter_map(|item| parse_item::<RawCategory>(item, "category"))
        .filter_map(RawCategory::into_category)
        .collect();

    if categories.len() < total {
        tracing::debug!(
            dropped = total - categories.len(),
            "Dropped malformed categories or ones without id or name"
        );
    }
    Ok(categories)
}

/// Normalize a single category; `None` when the record lacks `id` or `name`.
pub fn normalize_category(value: Value) -> Result<Option<Category>, UpstreamError> {
    let raw: RawCategory = parse_payload(value, "category")?;
    Ok(raw.into_category())
}
