// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Product payload normalization.
//!
//! Listing responses always come out as `{priceFrom, priceTo, pages, count,
//! products}` no matter which of the upstream's shapes went in.

use super::{parse_item, parse_payload};
use crate::error::UpstreamError;
use crate::models::{Product, ProductPage};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Placeholder name given to products the upstream returned without one.
/// Listings never show such products.
pub const UNNAMED_PRODUCT: &str = "Без назви";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProduct {
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    discount_price: Option<f64>,
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    category_id: Option<String>,
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    store_id: Option<String>,
    #[serde(default)]
    quantity: Option<i64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RawProduct {
    /// Build a product, substituting [`UNNAMED_PRODUCT`] for a missing name.
    fn into_product(self) -> Option<Product> {
        let id = self.id?;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED_PRODUCT.to_string());

        Some(Product {
            id,
            name,
            price: self.price.unwrap_or(0.0),
            discount_price: self.discount_price,
            category_id: self.category_id,
            store_id: self.store_id,
            quantity: self.quantity,
            extra: self.extra,
        })
    }

    /// Build a product fit for a listing: requires both `id` and a real name.
    fn into_listed_product(self) -> Option<Product> {
        self.into_product().filter(|p| p.name != UNNAMED_PRODUCT)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProductPage {
    #[serde(default)]
    price_from: Option<f64>,
    #[serde(default)]
    price_to: Option<f64>,
    #[serde(default)]
    pages: Option<u32>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default, alias = "items")]
    products: Option<Vec<Value>>,
}

fn listed(raw: Vec<Value>) -> Vec<Product> {
    let total = raw.len();
    let products: Vec<Product> = raw
        .into_iter()
        .filter_map(|item| parse_item::<RawProduct>(item, "product"))
        .filter_map(RawProduct::into_listed_product)
        .collect();
    if products.len() < total {
        tracing::debug!(
            dropped = total - products.len(),
            "Dropped malformed products or ones without id or name"
        );
    }
    products
}

fn price_bounds(products: &[Product]) -> (f64, f64) {
    products
        .iter()
        .map(Product::effective_price)
        .fold(None, |acc: Option<(f64, f64)>, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
        .unwrap_or((0.0, 0.0))
}

/// Normalize a `get-all` listing. Accepts the paged object or a bare array.
pub fn normalize_product_page(value: Value) -> Result<ProductPage, UpstreamError> {
    let page = match value {
        Value::Null => return Ok(ProductPage::empty()),
        Value::Array(_) => RawProductPage {
            price_from: None,
            price_to: None,
            pages: None,
            count: None,
            products: Some(parse_payload(value, "product list")?),
        },
        Value::Object(_) => parse_payload::<RawProductPage>(value, "product page")?,
        other => {
            return Err(UpstreamError::Payload(format!(
                "product page: expected object or array, got {}",
                other
            )))
        }
    };

    let products = listed(page.products.unwrap_or_default());
    let (min_price, max_price) = price_bounds(&products);
    let count = page.count.unwrap_or(products.len() as u32);
    let pages = page
        .pages
        .unwrap_or(if products.is_empty() { 0 } else { 1 });

    Ok(ProductPage {
        price_from: page.price_from.unwrap_or(min_price),
        price_to: page.price_to.unwrap_or(max_price),
        pages,
        count,
        products,
    })
}

/// Normalize a flat product array (search, random picks).
pub fn normalize_product_list(value: Value) -> Result<Vec<Product>, UpstreamError> {
    match value {
        Value::Null => Ok(vec![]),
        Value::Object(_) => Ok(normalize_product_page(value)?.products),
        other => Ok(listed(parse_payload(other, "product list")?)),
    }
}

/// Normalize a single product. `None` when the record has no id.
pub fn normalize_product(value: Value) -> Result<Option<Product>, UpstreamError> {
    if value.is_null() {
        return Ok(None);
    }
    let raw: RawProduct = parse_payload(value, "product")?;
    Ok(raw.into_product())
}
