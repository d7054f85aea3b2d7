// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Product listing models, in the shape the storefront pages consume.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A product card. Fields the storefront does not interpret are carried
/// through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Price the shopper actually pays.
    pub fn effective_price(&self) -> f64 {
        match self.discount_price {
            Some(d) if d > 0.0 && d < self.price => d,
            _ => self.price,
        }
    }
}

/// Normalized product listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProductPage {
    pub price_from: f64,
    pub price_to: f64,
    pub pages: u32,
    pub count: u32,
    pub products: Vec<Product>,
}

impl ProductPage {
    pub fn empty() -> Self {
        Self {
            price_from: 0.0,
            price_to: 0.0,
            pages: 0,
            count: 0,
            products: vec![],
        }
    }
}
