// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Favorite collections.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Name of the implicit collection that receives favorites when the user
/// has not picked a destination.
pub const DEFAULT_FAVORITE_LIST: &str = "Товари";

/// A named favorites collection owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FavoriteList {
    #[serde(deserialize_with = "super::de::id")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "super::de::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    pub name: String,
    /// Product ids in this collection
    #[serde(default, deserialize_with = "super::de::id_vec")]
    pub products: Vec<String>,
}

impl FavoriteList {
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_FAVORITE_LIST
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p == product_id)
    }
}
