// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the storefront.
//!
//! Every entity here is a cache of something the upstream API owns.

pub mod cart;
pub mod category;
pub mod favorite;
pub mod media;
pub mod notification;
pub mod order;
pub mod product;

pub use cart::CartItem;
pub use category::Category;
pub use favorite::{FavoriteList, DEFAULT_FAVORITE_LIST};
pub use media::{MediaKind, ProductMedia};
pub use notification::{parse_unseen_count, NotificationItem, NotificationTab};
pub use order::{CardPayment, OrderLine, PendingOrder, RegisteredOrder, UnregisteredOrder};
pub use product::{Product, ProductPage};

/// Deserializers for the loosely typed upstream payloads.
///
/// Upstream ids show up as numbers on some endpoints and strings on others;
/// the storefront treats them all as opaque strings.
pub(crate) mod de {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Int(i64),
        Uint(u64),
    }

    impl RawId {
        fn into_string(self) -> String {
            match self {
                RawId::Str(s) => s,
                RawId::Int(n) => n.to_string(),
                RawId::Uint(n) => n.to_string(),
            }
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        RawId::deserialize(deserializer).map(RawId::into_string)
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<RawId>::deserialize(deserializer)?
            .map(RawId::into_string)
            .filter(|s| !s.is_empty()))
    }

    pub fn id_vec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(Option::<Vec<RawId>>::deserialize(deserializer)?
            .unwrap_or_default()
            .into_iter()
            .map(RawId::into_string)
            .collect())
    }

    /// Accepts RFC3339 as well as the offset-less timestamps the upstream
    /// emits for some records (interpreted as UTC).
    pub fn timestamp<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp: {raw}"))
        })
    }

    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[derive(Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "id")]
            id: String,
            #[serde(default, deserialize_with = "opt_id")]
            parent: Option<String>,
            #[serde(default, deserialize_with = "id_vec")]
            items: Vec<String>,
        }

        #[test]
        fn test_ids_accept_numbers_and_strings() {
            let probe: Probe =
                serde_json::from_str(r#"{"id": 42, "parent": "7", "items": [1, "b"]}"#).unwrap();
            assert_eq!(probe.id, "42");
            assert_eq!(probe.parent.as_deref(), Some("7"));
            assert_eq!(probe.items, vec!["1", "b"]);

            let probe: Probe = serde_json::from_str(r#"{"id": "x", "parent": null}"#).unwrap();
            assert!(probe.parent.is_none());
            assert!(probe.items.is_empty());
        }

        #[test]
        fn test_timestamp_without_offset_is_utc() {
            let dt = parse_timestamp("2025-03-01T10:15:30.123").unwrap();
            assert_eq!(dt.to_rfc3339(), "2025-03-01T10:15:30.123+00:00");
            assert!(parse_timestamp("2025-03-01T10:15:30Z").is_some());
            assert!(parse_timestamp("yesterday").is_none());
        }
    }
}
