// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A notification as delivered by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NotificationItem {
    #[serde(deserialize_with = "super::de::id")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "super::de::id")]
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(deserialize_with = "super::de::timestamp")]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
    #[serde(default)]
    pub is_high_priority: bool,
}

/// Which remote set the notifications drawer is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationTab {
    #[default]
    Unseen,
    Seen,
}

impl NotificationTab {
    /// Upstream path segment for this tab.
    pub fn path(self) -> &'static str {
        match self {
            NotificationTab::Unseen => "unseen",
            NotificationTab::Seen => "seen",
        }
    }
}

/// Read the unread counter from the upstream answer, which is either a bare
/// number or an object carrying `count`. Anything else counts as zero.
pub fn parse_unseen_count(answer: &serde_json::Value) -> u64 {
    use serde_json::Value;

    let number = |v: &Value| match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    match answer {
        Value::Object(obj) => ["count", "unseenCount"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(number))
            .unwrap_or(0),
        other => number(other).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_unseen_count() {
        assert_eq!(parse_unseen_count(&json!(7)), 7);
        assert_eq!(parse_unseen_count(&json!({"count": 3})), 3);
        assert_eq!(parse_unseen_count(&json!("12")), 12);
        assert_eq!(parse_unseen_count(&json!(null)), 0);
        assert_eq!(parse_unseen_count(&json!({"other": 1})), 0);
    }

    #[test]
    fn test_notification_decodes_upstream_shape() {
        let item: NotificationItem = serde_json::from_value(json!({
            "id": 15,
            "type": 2,
            "message": "Ваше замовлення відправлено",
            "createdAt": "2026-03-01T10:15:00",
            "isHighPriority": true
        }))
        .unwrap();

        assert_eq!(item.id, "15");
        assert_eq!(item.kind, "2");
        assert!(item.is_high_priority);
        assert!(item.from.is_none());
    }
}
