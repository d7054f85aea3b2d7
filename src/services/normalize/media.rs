// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Product media normalization.

use super::{parse_item, parse_payload};
use crate::error::UpstreamError;
use crate::models::{MediaKind, ProductMedia};
use serde::Deserialize;
use serde_json::Value;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "avi", "mkv", "ogv"];

/// The upstream's media type flag: a name or the enum ordinal.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMediaType {
    Name(String),
    Ordinal(i64),
}

impl RawMediaType {
    fn kind(&self) -> Option<MediaKind> {
        match self {
            RawMediaType::Name(name) => match name.to_ascii_lowercase().as_str() {
                "video" => Some(MediaKind::Video),
                "image" | "photo" => Some(MediaKind::Image),
                _ => None,
            },
            RawMediaType::Ordinal(0) => Some(MediaKind::Image),
            RawMediaType::Ordinal(1) => Some(MediaKind::Video),
            RawMediaType::Ordinal(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMedia {
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    id: Option<String>,
    #[serde(default, deserialize_with = "crate::models::de::opt_id")]
    product_id: Option<String>,
    #[serde(default, rename = "type")]
    type_flag: Option<RawMediaType>,
    #[serde(default)]
    media_type: Option<RawMediaType>,
    #[serde(default)]
    is_video: Option<bool>,
    #[serde(default)]
    source_url: Option<String>,
    #[serde(default)]
    compressed_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    order: Option<i32>,
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Classify by file extension, ignoring any query string or fragment.
pub fn classify_media_kind(url: &str) -> MediaKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

impl RawMedia {
    fn into_media(self, position: usize) -> Option<ProductMedia> {
        let compressed = non_empty(self.compressed_url);
        let source = non_empty(self.source_url).or_else(|| non_empty(self.url));

        let (url, secondary_url) = match (compressed, source) {
            (Some(c), s) => (c, s),
            (None, Some(s)) => (s, None),
            (None, None) => return None,
        };

        let explicit = match self.is_video {
            Some(true) => Some(MediaKind::Video),
            Some(false) => Some(MediaKind::Image),
            None => self
                .type_flag
                .as_ref()
                .and_then(RawMediaType::kind)
                .or_else(|| self.media_type.as_ref().and_then(RawMediaType::kind)),
        };
        let kind = explicit.unwrap_or_else(|| {
            secondary_url
                .as_deref()
                .map(classify_media_kind)
                .filter(|k| *k == MediaKind::Video)
                .unwrap_or_else(|| classify_media_kind(&url))
        });

        Some(ProductMedia {
            id: self.id,
            product_id: self.product_id,
            kind,
            url,
            secondary_url,
            order: self.order.unwrap_or(position as i32),
        })
    }
}

/// Normalize a media listing, sorted by display order. Items with no usable
/// URL are dropped; a payload that is not a list is rejected.
pub fn normalize_media(value: Value) -> Result<Vec<ProductMedia>, UpstreamError> {
    let raw = match value {
        Value::Null => return Ok(vec![]),
        Value::Object(mut obj) if obj.contains_key("media") => {
            obj.remove("media").unwrap_or(Value::Array(vec![]))
        }
        other => other,
    };
    let raw: Vec<Value> = parse_payload(raw, "media list")?;
    let total = raw.len();

    let mut media: Vec<ProductMedia> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| parse_item::<RawMedia>(item, "media")?.into_media(i))
        .collect();
    media.sort_by_key(|m| m.order);

    if media.len() < total {
        tracing::warn!(dropped = total - media.len(), "Dropped malformed media items or ones without a URL");
    }
    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefers_compressed_url() {
        let media = normalize_media(json!([{
            "id": 1,
            "sourceUrl": "https://cdn.test/orig.png",
            "compressedUrl": "https://cdn.test/small.webp"
        }]))
        .unwrap();

        assert_eq!(media[0].url, "https://cdn.test/small.webp");
        assert_eq!(media[0].secondary_url.as_deref(), Some("https://cdn.test/orig.png"));
        assert_eq!(media[0].kind, MediaKind::Image);
    }

    #[test]
    fn test_explicit_flag_beats_extension() {
        let media = normalize_media(json!([
            {"sourceUrl": "https://cdn.test/clip.bin", "type": "video", "order": 2},
            {"sourceUrl": "https://cdn.test/clip.mp4", "isVideo": false, "order": 1},
            {"sourceUrl": "https://cdn.test/clip2.bin", "mediaType": 1, "order": 3}
        ]))
        .unwrap();

        assert_eq!(media[0].kind, MediaKind::Image);
        assert_eq!(media[1].kind, MediaKind::Video);
        assert_eq!(media[2].kind, MediaKind::Video);
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(classify_media_kind("https://cdn.test/a.MP4?v=2"), MediaKind::Video);
        assert_eq!(classify_media_kind("https://cdn.test/a.webm#t=1"), MediaKind::Video);
        assert_eq!(classify_media_kind("https://cdn.test/a.jpeg"), MediaKind::Image);
        assert_eq!(classify_media_kind("https://cdn.test/noext"), MediaKind::Image);

        let media = normalize_media(json!([{
            "compressedUrl": "https://cdn.test/poster.webp",
            "sourceUrl": "https://cdn.test/movie.mov"
        }]))
        .unwrap();
        assert_eq!(media[0].kind, MediaKind::Video);
    }

    #[test]
    fn test_items_without_url_are_dropped() {
        let media = normalize_media(json!({"media": [{"id": 1}, {"url": "https://cdn.test/x.png"}]}))
            .unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].order, 1);
    }

    #[test]
    fn test_type_and_media_type_together() {
        let media = normalize_media(json!([
            {"sourceUrl": "https://cdn.test/a.png", "type": "image", "mediaType": 1, "order": 1},
            {"sourceUrl": "https://cdn.test/b.bin", "type": "other", "mediaType": 1, "order": 2},
            {"sourceUrl": "https://cdn.test/c.png", "mediaType": "video", "order": 3}
        ]))
        .unwrap();

        let kinds: Vec<MediaKind> = media.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video, MediaKind::Video]);
    }

    #[test]
    fn test_malformed_item_is_dropped() {
        let media = normalize_media(json!([
            null,
            {"sourceUrl": 12},
            {"url": "https://cdn.test/x.png"}
        ]))
        .unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].order, 2);
    }

    #[test]
    fn test_non_list_is_rejected() {
        let err = normalize_media(json!({"url": "x"})).unwrap_err();
        assert!(matches!(err, UpstreamError::Payload(_)));
    }
}
