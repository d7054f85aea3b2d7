// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process cache for category data.
//!
//! The full tree is fetched once and served until its TTL lapses (one hour
//! by default). Individual category lookups used by the breadcrumb walker
//! share the same expiry. The per-id map is bounded: expired entries are
//! purged once it fills, and lookups are not cached while it stays full.

use crate::error::UpstreamError;
use crate::models::Category;
use crate::services::normalize;
use crate::services::upstream::{paths, UpstreamClient};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Upper bound on individually cached categories.
pub const MAX_CACHED_CATEGORIES: usize = 4096;

#[derive(Clone)]
struct CachedTree {
    roots: Arc<Vec<Category>>,
    expires_at: Instant,
}

#[derive(Clone)]
struct CachedCategory {
    category: Option<Category>,
    expires_at: Instant,
}

/// Category cache shared by all request handlers.
pub struct CategoryCache {
    ttl: Duration,
    tree: RwLock<Option<CachedTree>>,
    /// Serializes tree refreshes so a cold cache triggers one upstream call.
    refresh_lock: Mutex<()>,
    by_id: DashMap<String, CachedCategory>,
    max_entries: usize,
}

impl CategoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_CACHED_CATEGORIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            tree: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            by_id: DashMap::new(),
            max_entries,
        }
    }

    async fn cached_tree(&self, now: Instant) -> Option<Arc<Vec<Category>>> {
        self.tree
            .read()
            .await
            .as_ref()
            .filter(|cached| now < cached.expires_at)
            .map(|cached| cached.roots.clone())
    }

    /// Full category tree. An upstream `204 No Content` is an empty tree.
    pub async fn full_tree(
        &self,
        upstream: &UpstreamClient,
    ) -> Result<Arc<Vec<Category>>, UpstreamError> {
        if let Some(roots) = self.cached_tree(Instant::now()).await {
            return Ok(roots);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another request may have refreshed while we waited.
        if let Some(roots) = self.cached_tree(Instant::now()).await {
            return Ok(roots);
        }

        let raw: Option<Value> = upstream
            .get_optional_json(paths::CATEGORY_FULL_TREE, None)
            .await?;
        let roots = Arc::new(normalize::normalize_categories(raw.unwrap_or(Value::Null))?);

        tracing::info!(roots = roots.len(), "Category tree refreshed");

        *self.tree.write().await = Some(CachedTree {
            roots: roots.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        Ok(roots)
    }

    /// Single category by id. `None` when upstream does not know it.
    pub async fn category(
        &self,
        upstream: &UpstreamClient,
        id: &str,
    ) -> Result<Option<Category>, UpstreamError> {
        let now = Instant::now();
        if let Some(cached) = self.by_id.get(id) {
            if now < cached.expires_at {
                return Ok(cached.category.clone());
            }
        }

        let category = match upstream
            .get_optional_json::<Value>(&paths::category(id), None)
            .await
        {
            Ok(Some(raw)) => normalize::normalize_category(raw)?,
            Ok(None) => None,
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        self.remember(id, category.clone(), now);
        Ok(category)
    }

    fn remember(&self, id: &str, category: Option<Category>, now: Instant) {
        if !self.by_id.contains_key(id) && self.by_id.len() >= self.max_entries {
            self.by_id.retain(|_, cached| now < cached.expires_at);
            if self.by_id.len() >= self.max_entries {
                tracing::debug!(
                    entries = self.by_id.len(),
                    category_id = %id,
                    "Category cache full, not caching lookup"
                );
                return;
            }
        }

        self.by_id.insert(
            id.to_string(),
            CachedCategory {
                category,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Drop everything; the next request refetches.
    pub async fn invalidate(&self) {
        *self.tree.write().await = None;
        self.by_id.clear();
    }
}
