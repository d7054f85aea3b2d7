// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication session persisted in browser-style key/value storage.

use crate::models::PendingOrder;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Bearer token issued by the upstream.
pub const AUTH_TOKEN_KEY: &str = "auth_token";
/// Name shown in the header once signed in.
pub const USER_DISPLAY_NAME_KEY: &str = "user_display_name";
/// Local override that shows the admin console without the upstream check.
/// Only honoured in development builds of the frontend.
pub const ADMIN_DEV_BYPASS_KEY: &str = "admin_dev_bypass";
/// Session-scoped copy of an unfinished guest checkout.
pub const PENDING_ORDER_KEY: &str = "pending_order";

/// Where unauthenticated shoppers are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Minimal `localStorage`/`sessionStorage` interface.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage for servers and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// The signed-in state. Authentication is simply "a token is stored".
#[derive(Clone)]
pub struct AuthSession {
    local: Arc<dyn KeyValueStorage>,
    session: Arc<dyn KeyValueStorage>,
}

impl AuthSession {
    /// `local` survives restarts; `session` holds per-tab data such as the
    /// pending order.
    pub fn new(local: Arc<dyn KeyValueStorage>, session: Arc<dyn KeyValueStorage>) -> Self {
        Self { local, session }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.local.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn display_name(&self) -> Option<String> {
        self.local.get(USER_DISPLAY_NAME_KEY)
    }

    pub fn sign_in(&self, token: &str, display_name: Option<&str>) {
        self.local.set(AUTH_TOKEN_KEY, token);
        match display_name {
            Some(name) => self.local.set(USER_DISPLAY_NAME_KEY, name),
            None => self.local.remove(USER_DISPLAY_NAME_KEY),
        }
        tracing::debug!("Session started");
    }

    pub fn sign_out(&self) {
        self.local.remove(AUTH_TOKEN_KEY);
        self.local.remove(USER_DISPLAY_NAME_KEY);
        self.session.remove(PENDING_ORDER_KEY);
        tracing::debug!("Session cleared");
    }

    pub fn admin_dev_bypass(&self) -> bool {
        self.local.get(ADMIN_DEV_BYPASS_KEY).as_deref() == Some("true")
    }

    pub fn set_admin_dev_bypass(&self, enabled: bool) {
        if enabled {
            self.local.set(ADMIN_DEV_BYPASS_KEY, "true");
        } else {
            self.local.remove(ADMIN_DEV_BYPASS_KEY);
        }
    }

    pub fn save_pending_order(&self, order: &PendingOrder) -> Result<(), serde_json::Error> {
        let raw = serde_json::to_string(order)?;
        self.session.set(PENDING_ORDER_KEY, &raw);
        Ok(())
    }

    /// The stored pending order, if any. A corrupt entry is discarded.
    pub fn pending_order(&self) -> Option<PendingOrder> {
        let raw = self.session.get(PENDING_ORDER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable pending order");
                self.session.remove(PENDING_ORDER_KEY);
                None
            }
        }
    }

    pub fn clear_pending_order(&self) {
        self.session.remove(PENDING_ORDER_KEY);
    }

    /// Login page URL that returns the shopper to `return_to` afterwards.
    pub fn login_redirect(return_to: &str) -> String {
        format!(
            "{}?returnUrl={}",
            LOGIN_PATH,
            urlencoding::encode(return_to)
        )
    }
}
