// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notifications drawer service.
//!
//! Unseen and seen items are two disjoint remote sets; only the active tab
//! is held locally. Responses are applied in completion order, so a slow
//! fetch for a tab the user already left can overwrite a newer one.

use super::api::NotificationsApi;
use super::command::{Command, FailurePolicy, Toaster};
use super::Store;
use crate::error::UpstreamError;
use crate::models::{NotificationItem, NotificationTab};
use futures_util::FutureExt;

const FAILURE_MESSAGE: &str = "Не вдалося оновити сповіщення.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationsState {
    pub active_tab: NotificationTab,
    pub items: Vec<NotificationItem>,
    pub unseen_count: u64,
    pub is_loading: bool,
}

pub struct NotificationsService<A> {
    api: A,
    store: Store<NotificationsState>,
    toaster: Toaster,
    policy: FailurePolicy,
}

impl<A: NotificationsApi> NotificationsService<A> {
    pub fn new(api: A, toaster: Toaster) -> Self {
        Self {
            api,
            store: Store::default(),
            toaster,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &Store<NotificationsState> {
        &self.store
    }

    /// Switch tabs and fetch that tab's items.
    pub async fn set_tab(&self, tab: NotificationTab) -> Result<(), UpstreamError> {
        self.store.update(|s| {
            s.active_tab = tab;
            s.items.clear();
        });
        self.refresh_tab().await
    }

    /// Refetch the active tab.
    pub async fn refresh_tab(&self) -> Result<(), UpstreamError> {
        let tab = self.store.with(|s| s.active_tab);
        self.store.update(|s| s.is_loading = true);
        let result = self.api.notifications(tab).await;
        self.store.update(|s| {
            s.is_loading = false;
            match &result {
                Ok(items) => s.items = items.clone(),
                Err(e) if e.is_unauthorized() => s.items.clear(),
                Err(_) => {}
            }
        });
        result.map(|_| ())
    }

    pub async fn refresh_count(&self) -> Result<(), UpstreamError> {
        let count = self.api.unseen_count().await?;
        self.store.update(|s| s.unseen_count = count);
        Ok(())
    }

    /// Active tab plus the unread counter.
    pub async fn refresh(&self) -> Result<(), UpstreamError> {
        let tab = self.refresh_tab().await;
        let count = self.refresh_count().await;
        tab.and(count)
    }

    pub async fn mark_as_read(&self, id: &str) -> Result<(), UpstreamError> {
        let before = self.store.snapshot();
        let owned = id.to_string();

        Command::new(
            "notifications.mark_as_read",
            self.api.mark_as_read(id).boxed_local(),
            FAILURE_MESSAGE,
        )
        .optimistic(move |s: &mut NotificationsState| {
            if s.active_tab == NotificationTab::Unseen {
                let len = s.items.len();
                s.items.retain(|n| n.id != owned);
                if s.items.len() != len {
                    s.unseen_count = s.unseen_count.saturating_sub(1);
                }
            }
        })
        .reconcile(self.refresh().boxed_local())
        .revert(move |s: &mut NotificationsState| *s = before)
        .run(&self.store, self.policy, &self.toaster)
        .await
    }

    pub async fn mark_all_as_read(&self) -> Result<(), UpstreamError> {
        let before = self.store.snapshot();

        Command::new(
            "notifications.mark_all_as_read",
            self.api.mark_all_as_read().boxed_local(),
            FAILURE_MESSAGE,
        )
        .optimistic(|s: &mut NotificationsState| {
            if s.active_tab == NotificationTab::Unseen {
                s.items.clear();
            }
            s.unseen_count = 0;
        })
        .reconcile(self.refresh().boxed_local())
        .revert(move |s: &mut NotificationsState| *s = before)
        .run(&self.store, self.policy, &self.toaster)
        .await
    }
}
