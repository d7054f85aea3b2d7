// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Optimistic mutations and their failure reporting.

use super::Store;
use crate::error::UpstreamError;
use futures_util::future::LocalBoxFuture;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What a service does when a mutation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Revert and log only.
    Silent,
    /// Revert, log, and show an error toast.
    #[default]
    Toast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Toasts kept on screen at once; pushing more drops the oldest.
pub const MAX_TOASTS: usize = 5;

/// Queue of user-visible notices shared by all services.
#[derive(Clone, Default)]
pub struct Toaster {
    toasts: Store<Vec<Toast>>,
    next_id: Arc<AtomicU64>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        self.toasts.update(|toasts| {
            toasts.push(toast);
            let excess = toasts.len().saturating_sub(MAX_TOASTS);
            toasts.drain(..excess);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }

    /// Store backing the toast stack, for rendering.
    pub fn store(&self) -> &Store<Vec<Toast>> {
        &self.toasts
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts
            .with(|toasts| toasts.iter().map(|t| t.message.clone()).collect())
    }
}

type StateFn<'a, S> = Box<dyn FnOnce(&mut S) + 'a>;

/// One optimistic mutation against the upstream.
///
/// Run order: `on_optimistic_apply`, then `request`. On success
/// `on_reconcile` refetches the authoritative state. On failure
/// `on_failure_revert` undoes the optimistic change and the failure is
/// reported per [`FailurePolicy`].
pub struct Command<'a, S> {
    name: &'static str,
    request: LocalBoxFuture<'a, Result<(), UpstreamError>>,
    on_optimistic_apply: Option<StateFn<'a, S>>,
    on_reconcile: Option<LocalBoxFuture<'a, Result<(), UpstreamError>>>,
    on_failure_revert: Option<StateFn<'a, S>>,
    failure_message: Cow<'static, str>,
}

impl<'a, S: Clone> Command<'a, S> {
    pub fn new(
        name: &'static str,
        request: LocalBoxFuture<'a, Result<(), UpstreamError>>,
        failure_message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            name,
            request,
            on_optimistic_apply: None,
            on_reconcile: None,
            on_failure_revert: None,
            failure_message: failure_message.into(),
        }
    }

    pub fn optimistic(mut self, apply: impl FnOnce(&mut S) + 'a) -> Self {
        self.on_optimistic_apply = Some(Box::new(apply));
        self
    }

    pub fn reconcile(mut self, refetch: LocalBoxFuture<'a, Result<(), UpstreamError>>) -> Self {
        self.on_reconcile = Some(refetch);
        self
    }

    pub fn revert(mut self, revert: impl FnOnce(&mut S) + 'a) -> Self {
        self.on_failure_revert = Some(Box::new(revert));
        self
    }

    /// Execute against `store`. Returns the request error, after it has
    /// been reverted and reported.
    ///
    /// A failed reconcile is logged but does not fail the command: the
    /// mutation itself went through.
    pub async fn run(
        self,
        store: &Store<S>,
        policy: FailurePolicy,
        toaster: &Toaster,
    ) -> Result<(), UpstreamError> {
        if let Some(apply) = self.on_optimistic_apply {
            store.update(apply);
        }

        match self.request.await {
            Ok(()) => {
                if let Some(refetch) = self.on_reconcile {
                    if let Err(e) = refetch.await {
                        tracing::warn!(command = self.name, error = %e, "Refetch after mutation failed");
                    }
                }
                Ok(())
            }
            Err(e) => {
                if let Some(revert) = self.on_failure_revert {
                    store.update(revert);
                }
                tracing::warn!(command = self.name, error = %e, "Mutation failed, reverted");
                if policy == FailurePolicy::Toast {
                    toaster.error(self.failure_message.into_owned());
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    fn failing() -> LocalBoxFuture<'static, Result<(), UpstreamError>> {
        async {
            Err(UpstreamError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        }
        .boxed_local()
    }

    #[tokio::test]
    async fn test_failure_reverts_and_toasts() {
        let store = Store::new(vec!["a".to_string()]);
        let toaster = Toaster::new();

        let result = Command::new("add", failing(), "Не вдалося")
            .optimistic(|items: &mut Vec<String>| items.push("b".to_string()))
            .revert(|items: &mut Vec<String>| items.retain(|i| i != "b"))
            .run(&store, FailurePolicy::Toast, &toaster)
            .await;

        assert!(result.is_err());
        assert_eq!(store.snapshot(), vec!["a".to_string()]);
        assert_eq!(toaster.messages(), vec!["Не вдалося".to_string()]);
    }

    #[tokio::test]
    async fn test_silent_policy_skips_toast() {
        let store = Store::new(0u32);
        let toaster = Toaster::new();

        let result = Command::new("bump", failing(), "Не вдалося")
            .optimistic(|n: &mut u32| *n += 1)
            .revert(|n: &mut u32| *n -= 1)
            .run(&store, FailurePolicy::Silent, &toaster)
            .await;

        assert!(result.is_err());
        assert_eq!(store.snapshot(), 0);
        assert!(toaster.messages().is_empty());
    }

    #[tokio::test]
    async fn test_success_runs_reconcile() {
        let store = Store::new(0u32);
        let toaster = Toaster::new();
        let refetch_store = store.clone();

        Command::new("bump", async { Ok(()) }.boxed_local(), "Не вдалося")
            .optimistic(|n: &mut u32| *n += 1)
            .reconcile(
                async move {
                    refetch_store.set(10);
                    Ok(())
                }
                .boxed_local(),
            )
            .run(&store, FailurePolicy::Toast, &toaster)
            .await
            .unwrap();

        assert_eq!(store.snapshot(), 10);
    }

    #[test]
    fn test_toast_stack_is_bounded() {
        let toaster = Toaster::new();
        let first = toaster.success("0");
        for i in 1..12 {
            toaster.success(i.to_string());
        }

        let messages = toaster.messages();
        assert_eq!(messages.len(), MAX_TOASTS);
        assert_eq!(messages.first().map(String::as_str), Some("7"));
        assert_eq!(messages.last().map(String::as_str), Some("11"));

        // Dismissing an already dropped toast is harmless.
        toaster.dismiss(first);
        assert_eq!(toaster.messages().len(), MAX_TOASTS);
    }
}
