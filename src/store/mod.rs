// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side state services.
//!
//! Each service owns a [`Store`] holding its cached view of upstream data.
//! Consumers subscribe to a store and are called with the new state after
//! every update. Mutations go through [`Command`](command::Command), which
//! applies an optimistic change, issues the upstream request and then
//! refetches.

pub mod api;
pub mod cart;
pub mod command;
pub mod favorites;
pub mod notifications;
pub mod session;

pub use api::{CartApi, FavoritesApi, NotificationsApi, SellPointClient};
pub use cart::{CartService, CartState};
pub use command::{Command, FailurePolicy, Toast, ToastKind, Toaster};
pub use favorites::{FavoritesService, FavoritesState, ToggleOutcome};
pub use notifications::{NotificationsService, NotificationsState};
pub use session::{AuthSession, KeyValueStorage, MemoryStorage};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    state: T,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

/// Shared state cell with an explicit subscriber list.
///
/// Cloning a `Store` yields another handle to the same state.
pub struct Store<T> {
    inner: Arc<Mutex<Inner<T>>>,
    next_id: Arc<AtomicU64>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T: Default + Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Store<T> {
    pub fn new(state: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                subscribers: Vec::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    // Poisoning only means an update closure panicked; the state is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `callback`; it runs after every subsequent update.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().subscribers.push((id, Arc::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> T {
        self.lock().state.clone()
    }

    /// Read the current state without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().state)
    }

    /// Mutate the state and notify subscribers.
    ///
    /// Subscribers run after the lock is released, so they may read the
    /// store (or update it) themselves.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let (result, state, subscribers) = {
            let mut inner = self.lock();
            let result = f(&mut inner.state);
            let subscribers: Vec<Subscriber<T>> =
                inner.subscribers.iter().map(|(_, s)| Arc::clone(s)).collect();
            (result, inner.state.clone(), subscribers)
        };
        for subscriber in subscribers {
            subscriber(&state);
        }
        result
    }

    /// Replace the whole state and notify subscribers.
    pub fn set(&self, state: T) {
        self.update(|current| *current = state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_subscribers_see_updates() {
        let store = Store::new(0u32);
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_clone = Arc::clone(&seen);
        let id = store.subscribe(move |v| {
            seen_clone.store(*v as usize, Ordering::SeqCst);
        });

        store.update(|v| *v = 5);
        assert_eq!(seen.load(Ordering::SeqCst), 5);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set(9);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert_eq!(store.snapshot(), 9);
    }

    #[test]
    fn test_subscriber_may_read_store() {
        let store = Store::new(vec![1, 2]);
        let reader = store.clone();
        let lengths = Arc::new(Mutex::new(Vec::new()));

        let lengths_clone = Arc::clone(&lengths);
        store.subscribe(move |_| {
            let len = reader.with(|v| v.len());
            lengths_clone.lock().unwrap().push(len);
        });

        store.update(|v| v.push(3));
        assert_eq!(*lengths.lock().unwrap(), vec![3]);
    }
}
