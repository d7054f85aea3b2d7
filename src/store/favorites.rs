// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Favorites service.
//!
//! A product lives in at most one collection. Toggling removes it from
//! wherever it is; otherwise the destination is the forced list, the
//! default list (when the user has no custom lists), or whatever the user
//! picks in the list picker.

use super::api::FavoritesApi;
use super::command::{Command, FailurePolicy, Toaster};
use super::Store;
use crate::error::UpstreamError;
use crate::models::{FavoriteList, DEFAULT_FAVORITE_LIST};
use futures_util::FutureExt;
use std::collections::HashMap;

const FAILURE_MESSAGE: &str = "Не вдалося оновити обране. Спробуйте ще раз.";
const REMOVED_MESSAGE: &str = "Товар видалено з обраного";
const ADDED_UNNAMED_MESSAGE: &str = "Товар додано до обраного";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesState {
    pub lists: Vec<FavoriteList>,
    /// product id → id of the list holding it
    pub index: HashMap<String, String>,
    pub is_loading: bool,
    /// Product waiting for the user to choose a list
    pub picker: Option<String>,
}

impl FavoritesState {
    fn rebuild(&mut self, lists: Vec<FavoriteList>) {
        self.index = lists
            .iter()
            .flat_map(|list| list.products.iter().map(|p| (p.clone(), list.id.clone())))
            .collect();
        self.lists = lists;
    }

    pub fn custom_lists(&self) -> impl Iterator<Item = &FavoriteList> {
        self.lists.iter().filter(|l| !l.is_default())
    }

    pub fn has_custom_lists(&self) -> bool {
        self.custom_lists().next().is_some()
    }

    pub fn default_list(&self) -> Option<&FavoriteList> {
        self.lists.iter().find(|l| l.is_default())
    }

    fn list_name(&self, list_id: &str) -> Option<String> {
        self.lists
            .iter()
            .find(|l| l.id == list_id)
            .map(|l| l.name.clone())
    }
}

/// Where an add goes.
enum Destination {
    Default,
    List(String),
}

/// What a toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Removed { list_id: String },
    /// `list_name` is `None` when the destination list is unknown even
    /// after the refresh.
    Added { list_name: Option<String> },
    PickerOpened,
    Failed,
}

pub struct FavoritesService<A> {
    api: A,
    store: Store<FavoritesState>,
    toaster: Toaster,
    policy: FailurePolicy,
}

impl<A: FavoritesApi> FavoritesService<A> {
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

    pub fn store(&self) -> &Store<FavoritesState> {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_in_favorites(&self, product_id: &str) -> bool {
        self.store.with(|s| s.index.contains_key(product_id))
    }

    /// Refetch all lists and rebuild the product index.
    pub async fn refresh(&self) -> Result<(), UpstreamError> {
        self.store.update(|s| s.is_loading = true);
        let result = self.api.my_lists().await;
        self.store.update(|s| {
            s.is_loading = false;
            match &result {
                Ok(lists) => s.rebuild(lists.clone()),
                // Signed out: nothing is a favorite.
                Err(e) if e.is_unauthorized() => s.rebuild(Vec::new()),
                Err(_) => {}
            }
        });
        result.map(|_| ())
    }

    pub async fn toggle_favorite(
        &self,
        product_id: &str,
        force_list_id: Option<&str>,
    ) -> ToggleOutcome {
        let current = self.store.with(|s| s.index.get(product_id).cloned());
        if let Some(list_id) = current {
            return self.remove(product_id, list_id).await;
        }

        if let Some(list_id) = force_list_id {
            return self.add_to_list(product_id, list_id).await;
        }

        if !self.store.with(FavoritesState::has_custom_lists) {
            return self.add_to_default(product_id).await;
        }

        self.open_picker(product_id).await
    }

    /// Show the list picker for `product_id`. With no custom lists there is
    /// nothing to pick, so the product goes to the default list instead.
    pub async fn open_picker(&self, product_id: &str) -> ToggleOutcome {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Could not refresh favorites before picking");
        }

        if !self.store.with(FavoritesState::has_custom_lists) {
            return self.add_to_default(product_id).await;
        }

        let product_id = product_id.to_string();
        self.store.update(|s| s.picker = Some(product_id));
        ToggleOutcome::PickerOpened
    }

    /// Confirm the picker selection.
    pub async fn choose_list(&self, list_id: &str) -> ToggleOutcome {
        let Some(product_id) = self.store.update(|s| s.picker.take()) else {
            return ToggleOutcome::Failed;
        };
        self.add_to_list(&product_id, list_id).await
    }

    pub fn close_picker(&self) {
        self.store.update(|s| s.picker = None);
    }

    /// Create a list. If the picker is open, its product goes into the new
    /// list and the picker closes; the outcome of that add is returned.
    pub async fn create_list(&self, name: &str) -> Result<Option<ToggleOutcome>, UpstreamError> {
        let name = name.trim();
        let created = match self.api.create_list(name).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(error = %e, "Creating favorites list failed");
                if self.policy == FailurePolicy::Toast {
                    self.toaster.error(FAILURE_MESSAGE);
                }
                return Err(e);
            }
        };
        self.refresh().await?;

        let list_id = created.map(|l| l.id).or_else(|| {
            self.store
                .with(|s| s.lists.iter().find(|l| l.name == name).map(|l| l.id.clone()))
        });
        if self.store.with(|s| s.picker.is_none()) {
            return Ok(None);
        }
        match list_id {
            Some(list_id) => Ok(Some(self.choose_list(&list_id).await)),
            None => {
                tracing::warn!(name, "Created favorites list not found after refresh");
                Ok(Some(ToggleOutcome::Failed))
            }
        }
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<(), UpstreamError> {
        let owned = list_id.to_string();
        let snapshot = self.store.snapshot();
        Command::new(
            "favorites.delete_list",
            self.api.delete_list(list_id).boxed_local(),
            FAILURE_MESSAGE,
        )
        .optimistic(move |s: &mut FavoritesState| {
            let remaining = s.lists.iter().filter(|l| l.id != owned).cloned().collect();
            s.rebuild(remaining);
        })
        .reconcile(self.refresh().boxed_local())
        .revert(move |s: &mut FavoritesState| *s = snapshot)
        .run(&self.store, self.policy, &self.toaster)
        .await
    }

    async fn remove(&self, product_id: &str, list_id: String) -> ToggleOutcome {
        let pid = product_id.to_string();
        let restore = (pid.clone(), list_id.clone());
        let result = Command::new(
            "favorites.remove",
            self.api.remove_from_list(&list_id, product_id).boxed_local(),
            FAILURE_MESSAGE,
        )
        .optimistic(move |s: &mut FavoritesState| {
            s.index.remove(&pid);
        })
        .reconcile(self.refresh().boxed_local())
        .revert(move |s: &mut FavoritesState| {
            s.index.insert(restore.0, restore.1);
        })
        .run(&self.store, self.policy, &self.toaster)
        .await;

        match result {
            Ok(()) => {
                self.toaster.success(REMOVED_MESSAGE);
                ToggleOutcome::Removed { list_id }
            }
            Err(_) => ToggleOutcome::Failed,
        }
    }

    async fn add_to_list(&self, product_id: &str, list_id: &str) -> ToggleOutcome {
        let request = self.api.add_to_list(list_id, product_id).boxed_local();
        self.add(product_id, Destination::List(list_id.to_string()), request)
            .await
    }

    async fn add_to_default(&self, product_id: &str) -> ToggleOutcome {
        let request = self.api.add_to_default(product_id).boxed_local();
        self.add(product_id, Destination::Default, request).await
    }

    async fn add(
        &self,
        product_id: &str,
        destination: Destination,
        request: futures_util::future::LocalBoxFuture<'_, Result<(), UpstreamError>>,
    ) -> ToggleOutcome {
        let list_id = match &destination {
            Destination::Default => self.store.with(|s| s.default_list().map(|l| l.id.clone())),
            Destination::List(id) => Some(id.clone()),
        };
        let pid = product_id.to_string();
        let revert_pid = pid.clone();
        let result = Command::new("favorites.add", request, FAILURE_MESSAGE)
            .optimistic(move |s: &mut FavoritesState| {
                // The default list may not exist until the first add.
                if let Some(list_id) = list_id {
                    s.index.insert(pid, list_id);
                }
            })
            .reconcile(self.refresh().boxed_local())
            .revert(move |s: &mut FavoritesState| {
                s.index.remove(&revert_pid);
            })
            .run(&self.store, self.policy, &self.toaster)
            .await;

        if result.is_err() {
            return ToggleOutcome::Failed;
        }

        // Named from the refreshed lists.
        let list_name = match &destination {
            Destination::Default => Some(DEFAULT_FAVORITE_LIST.to_string()),
            Destination::List(id) => self.store.with(|s| s.list_name(id)),
        };
        let message = match &list_name {
            Some(name) => format!("Товар додано до «{}»", name),
            None => ADDED_UNNAMED_MESSAGE.to_string(),
        };
        self.toaster.success(message);
        ToggleOutcome::Added { list_name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory favorites backend that records every mutating call.
    #[derive(Default)]
    struct FakeFavorites {
        lists: RefCell<Vec<FavoriteList>>,
        calls: RefCell<Vec<String>>,
        fail_mutations: bool,
        fail_adds: Cell<bool>,
    }

    impl FakeFavorites {
        fn with_lists(lists: Vec<FavoriteList>) -> Self {
            Self {
                lists: RefCell::new(lists),
                ..Default::default()
            }
        }

        fn mutation_calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn check_add(&self) -> Result<(), UpstreamError> {
            if self.fail_adds.get() {
                Err(UpstreamError::Transport("connection reset".to_string()))
            } else {
                self.check()
            }
        }

        fn check(&self) -> Result<(), UpstreamError> {
            if self.fail_mutations {
                Err(UpstreamError::Status {
                    status: 500,
                    message: "fail".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn list(id: &str, name: &str, products: &[&str]) -> FavoriteList {
        FavoriteList {
            id: id.to_string(),
            user_id: Some("u1".to_string()),
            name: name.to_string(),
            products: products.iter().map(|p| p.to_string()).collect(),
        }
    }

    impl FavoritesApi for FakeFavorites {
        async fn my_lists(&self) -> Result<Vec<FavoriteList>, UpstreamError> {
            Ok(self.lists.borrow().clone())
        }

        async fn add_to_default(&self, product_id: &str) -> Result<(), UpstreamError> {
            self.calls.borrow_mut().push(format!("default:{product_id}"));
            self.check_add()?;
            let mut lists = self.lists.borrow_mut();
            match lists.iter_mut().find(|l| l.is_default()) {
                Some(default) => default.products.push(product_id.to_string()),
                None => lists.push(list("def", DEFAULT_FAVORITE_LIST, &[product_id])),
            }
            Ok(())
        }

        async fn add_to_list(&self, list_id: &str, product_id: &str) -> Result<(), UpstreamError> {
            self.calls.borrow_mut().push(format!("add:{list_id}:{product_id}"));
            self.check_add()?;
            if let Some(l) = self.lists.borrow_mut().iter_mut().find(|l| l.id == list_id) {
                l.products.push(product_id.to_string());
            }
            Ok(())
        }

        async fn remove_from_list(
            &self,
            list_id: &str,
            product_id: &str,
        ) -> Result<(), UpstreamError> {
            self.calls.borrow_mut().push(format!("remove:{list_id}:{product_id}"));
            self.check()?;
            if let Some(l) = self.lists.borrow_mut().iter_mut().find(|l| l.id == list_id) {
                l.products.retain(|p| p != product_id);
            }
            Ok(())
        }

        async fn create_list(&self, name: &str) -> Result<Option<FavoriteList>, UpstreamError> {
            self.calls.borrow_mut().push(format!("create:{name}"));
            self.check()?;
            let created = list(&format!("l-{name}"), name, &[]);
            self.lists.borrow_mut().push(created.clone());
            Ok(Some(created))
        }

        async fn delete_list(&self, list_id: &str) -> Result<(), UpstreamError> {
            self.calls.borrow_mut().push(format!("delete:{list_id}"));
            self.check()?;
            self.lists.borrow_mut().retain(|l| l.id != list_id);
            Ok(())
        }
    }

    async fn service(lists: Vec<FavoriteList>) -> FavoritesService<FakeFavorites> {
        let service = FavoritesService::new(FakeFavorites::with_lists(lists), Toaster::new());
        service.refresh().await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_product_in_a_list_is_removed_not_moved() {
        let service = service(vec![
            list("def", DEFAULT_FAVORITE_LIST, &[]),
            list("a", "Подарунки", &["p1"]),
            list("b", "Кухня", &[]),
        ])
        .await;
        assert!(service.is_in_favorites("p1"));

        let outcome = service.toggle_favorite("p1", Some("b")).await;

        assert_eq!(outcome, ToggleOutcome::Removed { list_id: "a".to_string() });
        assert_eq!(service.api().mutation_calls(), vec!["remove:a:p1"]);
        assert!(!service.is_in_favorites("p1"));
        assert!(service.toaster.messages().contains(&REMOVED_MESSAGE.to_string()));

        // Every product sits in at most one list.
        let lists = service.store().snapshot().lists;
        let holders = lists.iter().filter(|l| l.contains("p1")).count();
        assert_eq!(holders, 0);
    }

    #[tokio::test]
    async fn test_default_list_used_without_picker() {
        let service = service(vec![list("def", DEFAULT_FAVORITE_LIST, &[])]).await;

        let outcome = service.toggle_favorite("p7", None).await;

        assert_eq!(
            outcome,
            ToggleOutcome::Added {
                list_name: Some(DEFAULT_FAVORITE_LIST.to_string())
            }
        );
        assert_eq!(service.api().mutation_calls(), vec!["default:p7"]);
        assert!(service.store().snapshot().picker.is_none());
        assert!(service.is_in_favorites("p7"));
    }

    #[tokio::test]
    async fn test_picker_required_when_custom_lists_exist() {
        let service = service(vec![
            list("def", DEFAULT_FAVORITE_LIST, &[]),
            list("a", "Подарунки", &[]),
        ])
        .await;

        let outcome = service.toggle_favorite("p3", None).await;

        assert_eq!(outcome, ToggleOutcome::PickerOpened);
        assert_eq!(service.store().snapshot().picker.as_deref(), Some("p3"));
        assert!(service.api().mutation_calls().is_empty());

        let outcome = service.choose_list("a").await;
        assert_eq!(
            outcome,
            ToggleOutcome::Added {
                list_name: Some("Подарунки".to_string())
            }
        );
        assert_eq!(service.api().mutation_calls(), vec!["add:a:p3"]);
        assert!(service.store().snapshot().picker.is_none());
        assert!(service
            .toaster
            .messages()
            .contains(&"Товар додано до «Подарунки»".to_string()));
    }

    #[tokio::test]
    async fn test_forced_list_skips_picker() {
        let service = service(vec![list("a", "Подарунки", &[])]).await;

        let outcome = service.toggle_favorite("p4", Some("a")).await;

        assert!(matches!(outcome, ToggleOutcome::Added { .. }));
        assert_eq!(service.api().mutation_calls(), vec!["add:a:p4"]);
    }

    #[tokio::test]
    async fn test_failed_add_reverts_and_toasts() {
        let api = FakeFavorites {
            lists: RefCell::new(vec![list("def", DEFAULT_FAVORITE_LIST, &[])]),
            fail_mutations: true,
            ..Default::default()
        };
        let service = FavoritesService::new(api, Toaster::new());
        service.refresh().await.unwrap();

        let outcome = service.toggle_favorite("p9", None).await;

        assert_eq!(outcome, ToggleOutcome::Failed);
        assert!(!service.is_in_favorites("p9"));
        assert_eq!(service.toaster.messages(), vec![FAILURE_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_create_list_takes_pending_product() {
        let service = service(vec![
            list("def", DEFAULT_FAVORITE_LIST, &[]),
            list("a", "Подарунки", &[]),
        ])
        .await;
        service.toggle_favorite("p5", None).await;

        let outcome = service.create_list("  Нове ").await.unwrap();

        assert_eq!(
            outcome,
            Some(ToggleOutcome::Added {
                list_name: Some("Нове".to_string())
            })
        );
        assert_eq!(
            service.api().mutation_calls(),
            vec!["create:Нове", "add:l-Нове:p5"]
        );
        assert!(service.is_in_favorites("p5"));
        assert!(service.store().snapshot().picker.is_none());
    }

    #[tokio::test]
    async fn test_delete_list_drops_its_products() {
        let service = service(vec![list("a", "Подарунки", &["p1", "p2"])]).await;

        service.delete_list("a").await.unwrap();

        assert!(!service.is_in_favorites("p1"));
        assert!(service.store().snapshot().lists.is_empty());
    }

    /// Each product is held by at most one list, upstream and locally.
    fn assert_single_holder(service: &FavoritesService<FakeFavorites>, products: &[&str]) {
        let remote = service.api().lists.borrow().clone();
        let local = service.store().snapshot();
        for product in products {
            let holders = remote.iter().filter(|l| l.contains(product)).count();
            assert!(holders <= 1, "{product} is in {holders} lists");
            assert_eq!(local.index.contains_key(*product), holders == 1);
        }
    }

    #[tokio::test]
    async fn test_toggle_sequence_keeps_one_list_per_product() {
        let products = ["p1", "p2", "p3"];
        let service = service(vec![list("def", DEFAULT_FAVORITE_LIST, &[])]).await;

        service.toggle_favorite("p1", None).await;
        assert_single_holder(&service, &products);

        assert_eq!(service.create_list("Подарунки").await.unwrap(), None);
        let gifts = "l-Подарунки";

        service.toggle_favorite("p2", Some(gifts)).await;
        assert_single_holder(&service, &products);

        // Already in the default list: a forced toggle removes, never moves.
        let outcome = service.toggle_favorite("p1", Some(gifts)).await;
        assert!(matches!(outcome, ToggleOutcome::Removed { .. }));
        assert_single_holder(&service, &products);

        assert_eq!(service.toggle_favorite("p3", None).await, ToggleOutcome::PickerOpened);
        service.choose_list("def").await;
        assert_single_holder(&service, &products);

        service.toggle_favorite("p2", None).await;
        assert_single_holder(&service, &products);

        service.toggle_favorite("p1", Some(gifts)).await;
        assert_single_holder(&service, &products);

        service.toggle_favorite("p3", Some(gifts)).await;
        assert_single_holder(&service, &products);

        let state = service.store().snapshot();
        assert_eq!(state.index.get("p1").map(String::as_str), Some(gifts));
        assert!(!state.index.contains_key("p2"));
        assert!(!state.index.contains_key("p3"));
    }

    #[tokio::test]
    async fn test_forced_list_is_named_after_refresh() {
        let service = service(vec![list("def", DEFAULT_FAVORITE_LIST, &[])]).await;
        // Created elsewhere; this service has not seen it yet.
        service.api().lists.borrow_mut().push(list("x", "Нове", &[]));

        let outcome = service.toggle_favorite("p1", Some("x")).await;

        assert_eq!(
            outcome,
            ToggleOutcome::Added {
                list_name: Some("Нове".to_string())
            }
        );
        assert!(service
            .toaster
            .messages()
            .contains(&"Товар додано до «Нове»".to_string()));

        let outcome = service.toggle_favorite("p2", Some("gone")).await;
        assert_eq!(outcome, ToggleOutcome::Added { list_name: None });
        assert!(service
            .toaster
            .messages()
            .contains(&ADDED_UNNAMED_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_create_list_reports_failed_add() {
        let service = service(vec![
            list("def", DEFAULT_FAVORITE_LIST, &[]),
            list("a", "Подарунки", &[]),
        ])
        .await;
        service.toggle_favorite("p5", None).await;
        service.api().fail_adds.set(true);

        let outcome = service.create_list("Нове").await.unwrap();

        assert_eq!(outcome, Some(ToggleOutcome::Failed));
        assert!(!service.is_in_favorites("p5"));
        assert!(service.store().snapshot().lists.iter().any(|l| l.name == "Нове"));
    }
}
