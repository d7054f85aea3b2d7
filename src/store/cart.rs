// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cart service: drawer state plus an optimistic mirror of the remote cart.

use super::api::CartApi;
use super::command::{Command, FailurePolicy, Toaster};
use super::Store;
use crate::error::UpstreamError;
use crate::models::CartItem;
use futures_util::FutureExt;

const FAILURE_MESSAGE: &str = "Не вдалося оновити кошик. Спробуйте ще раз.";
const ADDED_MESSAGE: &str = "Товар додано до кошика";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub is_open: bool,
    pub is_loading: bool,
}

impl CartState {
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, i| total.saturating_add(i.quantity))
    }

    /// Sum of the priced lines. Lines without a price do not count.
    pub fn total_price(&self) -> f64 {
        self.items.iter().filter_map(CartItem::line_total).sum()
    }

    fn upsert(&mut self, item: CartItem) {
        match self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }
}

pub struct CartService<A> {
    api: A,
    store: Store<CartState>,
    toaster: Toaster,
    policy: FailurePolicy,
}

impl<A: CartApi> CartService<A> {
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

    pub fn store(&self) -> &Store<CartState> {
        &self.store
    }

    pub fn open_drawer(&self) {
        self.store.update(|s| s.is_open = true);
    }

    pub fn close_drawer(&self) {
        self.store.update(|s| s.is_open = false);
    }

    pub fn toggle_drawer(&self) {
        self.store.update(|s| s.is_open = !s.is_open);
    }

    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.store.with(|s| s.contains(product_id))
    }

    pub fn total_quantity(&self) -> u32 {
        self.store.with(CartState::total_quantity)
    }

    pub fn total_price(&self) -> f64 {
        self.store.with(CartState::total_price)
    }

    pub async fn refresh(&self) -> Result<(), UpstreamError> {
        self.store.update(|s| s.is_loading = true);
        let result = self.api.cart().await;
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

    /// Add `item` (its quantity on top of whatever is already in the cart).
    /// The product shows as in-cart before the upstream confirms.
    pub async fn add(&self, item: CartItem) -> Result<(), UpstreamError> {
        if item.quantity == 0 {
            return Ok(());
        }
        let before = self.store.with(|s| s.items.clone());
        let request = self.api.add(&item.product_id, item.quantity).boxed_local();
        let optimistic = item.clone();

        Command::new("cart.add", request, FAILURE_MESSAGE)
            .optimistic(move |s: &mut CartState| s.upsert(optimistic))
            .reconcile(self.refresh().boxed_local())
            .revert(move |s: &mut CartState| s.items = before)
            .run(&self.store, self.policy, &self.toaster)
            .await?;

        self.toaster.success(ADDED_MESSAGE);
        Ok(())
    }

    /// Set the quantity of a line. Zero removes it.
    pub async fn update_quantity(&self, product_id: &str, quantity: u32) -> Result<(), UpstreamError> {
        if quantity == 0 {
            return self.remove(product_id).await;
        }
        let before = self.store.with(|s| s.items.clone());
        let pid = product_id.to_string();

        Command::new(
            "cart.update",
            self.api.update(product_id, quantity).boxed_local(),
            FAILURE_MESSAGE,
        )
        .optimistic(move |s: &mut CartState| {
            if let Some(line) = s.items.iter_mut().find(|i| i.product_id == pid) {
                line.quantity = quantity;
            }
        })
        .reconcile(self.refresh().boxed_local())
        .revert(move |s: &mut CartState| s.items = before)
        .run(&self.store, self.policy, &self.toaster)
        .await
    }

    pub async fn remove(&self, product_id: &str) -> Result<(), UpstreamError> {
        let before = self.store.with(|s| s.items.clone());
        let pid = product_id.to_string();

        Command::new(
            "cart.remove",
            self.api.remove(product_id).boxed_local(),
            FAILURE_MESSAGE,
        )
        .optimistic(move |s: &mut CartState| s.items.retain(|i| i.product_id != pid))
        .reconcile(self.refresh().boxed_local())
        .revert(move |s: &mut CartState| s.items = before)
        .run(&self.store, self.policy, &self.toaster)
        .await
    }

    pub async fn clear(&self) -> Result<(), UpstreamError> {
        let before = self.store.with(|s| s.items.clone());

        Command::new("cart.clear", self.api.clear().boxed_local(), FAILURE_MESSAGE)
            .optimistic(|s: &mut CartState| s.items.clear())
            .reconcile(self.refresh().boxed_local())
            .revert(move |s: &mut CartState| s.items = before)
            .run(&self.store, self.policy, &self.toaster)
            .await
    }
}
