// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Sell Point storefront backend-for-frontend.
//!
//! This crate serves the storefront's proxy API in front of the Sell Point
//! REST API, and provides the client-side state services (favorites, cart,
//! notifications) and the category flyout logic the storefront is built on.
//! The upstream API owns all business rules; everything here is a cache or
//! a pass-through.

pub mod config;
pub mod error;
pub mod flyout;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use config::Config;
use error::UpstreamError;
use services::{CategoryCache, UpstreamClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
    pub categories: CategoryCache,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, UpstreamError> {
        let upstream = UpstreamClient::new(&config.api_url, config.upstream_timeout)?;
        let categories = CategoryCache::new(config.category_tree_ttl);
        Ok(Self {
            config,
            upstream,
            categories,
        })
    }
}
