// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - upstream access and payload shaping.

pub mod breadcrumb;
pub mod category_cache;
pub mod normalize;
pub mod upstream;

pub use breadcrumb::{resolve_chain, MAX_BREADCRUMB_HOPS};
pub use category_cache::CategoryCache;
pub use upstream::UpstreamClient;
