// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Breadcrumb resolution for category pages.
//!
//! The upstream only exposes "get category by id", so the ancestor chain is
//! walked one `parentId` at a time. Each hop depends on the previous answer.

use crate::models::Category;
use std::future::Future;

/// Upper bound on `parentId` hops. Protects against cycles and runaway
/// depth in upstream data.
pub const MAX_BREADCRUMB_HOPS: usize = 20;

/// Resolve the chain ending at `leaf_id`, returned root first.
///
/// `fetch` returns `Ok(None)` for an unknown id, which ends the walk. An
/// error on the leaf itself is returned; an error further up truncates the
/// chain at the last ancestor that resolved.
pub async fn resolve_chain<F, Fut, E>(leaf_id: &str, mut fetch: F) -> Result<Vec<Category>, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Option<Category>, E>>,
    E: std::fmt::Display,
{
    let mut chain = Vec::new();
    let mut next = Some(leaf_id.to_string());

    for _ in 0..MAX_BREADCRUMB_HOPS {
        let Some(id) = next.take() else {
            break;
        };
        match fetch(id.clone()).await {
            Ok(Some(category)) => {
                next = category.parent_id.clone();
                chain.push(category);
            }
            Ok(None) => break,
            Err(e) if chain.is_empty() => return Err(e),
            Err(e) => {
                tracing::warn!(category_id = %id, error = %e, "Breadcrumb ancestor lookup failed");
                break;
            }
        }
    }

    if next.is_some() && chain.len() == MAX_BREADCRUMB_HOPS {
        tracing::warn!(
            leaf_id,
            hops = MAX_BREADCRUMB_HOPS,
            "Breadcrumb chain truncated at hop limit"
        );
    }

    chain.reverse();
    Ok(chain)
}
