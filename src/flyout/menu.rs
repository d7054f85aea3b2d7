// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Category data behind the flyout.

use crate::error::UpstreamError;
use crate::models::Category;

/// Shown instead of the menu when there is nothing to show.
pub const NOT_FOUND_PLACEHOLDER: &str = "Категорії не знайдено";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CategoryMenu {
    #[default]
    Loading,
    Ready(Vec<Category>),
    NotFound,
}

impl CategoryMenu {
    /// Build the menu from a tree fetch. Failures are not retried.
    pub fn from_fetch(result: Result<Vec<Category>, UpstreamError>) -> Self {
        match result {
            Ok(roots) if roots.is_empty() => {
                tracing::debug!("Category tree is empty");
                CategoryMenu::NotFound
            }
            Ok(roots) => CategoryMenu::Ready(roots),
            Err(e) => {
                tracing::warn!(error = %e, "Category tree fetch failed");
                CategoryMenu::NotFound
            }
        }
    }

    pub fn roots(&self) -> &[Category] {
        match self {
            CategoryMenu::Ready(roots) => roots,
            _ => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            CategoryMenu::NotFound => Some(NOT_FOUND_PLACEHOLDER),
            _ => None,
        }
    }

    /// Root category by id, for the subpanel.
    pub fn root(&self, id: &str) -> Option<&Category> {
        self.roots().iter().find(|c| c.id == id)
    }
}
