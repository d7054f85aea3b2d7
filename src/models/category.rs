// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Category tree model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A storefront category. Roots have no `parent_id`; `children` is only
/// populated on full-tree responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Category {
    #[serde(deserialize_with = "super::de::id")]
    pub id: String,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "super::de::opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

impl Category {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first search through this node and its descendants.
    pub fn find(&self, id: &str) -> Option<&Category> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Grandchildren grouped under this root, as the flyout subpanel shows them.
    pub fn grandchild_count(&self) -> usize {
        self.children.iter().map(|c| c.children.len()).sum()
    }
}

/// Find a category anywhere in a forest of roots.
pub fn find_in_tree<'a>(roots: &'a [Category], id: &str) -> Option<&'a Category> {
    roots.iter().find_map(|root| root.find(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: None,
            children: vec![],
        }
    }

    #[test]
    fn test_find_in_tree() {
        let mut electronics = leaf("1", "Електроніка");
        let mut phones = leaf("2", "Телефони");
        phones.children.push(leaf("3", "Смартфони"));
        electronics.children.push(phones);
        let roots = vec![electronics, leaf("9", "Одяг")];

        assert_eq!(find_in_tree(&roots, "3").map(|c| c.name.as_str()), Some("Смартфони"));
        assert!(find_in_tree(&roots, "404").is_none());
        assert_eq!(roots[0].grandchild_count(), 1);
        assert!(!roots[1].has_children());
    }
}
