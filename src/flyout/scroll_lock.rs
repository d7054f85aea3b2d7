// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Page scroll lock while the flyout is open.
//!
//! Hiding the scrollbar shifts the page sideways, so its width is added to
//! the body's right padding. Inline styles present before locking are put
//! back exactly on unlock, including "not set".

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageElement {
    Html,
    Body,
}

const OVERFLOW: &str = "overflow";
const PADDING_RIGHT: &str = "padding-right";

/// Access to the document's inline styles.
pub trait PageStyles {
    fn inline_style(&self, element: PageElement, property: &str) -> Option<String>;
    /// `None` removes the inline declaration.
    fn set_inline_style(&mut self, element: PageElement, property: &str, value: Option<&str>);
    /// Width of the vertical scrollbar in px (0 for overlay scrollbars).
    fn scrollbar_width(&self) -> f64;
    /// Computed right padding of the body in px.
    fn body_padding_right(&self) -> f64;
}

/// In-memory page, for hosts without a DOM and for tests.
#[derive(Debug, Clone, Default)]
pub struct InlineStyles {
    styles: HashMap<(PageElement, String), String>,
    pub scrollbar_width: f64,
    pub body_padding_right: f64,
}

impl InlineStyles {
    pub fn with_scrollbar(scrollbar_width: f64) -> Self {
        Self {
            scrollbar_width,
            ..Self::default()
        }
    }
}

impl PageStyles for InlineStyles {
    fn inline_style(&self, element: PageElement, property: &str) -> Option<String> {
        self.styles.get(&(element, property.to_string())).cloned()
    }

    fn set_inline_style(&mut self, element: PageElement, property: &str, value: Option<&str>) {
        let key = (element, property.to_string());
        match value {
            Some(v) => {
                self.styles.insert(key, v.to_string());
            }
            None => {
                self.styles.remove(&key);
            }
        }
    }

    fn scrollbar_width(&self) -> f64 {
        self.scrollbar_width
    }

    fn body_padding_right(&self) -> f64 {
        self.body_padding_right
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Saved {
    html_overflow: Option<String>,
    body_overflow: Option<String>,
    body_padding_right: Option<String>,
}

#[derive(Debug, Default)]
pub struct ScrollLock {
    saved: Option<Saved>,
}

impl ScrollLock {
    pub fn is_locked(&self) -> bool {
        self.saved.is_some()
    }

    /// Lock page scrolling. Locking twice is a no-op.
    pub fn lock(&mut self, page: &mut impl PageStyles) {
        if self.saved.is_some() {
            return;
        }
        let saved = Saved {
            html_overflow: page.inline_style(PageElement::Html, OVERFLOW),
            body_overflow: page.inline_style(PageElement::Body, OVERFLOW),
            body_padding_right: page.inline_style(PageElement::Body, PADDING_RIGHT),
        };

        let scrollbar = page.scrollbar_width();
        page.set_inline_style(PageElement::Html, OVERFLOW, Some("hidden"));
        page.set_inline_style(PageElement::Body, OVERFLOW, Some("hidden"));
        if scrollbar > 0.0 {
            let padding = format!("{}px", page.body_padding_right() + scrollbar);
            page.set_inline_style(PageElement::Body, PADDING_RIGHT, Some(&padding));
        }
        self.saved = Some(saved);
    }

    pub fn unlock(&mut self, page: &mut impl PageStyles) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        page.set_inline_style(PageElement::Html, OVERFLOW, saved.html_overflow.as_deref());
        page.set_inline_style(PageElement::Body, OVERFLOW, saved.body_overflow.as_deref());
        page.set_inline_style(
            PageElement::Body,
            PADDING_RIGHT,
            saved.body_padding_right.as_deref(),
        );
    }
}
