// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Column layout for the subcategory panel.

const PANEL_VERTICAL_PADDING: f64 = 48.0;
const ITEM_HEIGHT: f64 = 72.0;
const ITEM_SPACING: f64 = 1.2;
const MAX_ITEMS_PER_COLUMN: usize = 4;
pub const COLUMN_WIDTH: f64 = 380.0;
pub const MAX_VISIBLE_COLUMNS: usize = 5;
const PANEL_HORIZONTAL_PADDING: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubpanelLayout {
    pub items_per_column: usize,
    pub columns: usize,
    /// Panel width in CSS pixels
    pub width: f64,
}

/// Lay out `item_count` subcategories for a viewport `viewport_height` px
/// tall. Columns beyond [`MAX_VISIBLE_COLUMNS`] scroll horizontally.
pub fn subpanel_layout(item_count: usize, viewport_height: f64) -> SubpanelLayout {
    let fit = ((viewport_height - PANEL_VERTICAL_PADDING) / (ITEM_HEIGHT * ITEM_SPACING)).floor();
    let items_per_column = if fit.is_finite() && fit > 0.0 {
        (fit as usize).clamp(1, MAX_ITEMS_PER_COLUMN)
    } else {
        1
    };
    let columns = item_count.div_ceil(items_per_column);
    let width = columns.min(MAX_VISIBLE_COLUMNS) as f64 * COLUMN_WIDTH + PANEL_HORIZONTAL_PADDING;

    SubpanelLayout {
        items_per_column,
        columns,
        width,
    }
}
