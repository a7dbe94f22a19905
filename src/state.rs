/// Grid state slices
///
/// Sort, filter, visibility, selection and pagination are independent slices.
/// Each one only knows how to update itself; the grid decides which slices a
/// user action touches (for example, that a filter change rewinds the pager).

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::DEFAULT_PAGE_SIZE;

/// Identifier of a row: its index in the current source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

/// A single sort key specifying a column and order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Column key to sort by
    pub column: String,
    /// Sort order (ascending or descending)
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        SortKey {
            column: column.into(),
            order: SortOrder::Descending,
        }
    }
}

/// Ordered sort keys; position is precedence (primary first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Current order for a column, if it takes part in sorting.
    pub fn order_of(&self, column: &str) -> Option<SortOrder> {
        self.keys.iter().find(|k| k.column == column).map(|k| k.order)
    }

    /// Precedence of a column (0 = primary), if it takes part in sorting.
    pub fn precedence_of(&self, column: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.column == column)
    }

    /// Single-column toggle. The primary key cycles ascending → descending →
    /// removed; any other column becomes the sole key, ascending.
    /// Returns the column's order after the toggle.
    pub fn toggle(&mut self, column: &str) -> Option<SortOrder> {
        match self.keys.first().map(|k| k.order) {
            Some(order) if self.keys[0].column == column => match order {
                SortOrder::Ascending => {
                    self.keys[0].order = SortOrder::Descending;
                    Some(SortOrder::Descending)
                }
                SortOrder::Descending => {
                    self.keys.remove(0);
                    None
                }
            },
            _ => {
                self.keys = vec![SortKey::ascending(column)];
                Some(SortOrder::Ascending)
            }
        }
    }

    /// Multi-column toggle. A present column cycles in place, keeping its
    /// precedence; an absent one is appended as the lowest-precedence key.
    pub fn toggle_multi(&mut self, column: &str) -> Option<SortOrder> {
        match self.precedence_of(column) {
            Some(pos) => match self.keys[pos].order {
                SortOrder::Ascending => {
                    self.keys[pos].order = SortOrder::Descending;
                    Some(SortOrder::Descending)
                }
                SortOrder::Descending => {
                    self.keys.remove(pos);
                    None
                }
            },
            None => {
                self.keys.push(SortKey::ascending(column));
                Some(SortOrder::Ascending)
            }
        }
    }
}

/// Per-column filter text. Absent entries mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter for a column; an empty value removes the entry.
    /// Returns true when the stored state changed.
    pub fn set(&mut self, column: &str, value: &str) -> bool {
        if value.is_empty() {
            self.entries.remove(column).is_some()
        } else {
            let previous = self.entries.insert(column.to_string(), value.to_string());
            previous.as_deref() != Some(value)
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Column visibility; columns without an entry are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisibilityState {
    entries: BTreeMap<String, bool>,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, visible: bool) {
        self.entries.insert(column.to_string(), visible);
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.entries.get(column).copied().unwrap_or(true)
    }

    pub fn hidden(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, visible)| !**visible)
            .map(|(k, _)| k.as_str())
    }
}

/// Selected rows, keyed by source index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    rows: BTreeSet<RowId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.rows.contains(&row)
    }

    /// Flip a row's selection; returns the new selected flag.
    pub fn toggle(&mut self, row: RowId) -> bool {
        if self.rows.remove(&row) {
            false
        } else {
            self.rows.insert(row);
            true
        }
    }

    pub fn set(&mut self, row: RowId, selected: bool) {
        if selected {
            self.rows.insert(row);
        } else {
            self.rows.remove(&row);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().copied()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Drop ids that no longer index a row; returns how many were dropped.
    pub fn retain_below(&mut self, len: usize) -> usize {
        let before = self.rows.len();
        self.rows.retain(|id| id.0 < len);
        before - self.rows.len()
    }
}

/// How much of the current page is selected; drives a tri-state
/// "select page" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSelection {
    None,
    Some,
    All,
}

/// Pager cursor. `page_size` is never zero once validated by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(page_size: usize) -> Self {
        PaginationState {
            page_index: 0,
            page_size,
        }
    }

    /// Number of pages for `total` rows: ceil(total / page_size).
    pub fn page_count(&self, total: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total.div_ceil(self.page_size)
    }

    /// Clamp `index` into `[0, page_count - 1]`; 0 when there are no pages.
    pub fn clamp(&self, index: usize, total: usize) -> usize {
        match self.page_count(total) {
            0 => 0,
            pages => index.min(pages - 1),
        }
    }

    /// Half-open row range of the current page within `total` rows.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }
}

/// Every state slice of one grid instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridState {
    pub sorting: SortState,
    pub filters: FilterState,
    pub visibility: VisibilityState,
    pub selection: SelectionState,
    pub pagination: PaginationState,
}

impl GridState {
    pub fn with_page_size(page_size: usize) -> Self {
        GridState {
            pagination: PaginationState::new(page_size),
            ..Default::default()
        }
    }
}
