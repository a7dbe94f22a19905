//! Derivation pipeline: filter, then sort, then paginate.
//!
//! Every stage is a pure function over row indices. The source rows are only
//! read, never reordered or copied; each stage returns a fresh index vector
//! (or a slice of one) that maps view positions back to source rows.

use std::cmp::Ordering;

use crate::column::{ColumnDef, ColumnSet};
use crate::state::{FilterState, GridState, PaginationState, SortOrder, SortState};
use crate::value::CellValue;

/// Result of running the whole pipeline once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived {
    /// Filtered and sorted source indices.
    pub rows: Vec<usize>,
    pub pagination: PaginationState,
}

impl Derived {
    /// Source indices of the current page.
    pub fn page(&self) -> &[usize] {
        paginate(&self.rows, &self.pagination)
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Source indices of rows passing every active column filter (logical AND),
/// in source order. Filters naming unknown or data-less columns are ignored.
pub fn filter_rows<T>(rows: &[T], columns: &ColumnSet<T>, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(&ColumnDef<T>, &str, String)> = filters
        .iter()
        .filter(|(_, needle)| !needle.is_empty())
        .filter_map(|(key, needle)| {
            let column = columns.get(key).filter(|c| c.has_data());
            if column.is_none() {
                log::trace!("ignoring filter on column '{}' without data", key);
            }
            column.map(|c| (c, needle, needle.to_lowercase()))
        })
        .collect();

    (0..rows.len())
        .filter(|&i| {
            active.iter().all(|(column, needle, needle_lower)| {
                let value = column.value(&rows[i]).unwrap_or(CellValue::Null);
                column.matches(&value, needle, needle_lower)
            })
        })
        .collect()
}

/// Values without a usable sort position: nulls and NaN.
fn sorts_last(value: &CellValue) -> bool {
    match value {
        CellValue::Null => true,
        CellValue::Float(f) => f.is_nan(),
        _ => false,
    }
}

/// Compare two values under one sort key. Nulls and NaN go last in both
/// directions; descending reverses the comparison, never the sequence, so
/// ties stay in their incoming order.
fn compare_values<T>(a: &CellValue, b: &CellValue, column: &ColumnDef<T>, order: SortOrder) -> Ordering {
    match (sorts_last(a), sorts_last(b)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let base = column.compare(a, b);
    match order {
        SortOrder::Ascending => base,
        SortOrder::Descending => base.reverse(),
    }
}

/// Stable sort of `indices` by the sort keys in precedence order. Keys naming
/// unknown or data-less columns are skipped.
pub fn sort_rows<T>(rows: &[T], columns: &ColumnSet<T>, sort: &SortState, indices: Vec<usize>) -> Vec<usize> {
    let keys: Vec<(&ColumnDef<T>, SortOrder)> = sort
        .keys()
        .iter()
        .filter_map(|k| {
            columns
                .get(&k.column)
                .filter(|c| c.has_data())
                .map(|c| (c, k.order))
        })
        .collect();

    if keys.is_empty() {
        return indices;
    }

    // Read each sort value once instead of on every comparison
    let mut decorated: Vec<(usize, Vec<CellValue>)> = indices
        .into_iter()
        .map(|i| {
            let values = keys
                .iter()
                .map(|(column, _)| column.value(&rows[i]).unwrap_or(CellValue::Null))
                .collect();
            (i, values)
        })
        .collect();

    // slice::sort_by is stable
    decorated.sort_by(|(_, a), (_, b)| {
        for (pos, (column, order)) in keys.iter().enumerate() {
            let cmp = compare_values(&a[pos], &b[pos], *column, *order);
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });

    decorated.into_iter().map(|(i, _)| i).collect()
}

/// The current page's slice of `indices`; empty when the page is out of range.
pub fn paginate<'a>(indices: &'a [usize], pagination: &PaginationState) -> &'a [usize] {
    &indices[pagination.range(indices.len())]
}

/// Run filter → sort for the given state and carry the pager along.
pub fn derive<T>(rows: &[T], columns: &ColumnSet<T>, state: &GridState) -> Derived {
    let filtered = filter_rows(rows, columns, &state.filters);
    let sorted = sort_rows(rows, columns, &state.sorting, filtered);
    Derived {
        rows: sorted,
        pagination: state.pagination,
    }
}
