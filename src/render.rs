/// Rendered table output
///
/// The render projection is what a front end draws: header cells for the
/// visible columns, the current page's rows with rendered cells, and the
/// pager/selection footer. Every type serializes with serde so the whole
/// table can be shipped as JSON.

use serde::Serialize;

use crate::column::{CellContext, HeaderContext};
use crate::grid::{page_selection_of, DataGrid};
use crate::state::{PageSelection, RowId, SortOrder};
use crate::value::CellValue;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedHeader {
    pub key: String,
    pub label: String,
    pub sort: Option<SortOrder>,
    pub sort_index: Option<usize>,
    pub can_sort: bool,
    pub can_hide: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedCell {
    pub key: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    pub row_id: RowId,
    pub selected: bool,
    pub cells: Vec<RenderedCell>,
}

/// Table body. An empty filtered set is reported as `NoResults` so the
/// caller can show its own placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "rows")]
pub enum TableBody {
    Rows(Vec<RenderedRow>),
    NoResults,
}

impl TableBody {
    pub fn rows(&self) -> &[RenderedRow] {
        match self {
            TableBody::Rows(rows) => rows,
            TableBody::NoResults => &[],
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, TableBody::NoResults)
    }
}

/// Footer state: pager buttons and "N of M row(s) selected".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerInfo {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub can_previous: bool,
    pub can_next: bool,
    /// Selected rows that pass the current filters.
    pub selected_rows: usize,
    /// Rows that pass the current filters.
    pub filtered_rows: usize,
    pub page_selection: PageSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTable {
    pub headers: Vec<RenderedHeader>,
    pub body: TableBody,
    pub pager: PagerInfo,
}

impl<T> DataGrid<T> {
    /// Render the current page. Runs the pipeline once and reads every
    /// figure off that single derivation.
    pub fn render(&self) -> RenderedTable {
        let state = self.state();
        let derived = self.derive();
        let is_selected = |id: RowId| state.selection.contains(id);
        let page_selection = page_selection_of(&derived, is_selected);

        let visible: Vec<_> = self.visible_columns().collect();

        let headers = visible
            .iter()
            .map(|column| {
                let ctx = HeaderContext {
                    key: column.key(),
                    sort: state.sorting.order_of(column.key()),
                    sort_index: state.sorting.precedence_of(column.key()),
                    page_selection,
                };
                RenderedHeader {
                    key: column.key().to_string(),
                    label: column.render_header(&ctx),
                    sort: ctx.sort,
                    sort_index: ctx.sort_index,
                    can_sort: column.can_sort(),
                    can_hide: column.can_hide(),
                }
            })
            .collect();

        let body = if derived.is_empty() {
            TableBody::NoResults
        } else {
            let rows = derived
                .page()
                .iter()
                .map(|&i| {
                    let row = &self.rows()[i];
                    let row_id = RowId(i);
                    let selected = is_selected(row_id);
                    let cells = visible
                        .iter()
                        .map(|column| {
                            let value = column.value(row).unwrap_or(CellValue::Null);
                            let ctx = CellContext {
                                row,
                                row_id,
                                value: &value,
                                selected,
                            };
                            RenderedCell {
                                key: column.key().to_string(),
                                text: column.render_cell(&ctx),
                            }
                        })
                        .collect();
                    RenderedRow {
                        row_id,
                        selected,
                        cells,
                    }
                })
                .collect();
            TableBody::Rows(rows)
        };

        let filtered_rows = derived.rows.len();
        let page_count = derived.page_count();
        let page_index = derived.pagination.page_index;
        let pager = PagerInfo {
            page_index,
            page_count,
            page_size: derived.pagination.page_size,
            can_previous: page_index > 0,
            can_next: page_index + 1 < page_count,
            selected_rows: derived.rows.iter().filter(|&&i| is_selected(RowId(i))).count(),
            filtered_rows,
            page_selection,
        };

        RenderedTable { headers, body, pager }
    }
}
