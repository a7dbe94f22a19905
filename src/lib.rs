/// climate-grid - Generic tabular data grid
///
/// A headless data grid for list screens: column definitions over opaque
/// rows, per-column filtering, stable multi-key sorting, pagination, column
/// visibility, page-scoped row selection and CSV export. The grid never
/// mutates the rows it is given; every view is derived from them on demand.

pub mod value;
pub mod error;
pub mod config;
pub mod state;
pub mod column;
pub mod pipeline;
pub mod grid;
pub mod export;
pub mod render;
pub mod csv_export;

pub use value::CellValue;
pub use error::{ExportError, GridError, Result};
pub use config::GridOptions;
pub use state::{
    FilterState, GridState, PageSelection, PaginationState, RowId, SelectionState, SortKey, SortOrder, SortState,
    VisibilityState,
};
pub use column::{comparators, Accessor, CellContext, ColumnDef, ColumnSet, HeaderContext, Record};
pub use pipeline::Derived;
pub use grid::DataGrid;
pub use export::{ExportRow, ExportSnapshot};
pub use render::{PagerInfo, RenderedCell, RenderedHeader, RenderedRow, RenderedTable, TableBody};
pub use csv_export::{CsvExporter, ExportOutcome};


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: Vec<(String, i64)>, page_size: usize) -> DataGrid<(String, i64)> {
        let columns = vec![
            ColumnDef::computed("name", |r: &(String, i64)| r.0.as_str().into()),
            ColumnDef::computed("n", |r: &(String, i64)| r.1.into()),
        ];
        let options = GridOptions::default().with_page_size(page_size);
        DataGrid::with_options(columns, rows, &options).unwrap()
    }

    fn rows() -> impl Strategy<Value = Vec<(String, i64)>> {
        prop::collection::vec(("[a-cA-C]{0,4}", 0i64..5), 0..60)
    }

    proptest! {
        #[test]
        fn filter_keeps_only_matching_rows(rows in rows(), needle in "[a-cA-C]{1,2}") {
            let mut g = grid(rows.clone(), 10);
            g.set_filter("name", &needle).unwrap();
            let kept = g.derive().rows;

            let lower = needle.to_lowercase();
            let expected: Vec<usize> = (0..rows.len())
                .filter(|&i| rows[i].0.to_lowercase().contains(&lower))
                .collect();
            prop_assert_eq!(kept, expected);
        }

        #[test]
        fn sort_is_stable(rows in rows()) {
            let mut g = grid(rows.clone(), 10);
            g.toggle_sort("n").unwrap();
            let sorted = g.derive().rows;

            let mut expected: Vec<usize> = (0..rows.len()).collect();
            expected.sort_by_key(|&i| rows[i].1);
            prop_assert_eq!(&sorted, &expected);

            g.toggle_sort("n").unwrap();
            let desc = g.derive().rows;
            let mut expected: Vec<usize> = (0..rows.len()).collect();
            expected.sort_by(|&a, &b| rows[b].1.cmp(&rows[a].1));
            prop_assert_eq!(desc, expected);
        }

        #[test]
        fn pages_concatenate_to_the_derived_rows(rows in rows(), page_size in 1usize..12) {
            let mut g = grid(rows, page_size);
            g.toggle_sort("name").unwrap();
            let all = g.derive().rows;
            let pages = g.page_count();
            prop_assert_eq!(pages, all.len().div_ceil(page_size));

            let mut seen = Vec::new();
            for page in 0..pages {
                g.go_to_page(page);
                seen.extend(g.page_rows().into_iter().map(|(id, _)| id.index()));
            }
            prop_assert_eq!(seen, all);
        }

        #[test]
        fn filter_change_rewinds_to_first_page(rows in rows(), page in 0usize..6, needle in "[a-c]?") {
            let mut g = grid(rows, 3);
            g.go_to_page(page);
            g.set_filter("name", &needle).unwrap();
            prop_assert_eq!(g.page_index(), 0);
        }

        #[test]
        fn visibility_never_changes_export(rows in rows(), hide_name in any::<bool>(), hide_n in any::<bool>()) {
            let mut g = grid(rows, 10);
            g.toggle_sort("n").unwrap();
            let before = g.export_snapshot();
            g.set_column_visible("name", !hide_name).unwrap();
            g.set_column_visible("n", !hide_n).unwrap();
            prop_assert_eq!(g.export_snapshot(), before);
        }
    }
}
