/// Data grid state container
///
/// `DataGrid` owns the rows, the validated columns and every state slice.
/// Its setters are the only way state changes; every read (current page,
/// counts, export snapshot, rendered table) re-runs the derivation pipeline
/// over the untouched source rows.
///
/// # Examples
///
/// ```
/// use climate_grid::{ColumnDef, DataGrid, GridOptions};
///
/// let rows: Vec<(String, i64)> = (0..25).map(|i| (format!("survey {}", i), i)).collect();
/// let columns = vec![
///     ColumnDef::computed("name", |r: &(String, i64)| r.0.as_str().into()),
///     ColumnDef::computed("n", |r: &(String, i64)| r.1.into()),
/// ];
///
/// let mut grid = DataGrid::with_options(columns, rows, &GridOptions::default()).unwrap();
/// assert_eq!(grid.page_count(), 3);
///
/// grid.go_to_page(5);
/// assert_eq!(grid.page_index(), 2);
///
/// grid.set_filter("n", "1").unwrap();
/// assert_eq!(grid.page_index(), 0);
/// assert_eq!(grid.filtered_row_count(), 12); // 1, 10..=19, 21
/// ```

use crate::column::{ColumnDef, ColumnSet};
use crate::config::GridOptions;
use crate::error::{GridError, Result};
use crate::export::{ExportRow, ExportSnapshot};
use crate::pipeline::{self, Derived};
use crate::state::{GridState, PageSelection, RowId, SortKey, SortOrder};

pub struct DataGrid<T> {
    rows: Vec<T>,
    columns: ColumnSet<T>,
    state: GridState,
}

impl<T> DataGrid<T> {
    /// Build a grid with default options (page size 10).
    pub fn new(columns: Vec<ColumnDef<T>>, rows: Vec<T>) -> Result<Self> {
        Self::with_options(columns, rows, &GridOptions::default())
    }

    /// Build a grid. Column registration errors and a zero page size fail here.
    pub fn with_options(columns: Vec<ColumnDef<T>>, rows: Vec<T>, options: &GridOptions) -> Result<Self> {
        options.validate()?;
        let columns = ColumnSet::new(columns)?;
        log::debug!(
            "grid created: {} columns, {} rows, page size {}",
            columns.len(),
            rows.len(),
            options.page_size
        );
        Ok(DataGrid {
            rows,
            columns,
            state: GridState::with_page_size(options.page_size),
        })
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&T> {
        self.rows.get(id.0)
    }

    pub fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Replace every state slice at once (e.g. restoring a serialized state).
    /// Every referenced column and row must exist and the page size must be
    /// non-zero; the page index is clamped.
    pub fn restore_state(&mut self, state: GridState) -> Result<()> {
        if state.pagination.page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        for key in state.sorting.keys() {
            self.sortable_column(&key.column)?;
        }
        for (column, _) in state.filters.iter() {
            self.filterable_column(column)?;
        }
        for column in state.visibility.hidden() {
            self.hideable_column(column)?;
        }
        if let Some(id) = state.selection.iter().find(|id| id.0 >= self.rows.len()) {
            return Err(GridError::UnknownRow {
                index: id.0,
                len: self.rows.len(),
            });
        }

        self.state = state;
        self.clamp_page();
        log::debug!("grid state restored");
        Ok(())
    }

    /// Swap in a fresh dataset. Selections pointing past the new end are
    /// dropped and the page index is clamped; other state is kept.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        let dropped = self.state.selection.retain_below(self.rows.len());
        if dropped > 0 {
            log::debug!("dropped {} selections outside the new dataset", dropped);
        }
        self.clamp_page();
    }

    // ---- columns -------------------------------------------------------

    fn sortable_column(&self, key: &str) -> Result<&ColumnDef<T>> {
        let column = self.columns.require(key)?;
        if !column.can_sort() {
            return Err(GridError::ColumnNotSortable(key.to_string()));
        }
        Ok(column)
    }

    fn filterable_column(&self, key: &str) -> Result<&ColumnDef<T>> {
        let column = self.columns.require(key)?;
        if !column.can_filter() {
            return Err(GridError::ColumnNotFilterable(key.to_string()));
        }
        Ok(column)
    }

    fn hideable_column(&self, key: &str) -> Result<&ColumnDef<T>> {
        let column = self.columns.require(key)?;
        if !column.can_hide() {
            return Err(GridError::ColumnNotHideable(key.to_string()));
        }
        Ok(column)
    }

    // ---- filtering -----------------------------------------------------

    /// Set or clear (empty `value`) the filter for a column and rewind to
    /// the first page.
    pub fn set_filter(&mut self, key: &str, value: impl AsRef<str>) -> Result<()> {
        self.filterable_column(key)?;
        let value = value.as_ref();
        if self.state.filters.set(key, value) {
            log::debug!("filter on '{}' set to {:?}", key, value);
        }
        self.state.pagination.page_index = 0;
        Ok(())
    }

    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.state.filters.get(key)
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.state.pagination.page_index = 0;
        log::debug!("filters cleared");
    }

    // ---- sorting -------------------------------------------------------

    /// Cycle a column through unsorted → ascending → descending → unsorted.
    /// A column that is not the primary key becomes the only key.
    pub fn toggle_sort(&mut self, key: &str) -> Result<Option<SortOrder>> {
        self.sortable_column(key)?;
        let order = self.state.sorting.toggle(key);
        self.state.pagination.page_index = 0;
        log::debug!("sort on '{}' now {:?}", key, order);
        Ok(order)
    }

    /// Like `toggle_sort`, but adds the column as a further sort level
    /// instead of replacing the existing keys.
    pub fn toggle_sort_multi(&mut self, key: &str) -> Result<Option<SortOrder>> {
        self.sortable_column(key)?;
        let order = self.state.sorting.toggle_multi(key);
        self.state.pagination.page_index = 0;
        log::debug!("multi-sort on '{}' now {:?}", key, order);
        Ok(order)
    }

    pub fn clear_sort(&mut self) {
        self.state.sorting.clear();
        self.state.pagination.page_index = 0;
        log::debug!("sort cleared");
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        self.state.sorting.keys()
    }

    // ---- visibility ----------------------------------------------------

    /// Show or hide a column. Only rendering is affected. Showing a column is
    /// always allowed; hiding requires `can_hide`.
    pub fn set_column_visible(&mut self, key: &str, visible: bool) -> Result<()> {
        if visible {
            self.columns.require(key)?;
        } else {
            self.hideable_column(key)?;
        }
        self.state.visibility.set(key, visible);
        log::debug!("column '{}' visible={}", key, visible);
        Ok(())
    }

    pub fn is_column_visible(&self, key: &str) -> bool {
        self.state.visibility.is_visible(key)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns
            .iter()
            .filter(move |c| self.state.visibility.is_visible(c.key()))
    }

    /// Columns the user may toggle (the "Columns" menu).
    pub fn hideable_columns(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns.iter().filter(|c| c.can_hide())
    }

    // ---- derivation ----------------------------------------------------

    pub fn derive(&self) -> Derived {
        pipeline::derive(&self.rows, &self.columns, &self.state)
    }

    fn filtered_indices(&self) -> Vec<usize> {
        pipeline::filter_rows(&self.rows, &self.columns, &self.state.filters)
    }

    pub fn filtered_row_count(&self) -> usize {
        self.filtered_indices().len()
    }

    /// Rows of the current page, in display order.
    pub fn page_rows(&self) -> Vec<(RowId, &T)> {
        self.derive()
            .page()
            .iter()
            .map(|&i| (RowId(i), &self.rows[i]))
            .collect()
    }

    // ---- pagination ----------------------------------------------------

    pub fn page_index(&self) -> usize {
        self.state.pagination.page_index
    }

    pub fn page_size(&self) -> usize {
        self.state.pagination.page_size
    }

    pub fn page_count(&self) -> usize {
        self.state.pagination.page_count(self.filtered_row_count())
    }

    fn clamp_page(&mut self) {
        let total = self.filtered_row_count();
        self.state.pagination.page_index = self.state.pagination.clamp(self.state.pagination.page_index, total);
    }

    /// Move to `index`, clamped to the last page. Does nothing while there
    /// are no pages.
    pub fn go_to_page(&mut self, index: usize) {
        let total = self.filtered_row_count();
        if self.state.pagination.page_count(total) == 0 {
            log::trace!("page change to {} ignored: no rows", index);
            return;
        }
        let clamped = self.state.pagination.clamp(index, total);
        if clamped != index {
            log::trace!("page {} clamped to {}", index, clamped);
        }
        self.state.pagination.page_index = clamped;
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page_index().saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page_index().saturating_sub(1));
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index() > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index() + 1 < self.page_count()
    }

    /// Change the page size, keeping the first row of the current page on
    /// screen.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        let top_row = self.state.pagination.page_index * self.state.pagination.page_size;
        self.state.pagination.page_size = page_size;
        self.state.pagination.page_index = top_row / page_size;
        self.clamp_page();
        log::debug!("page size {} (page {})", page_size, self.page_index());
        Ok(())
    }

    // ---- selection -----------------------------------------------------

    fn check_row(&self, id: RowId) -> Result<()> {
        if id.0 >= self.rows.len() {
            return Err(GridError::UnknownRow {
                index: id.0,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Flip one row's selection; returns whether it is now selected.
    pub fn toggle_row_selected(&mut self, id: RowId) -> Result<bool> {
        self.check_row(id)?;
        let selected = self.state.selection.toggle(id);
        log::debug!("row {} selected={}", id.0, selected);
        Ok(selected)
    }

    pub fn set_row_selected(&mut self, id: RowId, selected: bool) -> Result<()> {
        self.check_row(id)?;
        self.state.selection.set(id, selected);
        Ok(())
    }

    /// Select or deselect every row of the current page, and only those.
    pub fn toggle_all_on_page(&mut self, selected: bool) {
        let derived = self.derive();
        for &i in derived.page() {
            self.state.selection.set(RowId(i), selected);
        }
        log::debug!("{} page rows selected={}", derived.page().len(), selected);
    }

    pub fn clear_selection(&mut self) {
        self.state.selection.clear();
    }

    pub fn is_row_selected(&self, id: RowId) -> bool {
        self.state.selection.contains(id)
    }

    /// Every selected row in source order, whether or not it passes the
    /// current filters.
    pub fn selected_rows(&self) -> Vec<(RowId, &T)> {
        self.state
            .selection
            .iter()
            .filter_map(|id| self.rows.get(id.0).map(|row| (id, row)))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.state.selection.len()
    }

    /// Selected rows that pass the current filters.
    pub fn filtered_selected_count(&self) -> usize {
        self.filtered_indices()
            .into_iter()
            .filter(|&i| self.state.selection.contains(RowId(i)))
            .count()
    }

    pub fn page_selection(&self) -> PageSelection {
        page_selection_of(&self.derive(), |id| self.state.selection.contains(id))
    }

    // ---- export --------------------------------------------------------

    /// Every filtered and sorted row, ignoring the pager and visibility,
    /// as `{ column_key: value }` over the data columns.
    pub fn export_snapshot(&self) -> ExportSnapshot {
        let derived = self.derive();
        let data_columns: Vec<&ColumnDef<T>> = self.columns.data_columns().collect();
        let keys = data_columns.iter().map(|c| c.key().to_string()).collect();

        let rows = derived
            .rows
            .iter()
            .map(|&i| {
                let fields = data_columns
                    .iter()
                    .filter_map(|c| c.value(&self.rows[i]).map(|v| (c.key().to_string(), v)))
                    .collect();
                ExportRow::new(RowId(i), fields)
            })
            .collect();

        ExportSnapshot::new(keys, rows)
    }
}

pub(crate) fn page_selection_of<F>(derived: &Derived, is_selected: F) -> PageSelection
where
    F: Fn(RowId) -> bool,
{
    let page = derived.page();
    let selected = page.iter().filter(|&&i| is_selected(RowId(i))).count();
    match selected {
        0 => PageSelection::None,
        n if n == page.len() => PageSelection::All,
        _ => PageSelection::Some,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{comparators, Record};
    use crate::value::CellValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Company {
        name: String,
        sector: String,
        employees: i64,
    }

    impl Record for Company {
        fn field_names() -> &'static [&'static str] {
            &["name", "sector", "employees"]
        }

        fn field(&self, name: &str) -> Option<CellValue> {
            match name {
                "name" => Some(self.name.as_str().into()),
                "sector" => Some(self.sector.as_str().into()),
                "employees" => Some(self.employees.into()),
                _ => None,
            }
        }
    }

    fn company(name: &str, sector: &str, employees: i64) -> Company {
        Company {
            name: name.to_string(),
            sector: sector.to_string(),
            employees,
        }
    }

    fn columns() -> Vec<ColumnDef<Company>> {
        vec![
            ColumnDef::display("select"),
            ColumnDef::field("name").comparator(comparators::case_insensitive),
            ColumnDef::field("sector"),
            ColumnDef::field("employees").hideable(false),
            ColumnDef::display("actions"),
        ]
    }

    fn numbered(count: usize) -> Vec<Company> {
        (0..count)
            .map(|i| company(&format!("Empresa {:02}", i), if i % 2 == 0 { "Varejo" } else { "Tecnologia" }, i as i64))
            .collect()
    }

    fn grid(rows: Vec<Company>) -> DataGrid<Company> {
        DataGrid::new(columns(), rows).unwrap()
    }

    #[test]
    fn test_zero_page_size_fails_fast() {
        let options = GridOptions::default().with_page_size(0);
        let err = DataGrid::with_options(columns(), numbered(3), &options).err();
        assert_eq!(err, Some(GridError::InvalidPageSize));
    }

    #[test]
    fn test_bad_column_fails_fast() {
        let cols = vec![ColumnDef::<Company>::field("cnpj")];
        assert!(matches!(
            DataGrid::new(cols, numbered(1)),
            Err(GridError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_pages_and_clamping() {
        let mut g = grid(numbered(25));
        assert_eq!(g.page_count(), 3);
        g.go_to_page(5);
        assert_eq!(g.page_index(), 2);
        assert_eq!(g.page_rows().len(), 5);
        assert!(!g.can_next_page());
        assert!(g.can_previous_page());

        g.next_page();
        assert_eq!(g.page_index(), 2);
        g.previous_page();
        g.previous_page();
        g.previous_page();
        assert_eq!(g.page_index(), 0);
    }

    #[test]
    fn test_go_to_page_on_empty_grid_is_noop() {
        let mut g = grid(Vec::new());
        assert_eq!(g.page_count(), 0);
        g.go_to_page(3);
        assert_eq!(g.page_index(), 0);
        assert!(!g.can_next_page());
        assert!(!g.can_previous_page());
    }

    #[test]
    fn test_filter_resets_page() {
        let mut g = grid(numbered(25));
        g.go_to_page(2);
        g.set_filter("sector", "varejo").unwrap();
        assert_eq!(g.page_index(), 0);
        assert_eq!(g.filtered_row_count(), 13);

        g.go_to_page(1);
        g.set_filter("sector", "").unwrap();
        assert_eq!(g.page_index(), 0);
        assert_eq!(g.filter_value("sector"), None);
        assert_eq!(g.filtered_row_count(), 25);
    }

    #[test]
    fn test_sort_resets_page() {
        let mut g = grid(numbered(25));
        g.go_to_page(1);
        assert_eq!(g.toggle_sort("employees").unwrap(), Some(SortOrder::Ascending));
        assert_eq!(g.page_index(), 0);

        g.go_to_page(1);
        assert_eq!(g.toggle_sort("employees").unwrap(), Some(SortOrder::Descending));
        assert_eq!(g.page_index(), 0);
        assert_eq!(g.page_rows()[0].1.employees, 24);
    }

    #[test]
    fn test_setters_reject_unknown_and_disabled_columns() {
        let mut g = grid(numbered(3));
        assert_eq!(g.set_filter("cnpj", "x"), Err(GridError::UnknownColumn("cnpj".to_string())));
        assert_eq!(
            g.set_filter("select", "x"),
            Err(GridError::ColumnNotFilterable("select".to_string()))
        );
        assert_eq!(
            g.toggle_sort("actions"),
            Err(GridError::ColumnNotSortable("actions".to_string()))
        );
        assert_eq!(
            g.set_column_visible("employees", false),
            Err(GridError::ColumnNotHideable("employees".to_string()))
        );
        assert!(g.set_column_visible("employees", true).is_ok());
    }

    #[test]
    fn test_hidden_columns_still_filter_and_sort() {
        let mut g = grid(vec![
            company("Bravo", "Saúde", 10),
            company("alpha", "Varejo", 20),
            company("Charlie", "Saúde", 30),
        ]);
        g.set_column_visible("sector", false).unwrap();
        g.set_column_visible("name", false).unwrap();
        assert!(!g.is_column_visible("sector"));

        g.set_filter("sector", "saúde").unwrap();
        g.toggle_sort("name").unwrap();
        g.toggle_sort("name").unwrap();

        let names: Vec<&str> = g.page_rows().iter().map(|(_, c)| c.name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Bravo"]);
        assert_eq!(g.visible_columns().map(|c| c.key()).collect::<Vec<_>>(), vec!["select", "employees", "actions"]);
    }

    #[test]
    fn test_hideable_columns_menu() {
        let g = grid(numbered(1));
        let keys: Vec<&str> = g.hideable_columns().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["name", "sector"]);
    }

    #[test]
    fn test_toggle_all_on_page_only_touches_page() {
        let mut g = grid(numbered(25));
        g.go_to_page(1);
        g.toggle_all_on_page(true);
        assert_eq!(g.selected_count(), 10);
        assert!(g.is_row_selected(RowId(10)));
        assert!(!g.is_row_selected(RowId(9)));
        assert!(!g.is_row_selected(RowId(20)));
        assert_eq!(g.page_selection(), PageSelection::All);

        g.toggle_row_selected(RowId(12)).unwrap();
        assert_eq!(g.page_selection(), PageSelection::Some);

        g.toggle_all_on_page(false);
        assert_eq!(g.selected_count(), 0);
        assert_eq!(g.page_selection(), PageSelection::None);
    }

    #[test]
    fn test_selection_survives_refiltering() {
        let mut g = grid(numbered(6));
        g.toggle_row_selected(RowId(1)).unwrap();
        g.toggle_row_selected(RowId(2)).unwrap();

        g.set_filter("sector", "varejo").unwrap();
        assert_eq!(g.filtered_selected_count(), 1);
        assert_eq!(g.selected_count(), 2);

        g.set_filter("sector", "").unwrap();
        assert!(g.is_row_selected(RowId(1)));
        let selected: Vec<RowId> = g.selected_rows().iter().map(|(id, _)| *id).collect();
        assert_eq!(selected, vec![RowId(1), RowId(2)]);
    }

    #[test]
    fn test_select_unknown_row() {
        let mut g = grid(numbered(2));
        assert_eq!(
            g.toggle_row_selected(RowId(2)),
            Err(GridError::UnknownRow { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_set_rows_prunes_selection_and_clamps_page() {
        let mut g = grid(numbered(25));
        g.set_row_selected(RowId(3), true).unwrap();
        g.set_row_selected(RowId(22), true).unwrap();
        g.go_to_page(2);

        g.set_rows(numbered(12));
        assert_eq!(g.page_index(), 1);
        assert!(g.is_row_selected(RowId(3)));
        assert!(!g.is_row_selected(RowId(22)));
        assert_eq!(g.selected_count(), 1);
    }

    #[test]
    fn test_set_page_size_keeps_top_row() {
        let mut g = grid(numbered(25));
        g.go_to_page(2); // rows 20..25
        g.set_page_size(5).unwrap();
        assert_eq!(g.page_index(), 4);
        assert_eq!(g.page_rows()[0].0, RowId(20));

        g.set_page_size(100).unwrap();
        assert_eq!(g.page_index(), 0);
        assert_eq!(g.set_page_size(0), Err(GridError::InvalidPageSize));
    }

    #[test]
    fn test_source_rows_untouched() {
        let rows = vec![company("b", "x", 2), company("a", "y", 1)];
        let mut g = grid(rows.clone());
        g.toggle_sort("name").unwrap();
        g.set_filter("sector", "y").unwrap();
        let _ = g.export_snapshot();
        assert_eq!(g.rows(), rows.as_slice());
    }

    #[test]
    fn test_export_snapshot_ignores_pager_and_visibility() {
        let mut g = grid(numbered(25));
        g.toggle_sort("employees").unwrap();
        g.toggle_sort("employees").unwrap();
        g.go_to_page(2);

        let before = g.export_snapshot();
        assert_eq!(before.len(), 25);
        assert_eq!(before.columns(), &["name", "sector", "employees"]);
        assert_eq!(before.rows()[0].get("employees"), Some(&CellValue::Int(24)));
        assert_eq!(before.rows()[0].row_id, RowId(24));

        g.set_column_visible("sector", false).unwrap();
        assert_eq!(g.export_snapshot(), before);
    }

    #[test]
    fn test_export_snapshot_empty_when_filtered_out() {
        let mut g = grid(numbered(5));
        g.set_filter("name", "nada").unwrap();
        assert!(g.export_snapshot().is_empty());
    }

    #[test]
    fn test_restore_state() {
        let mut g = grid(numbered(25));
        let mut state = GridState::with_page_size(5);
        state.sorting.toggle("employees");
        state.filters.set("sector", "tecnologia");
        state.pagination.page_index = 9;
        g.restore_state(state).unwrap();

        assert_eq!(g.page_size(), 5);
        assert_eq!(g.page_count(), 3);
        assert_eq!(g.page_index(), 2);

        let mut bad = GridState::default();
        bad.filters.set("actions", "x");
        assert_eq!(
            g.restore_state(bad),
            Err(GridError::ColumnNotFilterable("actions".to_string()))
        );
    }
}
