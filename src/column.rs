/// Grid column definitions
///
/// A column describes one piece of derived data: how to read it from a row
/// (named field or computed selector), how to render its header and cells,
/// and which interactions it supports. Rows themselves stay opaque; the grid
/// only ever looks at them through a column's accessor.
///
/// # Examples
///
/// ```
/// use climate_grid::{CellValue, ColumnDef, ColumnSet, Record};
///
/// struct Company {
///     name: String,
///     employees: u32,
/// }
///
/// impl Record for Company {
///     fn field_names() -> &'static [&'static str] {
///         &["name", "employees"]
///     }
///
///     fn field(&self, name: &str) -> Option<CellValue> {
///         match name {
///             "name" => Some(self.name.as_str().into()),
///             "employees" => Some(self.employees.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let columns = ColumnSet::new(vec![
///     ColumnDef::display("select"),
///     ColumnDef::field("name").header("Empresa"),
///     ColumnDef::field("employees").header("Colaboradores"),
///     ColumnDef::computed("size", |c: &Company| {
///         if c.employees > 100 { "large".into() } else { "small".into() }
///     }),
/// ])
/// .unwrap();
///
/// assert_eq!(columns.len(), 4);
/// assert!(ColumnSet::new(vec![ColumnDef::<Company>::field("nome")]).is_err());
/// ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use crate::error::{GridError, Result};
use crate::state::{PageSelection, RowId, SortOrder};
use crate::value::CellValue;

/// Field-level access to a row type, used by named-field accessors.
pub trait Record {
    /// Every field name `field` answers for. Checked when columns register.
    fn field_names() -> &'static [&'static str];

    fn field(&self, name: &str) -> Option<CellValue>;
}

type Selector<T> = Box<dyn Fn(&T) -> CellValue>;
type HeaderFn = Box<dyn Fn(&HeaderContext<'_>) -> String>;
type CellFn<T> = Box<dyn Fn(&CellContext<'_, T>) -> String>;
type CompareFn = Box<dyn Fn(&CellValue, &CellValue) -> Ordering>;
type FilterFn = Box<dyn Fn(&CellValue, &str) -> bool>;

/// How a column reads its value from a row.
pub enum Accessor<T> {
    /// Named field of a `Record`.
    Field {
        name: String,
        read: fn(&T, &str) -> Option<CellValue>,
        known: fn() -> &'static [&'static str],
    },
    /// Computed value over the whole row.
    Selector(Selector<T>),
}

impl<T> Accessor<T> {
    pub fn field(name: impl Into<String>) -> Self
    where
        T: Record,
    {
        Accessor::Field {
            name: name.into(),
            read: T::field,
            known: T::field_names,
        }
    }

    pub fn selector<F>(f: F) -> Self
    where
        F: Fn(&T) -> CellValue + 'static,
    {
        Accessor::Selector(Box::new(f))
    }

    pub fn read(&self, row: &T) -> CellValue {
        match self {
            Accessor::Field { name, read, .. } => (*read)(row, name.as_str()).unwrap_or(CellValue::Null),
            Accessor::Selector(f) => f(row),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field { name, .. } => f.debug_struct("Field").field("name", name).finish(),
            Accessor::Selector(_) => f.write_str("Selector"),
        }
    }
}

/// What a header renderer gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct HeaderContext<'a> {
    pub key: &'a str,
    pub sort: Option<SortOrder>,
    /// Sort precedence, 0 for the primary key.
    pub sort_index: Option<usize>,
    pub page_selection: PageSelection,
}

/// What a cell renderer gets to look at.
#[derive(Debug)]
pub struct CellContext<'a, T> {
    pub row: &'a T,
    pub row_id: RowId,
    /// Accessor value; `Null` for display-only columns.
    pub value: &'a CellValue,
    pub selected: bool,
}

enum Header {
    Key,
    Label(String),
    Custom(HeaderFn),
}

/// Definition of one grid column.
pub struct ColumnDef<T> {
    key: String,
    accessor: Option<Accessor<T>>,
    header: Header,
    cell: Option<CellFn<T>>,
    comparator: Option<CompareFn>,
    filter: Option<FilterFn>,
    can_sort: bool,
    can_hide: bool,
    can_filter: bool,
}

impl<T> ColumnDef<T> {
    fn with_accessor(key: String, accessor: Option<Accessor<T>>) -> Self {
        let data = accessor.is_some();
        ColumnDef {
            key,
            accessor,
            header: Header::Key,
            cell: None,
            comparator: None,
            filter: None,
            can_sort: data,
            can_hide: data,
            can_filter: data,
        }
    }

    /// Column reading the `Record` field with the same name as its key.
    pub fn field(key: impl Into<String>) -> Self
    where
        T: Record,
    {
        let key = key.into();
        let accessor = Accessor::field(key.clone());
        Self::with_accessor(key, Some(accessor))
    }

    /// Column keyed `key` reading a differently named `Record` field.
    pub fn field_as(key: impl Into<String>, field: impl Into<String>) -> Self
    where
        T: Record,
    {
        Self::with_accessor(key.into(), Some(Accessor::field(field)))
    }

    /// Column computed from the whole row.
    pub fn computed<F>(key: impl Into<String>, selector: F) -> Self
    where
        F: Fn(&T) -> CellValue + 'static,
    {
        Self::with_accessor(key.into(), Some(Accessor::selector(selector)))
    }

    /// Column without data (selection checkbox, row actions). It cannot be
    /// sorted, filtered or hidden unless enabled, and is never exported.
    pub fn display(key: impl Into<String>) -> Self {
        Self::with_accessor(key.into(), None)
    }

    pub fn header(mut self, label: impl Into<String>) -> Self {
        self.header = Header::Label(label.into());
        self
    }

    pub fn header_with<F>(mut self, render: F) -> Self
    where
        F: Fn(&HeaderContext<'_>) -> String + 'static,
    {
        self.header = Header::Custom(Box::new(render));
        self
    }

    pub fn cell<F>(mut self, render: F) -> Self
    where
        F: Fn(&CellContext<'_, T>) -> String + 'static,
    {
        self.cell = Some(Box::new(render));
        self
    }

    /// Replace the natural value ordering for this column.
    pub fn comparator<F>(mut self, compare: F) -> Self
    where
        F: Fn(&CellValue, &CellValue) -> Ordering + 'static,
    {
        self.comparator = Some(Box::new(compare));
        self
    }

    /// Replace the case-insensitive substring match for this column.
    pub fn filter_with<F>(mut self, matches: F) -> Self
    where
        F: Fn(&CellValue, &str) -> bool + 'static,
    {
        self.filter = Some(Box::new(matches));
        self
    }

    pub fn sortable(mut self, enabled: bool) -> Self {
        self.can_sort = enabled;
        self
    }

    pub fn hideable(mut self, enabled: bool) -> Self {
        self.can_hide = enabled;
        self
    }

    pub fn filterable(mut self, enabled: bool) -> Self {
        self.can_filter = enabled;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn accessor(&self) -> Option<&Accessor<T>> {
        self.accessor.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.accessor.is_some()
    }

    pub fn can_sort(&self) -> bool {
        self.can_sort
    }

    pub fn can_hide(&self) -> bool {
        self.can_hide
    }

    pub fn can_filter(&self) -> bool {
        self.can_filter
    }

    /// Accessor value, or `None` for display-only columns.
    pub fn value(&self, row: &T) -> Option<CellValue> {
        self.accessor.as_ref().map(|a| a.read(row))
    }

    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match &self.comparator {
            Some(compare) => compare(a, b),
            None => a.natural_cmp(b),
        }
    }

    /// Filter test. `needle_lower` must already be lowercased; custom
    /// predicates receive the filter text as the user typed it.
    pub(crate) fn matches(&self, value: &CellValue, needle: &str, needle_lower: &str) -> bool {
        match &self.filter {
            Some(matches) => matches(value, needle),
            None => value.to_text().to_lowercase().contains(needle_lower),
        }
    }

    pub fn render_header(&self, ctx: &HeaderContext<'_>) -> String {
        match &self.header {
            Header::Key => self.key.clone(),
            Header::Label(label) => label.clone(),
            Header::Custom(render) => render(ctx),
        }
    }

    pub fn render_cell(&self, ctx: &CellContext<'_, T>) -> String {
        match &self.cell {
            Some(render) => render(ctx),
            None => ctx.value.to_text(),
        }
    }

    fn validate(&self) -> Result<()> {
        match &self.accessor {
            Some(Accessor::Field { name, known, .. }) => {
                if !(*known)().contains(&name.as_str()) {
                    return Err(GridError::UnknownField {
                        column: self.key.clone(),
                        field: name.clone(),
                    });
                }
            }
            Some(Accessor::Selector(_)) => {}
            None => {
                if self.can_sort || self.can_filter {
                    return Err(GridError::MissingAccessor(self.key.clone()));
                }
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("accessor", &self.accessor)
            .field("can_sort", &self.can_sort)
            .field("can_hide", &self.can_hide)
            .field("can_filter", &self.can_filter)
            .finish()
    }
}

/// Validated, ordered column definitions.
#[derive(Debug)]
pub struct ColumnSet<T> {
    columns: Vec<ColumnDef<T>>,
}

impl<T> ColumnSet<T> {
    /// Registers the columns. Duplicate keys, unknown fields and
    /// sortable/filterable columns without an accessor are rejected here.
    pub fn new(columns: Vec<ColumnDef<T>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(GridError::DuplicateColumn(column.key.clone()));
            }
            column.validate()?;
        }
        log::debug!("registered {} grid columns", columns.len());
        Ok(ColumnSet { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDef<T>> {
        self.columns.iter()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn require(&self, key: &str) -> Result<&ColumnDef<T>> {
        self.get(key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))
    }

    /// Columns that carry data, in definition order.
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns.iter().filter(|c| c.has_data())
    }
}

impl<'a, T> IntoIterator for &'a ColumnSet<T> {
    type Item = &'a ColumnDef<T>;
    type IntoIter = std::slice::Iter<'a, ColumnDef<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Ready-made comparators for `ColumnDef::comparator`.
pub mod comparators {
    use super::CellValue;
    use std::cmp::Ordering;

    /// Text compared ignoring case; non-text values fall back to the natural
    /// order. Values equal under folding compare equal so ties keep source
    /// order.
    pub fn case_insensitive(a: &CellValue, b: &CellValue) -> Ordering {
        match (a, b) {
            (CellValue::Text(x), CellValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            _ => a.natural_cmp(b),
        }
    }
}
