/// Error types for grid configuration and state changes.
///
/// Configuration errors (bad column definitions, zero page size) are
/// programmer errors and surface when the grid is built. State errors surface
/// from setters called with keys the grid does not know.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("column key '{0}' is registered more than once")]
    DuplicateColumn(String),

    #[error("column '{column}' reads unknown field '{field}'")]
    UnknownField { column: String, field: String },

    #[error("column '{0}' has no accessor but is marked sortable or filterable")]
    MissingAccessor(String),

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("no column with key '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' cannot be sorted")]
    ColumnNotSortable(String),

    #[error("column '{0}' cannot be filtered")]
    ColumnNotFilterable(String),

    #[error("column '{0}' cannot be hidden")]
    ColumnNotHideable(String),

    #[error("row {index} out of range [0, {len})")]
    UnknownRow { index: usize, len: usize },

    #[error("invalid value '{value}' for setting {name}")]
    InvalidSetting { name: String, value: String },
}

/// Errors raised while writing an export snapshot.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("export i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("export header '{0}' is not a column of the snapshot")]
    UnknownHeader(String),
}

pub type Result<T, E = GridError> = std::result::Result<T, E>;
