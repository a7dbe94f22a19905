/// Export snapshots
///
/// A snapshot is the full filtered and sorted row sequence, ignoring the
/// pager and column visibility, projected onto the grid's data columns.
/// Values are raw accessor values; quoting and escaping belong to whatever
/// format the caller writes (see `CsvExporter`).

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::state::RowId;
use crate::value::CellValue;

/// One exported row: `{ column_key: value }` in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub row_id: RowId,
    fields: Vec<(String, CellValue)>,
}

impl ExportRow {
    pub(crate) fn new(row_id: RowId, fields: Vec<(String, CellValue)>) -> Self {
        ExportRow { row_id, fields }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == column)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }
}

impl Serialize for ExportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Filtered + sorted rows of a grid, ready for bulk export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportSnapshot {
    columns: Vec<String>,
    rows: Vec<ExportRow>,
}

impl ExportSnapshot {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<ExportRow>) -> Self {
        ExportSnapshot { columns, rows }
    }

    /// Keys of the exported columns, in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ExportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExportRow> {
        self.rows.iter()
    }

    /// Values of one column down the snapshot.
    pub fn column_values(&self, column: &str) -> Vec<&CellValue> {
        self.rows.iter().filter_map(|row| row.get(column)).collect()
    }
}

impl Serialize for ExportSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ExportSnapshot {
        ExportSnapshot::new(
            vec!["id".to_string(), "titulo".to_string()],
            vec![
                ExportRow::new(
                    RowId(3),
                    vec![
                        ("id".to_string(), "PESQ-004".into()),
                        ("titulo".to_string(), "Clima Organizacional H2".into()),
                    ],
                ),
                ExportRow::new(
                    RowId(0),
                    vec![
                        ("id".to_string(), "PESQ-001".into()),
                        ("titulo".to_string(), CellValue::Null),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_lookup_by_column() {
        let snap = snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.rows()[0].get("id"), Some(&CellValue::from("PESQ-004")));
        assert_eq!(snap.rows()[0].get("missing"), None);
        assert_eq!(snap.column_values("id").len(), 2);
    }

    #[test]
    fn test_serializes_as_ordered_maps() {
        let json = serde_json::to_string(&snapshot()).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"PESQ-004","titulo":"Clima Organizacional H2"},{"id":"PESQ-001","titulo":null}]"#
        );
    }

    #[test]
    fn test_default_is_empty() {
        assert!(ExportSnapshot::default().is_empty());
    }
}
