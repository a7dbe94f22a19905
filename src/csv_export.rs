/// CSV export of grid snapshots
///
/// Writes an `ExportSnapshot` as CSV: a header row of column keys (or the
/// caller's own key list), then one record per snapshot row. Every field is
/// quoted and embedded quotes are doubled. An empty snapshot produces no
/// file; the caller gets `ExportOutcome::NothingToExport` to report instead.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};

use crate::config::{GridOptions, DEFAULT_EXPORT_FILENAME};
use crate::error::ExportError;
use crate::export::ExportSnapshot;
use crate::value::CellValue;

/// What an export attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The snapshot had no rows; nothing was written.
    NothingToExport,
    Written { path: PathBuf, rows: usize },
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    filename: String,
    headers: Option<Vec<String>>,
}

impl Default for CsvExporter {
    fn default() -> Self {
        CsvExporter {
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
            headers: None,
        }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter using the configured export file name.
    pub fn from_options(options: &GridOptions) -> Self {
        Self::new().with_filename(options.export_filename.as_str())
    }

    /// Base file name; `.csv` is appended when missing.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Export only these columns, in this order, instead of every snapshot
    /// column.
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn file_name(&self) -> String {
        if self.filename.to_ascii_lowercase().ends_with(".csv") {
            self.filename.clone()
        } else {
            format!("{}.csv", self.filename)
        }
    }

    fn headers_for(&self, snapshot: &ExportSnapshot) -> Result<Vec<String>, ExportError> {
        match &self.headers {
            None => Ok(snapshot.columns().to_vec()),
            Some(headers) => {
                if let Some(unknown) = headers.iter().find(|h| !snapshot.columns().contains(h)) {
                    return Err(ExportError::UnknownHeader(unknown.clone()));
                }
                Ok(headers.clone())
            }
        }
    }

    /// Write the snapshot to `writer`; returns the number of data rows. An
    /// empty snapshot writes nothing, not even the header row.
    pub fn write<W: Write>(&self, snapshot: &ExportSnapshot, writer: W) -> Result<usize, ExportError> {
        let headers = self.headers_for(snapshot)?;
        if snapshot.is_empty() {
            return Ok(0);
        }
        let mut out = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .from_writer(writer);

        out.write_record(&headers)?;
        for row in snapshot.iter() {
            let record = headers.iter().map(|h| {
                row.get(h)
                    .map(CellValue::to_text)
                    .unwrap_or_default()
            });
            out.write_record(record)?;
        }
        out.flush()?;
        Ok(snapshot.len())
    }

    /// CSV text of the snapshot, or `None` when there is nothing to export.
    pub fn to_csv_string(&self, snapshot: &ExportSnapshot) -> Result<Option<String>, ExportError> {
        if snapshot.is_empty() {
            return Ok(None);
        }
        let mut buf = Vec::new();
        self.write(snapshot, &mut buf)?;
        // csv output of valid UTF-8 fields is valid UTF-8
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Write `<dir>/<filename>.csv`, unless the snapshot is empty.
    pub fn write_to_dir(&self, snapshot: &ExportSnapshot, dir: &Path) -> Result<ExportOutcome, ExportError> {
        if snapshot.is_empty() {
            log::info!("nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let path = dir.join(self.file_name());
        let file = File::create(&path)?;
        let rows = self.write(snapshot, file)?;
        log::info!("exported {} rows to {}", rows, path.display());
        Ok(ExportOutcome::Written { path, rows })
    }
}
