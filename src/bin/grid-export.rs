/// grid-export
///
/// Loads a JSON array of objects, runs it through a data grid with the given
/// filters, sort keys and page, and prints the rendered page as JSON or
/// writes the whole filtered+sorted set as CSV.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::{Map, Value};

use climate_grid::{CellValue, ColumnDef, CsvExporter, DataGrid, ExportOutcome, GridOptions};

type JsonRow = Map<String, Value>;

#[derive(Parser, Debug)]
#[command(name = "grid-export")]
#[command(about = "Filter, sort, page and export a JSON array of records")]
#[command(version)]
struct Args {
    /// JSON file holding an array of objects
    input: PathBuf,

    /// Column filter as key=value (repeatable)
    #[arg(short, long = "filter")]
    filters: Vec<String>,

    /// Sort key as key or key:desc, in precedence order (repeatable)
    #[arg(short, long = "sort")]
    sorts: Vec<String>,

    /// Zero-based page to render
    #[arg(short, long, default_value_t = 0)]
    page: usize,

    /// Rows per page (defaults to GRID_PAGE_SIZE or 10)
    #[arg(long)]
    page_size: Option<usize>,

    /// Write the filtered and sorted rows as CSV into this directory
    #[arg(long)]
    csv: Option<PathBuf>,

    /// CSV file name (defaults to GRID_EXPORT_FILENAME or "export")
    #[arg(long)]
    filename: Option<String>,
}

fn load_rows(path: &PathBuf) -> anyhow::Result<Vec<JsonRow>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let Value::Array(items) = value else {
        bail!("{} must contain a JSON array", path.display());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => bail!("element {} is not an object: {}", i, other),
        })
        .collect()
}

/// One column per key of the first row, in key order.
fn columns_for(rows: &[JsonRow]) -> Vec<ColumnDef<JsonRow>> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .keys()
        .map(|key| {
            let field = key.clone();
            ColumnDef::computed(key.as_str(), move |row: &JsonRow| {
                row.get(&field).map(CellValue::from).unwrap_or(CellValue::Null)
            })
        })
        .collect()
}

fn apply_args(grid: &mut DataGrid<JsonRow>, args: &Args) -> anyhow::Result<()> {
    for filter in &args.filters {
        let (key, value) = filter
            .split_once('=')
            .with_context(|| format!("filter '{}' is not key=value", filter))?;
        grid.set_filter(key, value)?;
    }

    for sort in &args.sorts {
        let (key, descending) = match sort.rsplit_once(':') {
            Some((key, "desc")) => (key, true),
            Some((key, "asc")) => (key, false),
            _ => (sort.as_str(), false),
        };
        grid.toggle_sort_multi(key)?;
        if descending {
            grid.toggle_sort_multi(key)?;
        }
    }

    grid.go_to_page(args.page);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let mut options = GridOptions::from_env().context("reading grid settings from the environment")?;
    if let Some(page_size) = args.page_size {
        options = options.with_page_size(page_size);
    }
    if let Some(filename) = &args.filename {
        options = options.with_export_filename(filename.as_str());
    }

    let rows = load_rows(&args.input)?;
    log::info!("loaded {} rows from {}", rows.len(), args.input.display());

    let mut grid = DataGrid::with_options(columns_for(&rows), rows, &options)?;
    apply_args(&mut grid, &args)?;

    match &args.csv {
        Some(dir) => {
            let exporter = CsvExporter::from_options(&options);
            match exporter.write_to_dir(&grid.export_snapshot(), dir)? {
                ExportOutcome::NothingToExport => println!("Nothing to export"),
                ExportOutcome::Written { path, rows } => println!("Wrote {} rows to {}", rows, path.display()),
            }
        }
        None => {
            let rendered = serde_json::to_string_pretty(&grid.render())?;
            println!("{}", rendered);
        }
    }
    Ok(())
}
