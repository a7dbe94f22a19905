/// Survey list demo
///
/// Dashboard survey table: selection column, named-field columns, a sortable
/// participant count and a row-actions column. Prints the rendered page, the
/// selection footer, and the CSV export.
///
/// Run with `cargo run --example survey_list`.

use climate_grid::{
    CellContext, CellValue, ColumnDef, CsvExporter, DataGrid, HeaderContext, PageSelection, Record, RowId, SortOrder,
    TableBody,
};

struct Survey {
    id: &'static str,
    title: &'static str,
    status: &'static str,
    participants: u32,
    created: &'static str,
}

impl Record for Survey {
    fn field_names() -> &'static [&'static str] {
        &["id", "title", "status", "participantes", "dataCriacao"]
    }

    fn field(&self, name: &str) -> Option<CellValue> {
        match name {
            "id" => Some(self.id.into()),
            "title" => Some(self.title.into()),
            "status" => Some(self.status.into()),
            "participantes" => Some(self.participants.into()),
            "dataCriacao" => Some(self.created.into()),
            _ => None,
        }
    }
}

fn surveys() -> Vec<Survey> {
    vec![
        Survey { id: "PESQ-001", title: "Engajamento Q1 2025", status: "concluido", participants: 152, created: "2025-03-28" },
        Survey { id: "PESQ-002", title: "Feedback de Liderança H1", status: "concluido", participants: 140, created: "2025-06-15" },
        Survey { id: "PESQ-003", title: "Pesquisa de Satisfação Anual 2024", status: "concluido", participants: 180, created: "2024-12-20" },
        Survey { id: "PESQ-004", title: "Clima Organizacional H2", status: "em_andamento", participants: 125, created: "2025-09-01" },
        Survey { id: "PESQ-005", title: "Onboarding Novos Contratados", status: "em_andamento", participants: 25, created: "2025-09-10" },
        Survey { id: "PESQ-006", title: "Avaliação de Benefícios", status: "rascunho", participants: 0, created: "2025-09-18" },
    ]
}

fn sort_label(label: &str, ctx: &HeaderContext<'_>) -> String {
    match ctx.sort {
        Some(SortOrder::Ascending) => format!("{} ↑", label),
        Some(SortOrder::Descending) => format!("{} ↓", label),
        None => format!("{} ↕", label),
    }
}

fn columns() -> Vec<ColumnDef<Survey>> {
    vec![
        ColumnDef::display("select")
            .header_with(|h| match h.page_selection {
                PageSelection::All => "[x]".to_string(),
                PageSelection::Some => "[-]".to_string(),
                PageSelection::None => "[ ]".to_string(),
            })
            .cell(|c| if c.selected { "[x]".to_string() } else { "[ ]".to_string() }),
        ColumnDef::field_as("titulo", "title").header_with(|h| sort_label("Título", h)),
        ColumnDef::field("status")
            .header("Status")
            .cell(|c: &CellContext<'_, Survey>| match c.row.status {
                "concluido" => "Concluída".to_string(),
                "em_andamento" => "Em andamento".to_string(),
                "rascunho" => "Rascunho".to_string(),
                other => other.to_string(),
            }),
        ColumnDef::field("participantes").header_with(|h| sort_label("Participantes", h)),
        ColumnDef::field("dataCriacao").header("Data de Criação"),
        ColumnDef::<Survey>::display("actions")
            .header("Ações")
            .cell(|c| format!("[... {}]", c.row.id)),
    ]
}

fn print_table(grid: &DataGrid<Survey>) {
    let table = grid.render();
    let labels: Vec<&str> = table.headers.iter().map(|h| h.label.as_str()).collect();
    println!("{}", labels.join(" | "));
    match &table.body {
        TableBody::NoResults => println!("Nenhum resultado."),
        TableBody::Rows(rows) => {
            for row in rows {
                let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
                println!("{}", cells.join(" | "));
            }
        }
    }
    println!(
        "{} of {} row(s) selected. Page {} of {}",
        table.pager.selected_rows,
        table.pager.filtered_rows,
        table.pager.page_index + 1,
        table.pager.page_count.max(1)
    );
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut grid = DataGrid::new(columns(), surveys())?;
    grid.set_page_size(5)?;
    print_table(&grid);

    grid.toggle_sort("participantes")?;
    grid.toggle_sort("participantes")?;
    grid.toggle_row_selected(RowId(2))?;
    print_table(&grid);

    grid.set_filter("titulo", "h")?;
    grid.set_column_visible("dataCriacao", false)?;
    print_table(&grid);

    grid.set_filter("titulo", "salário")?;
    print_table(&grid);

    grid.clear_filters();
    match CsvExporter::new().to_csv_string(&grid.export_snapshot())? {
        Some(csv) => print!("{}", csv),
        None => println!("Nothing to export"),
    }
    Ok(())
}
