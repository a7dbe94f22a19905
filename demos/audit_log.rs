/// Audit log demo
///
/// Audit trail table with a status badge renderer, filtering by user and
/// action, and CSV export of the filtered log to the temp directory.
///
/// Run with `cargo run --example audit_log`.

use climate_grid::{CellValue, ColumnDef, CsvExporter, DataGrid, ExportOutcome, GridOptions};

struct AuditLog {
    id: &'static str,
    timestamp: &'static str,
    user: &'static str,
    action: &'static str,
    entity: &'static str,
    entity_id: &'static str,
    status: &'static str,
}

fn logs() -> Vec<AuditLog> {
    let raw = [
        ("LOG-001", "2025-10-12 10:00:00", "admin@example.com", "LOGIN", "Auth", "N/A", "success"),
        ("LOG-002", "2025-10-12 10:05:15", "user1@example.com", "CREATE_SURVEY", "Survey", "SURV-007", "success"),
        ("LOG-003", "2025-10-12 10:10:30", "admin@example.com", "UPDATE_COMPANY", "Company", "COMP-001", "success"),
        ("LOG-004", "2025-10-12 10:15:00", "user2@example.com", "LOGIN", "Auth", "N/A", "failed"),
        ("LOG-005", "2025-10-12 10:20:45", "admin@example.com", "DELETE_USER", "User", "USER-003", "info"),
        ("LOG-006", "2025-10-12 10:25:00", "user1@example.com", "RESPOND_SURVEY", "Survey", "SURV-001", "success"),
        ("LOG-007", "2025-10-12 10:30:00", "admin@example.com", "VIEW_REPORT", "Report", "REP-001", "success"),
        ("LOG-008", "2025-10-12 10:35:00", "user3@example.com", "CREATE_COMPANY", "Company", "COMP-005", "failed"),
    ];
    raw.into_iter()
        .map(|(id, timestamp, user, action, entity, entity_id, status)| AuditLog {
            id,
            timestamp,
            user,
            action,
            entity,
            entity_id,
            status,
        })
        .collect()
}

fn status_badge(value: &CellValue) -> String {
    match value.as_text() {
        Some("success") => "Sucesso".to_string(),
        Some("failed") => "Falha".to_string(),
        Some("info") => "Info".to_string(),
        _ => value.to_text(),
    }
}

fn columns() -> Vec<ColumnDef<AuditLog>> {
    vec![
        ColumnDef::computed("id", |l: &AuditLog| l.id.into()).header("ID").hideable(false),
        ColumnDef::computed("timestamp", |l: &AuditLog| l.timestamp.into()).header("Data/Hora"),
        ColumnDef::computed("user", |l: &AuditLog| l.user.into()).header("Usuário"),
        ColumnDef::computed("action", |l: &AuditLog| l.action.into()).header("Ação"),
        ColumnDef::computed("entity", |l: &AuditLog| l.entity.into()).header("Entidade"),
        ColumnDef::computed("entityId", |l: &AuditLog| l.entity_id.into()).header("ID da Entidade"),
        ColumnDef::computed("status", |l: &AuditLog| l.status.into())
            .header("Status")
            .cell(|c| status_badge(c.value)),
        ColumnDef::display("actions").header("Ações"),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let options = GridOptions::from_env()?.with_export_filename("auditoria");
    let mut grid = DataGrid::with_options(columns(), logs(), &options)?;

    grid.set_filter("user", "admin")?;
    grid.toggle_sort("timestamp")?;
    grid.toggle_sort("timestamp")?;
    println!("{}", serde_json::to_string_pretty(&grid.render())?);

    let exporter = CsvExporter::from_options(&options);
    match exporter.write_to_dir(&grid.export_snapshot(), &std::env::temp_dir())? {
        ExportOutcome::NothingToExport => println!("Nothing to export"),
        ExportOutcome::Written { path, rows } => println!("Wrote {} rows to {}", rows, path.display()),
    }

    grid.set_filter("action", "DROP_TABLE")?;
    if let ExportOutcome::NothingToExport = exporter.write_to_dir(&grid.export_snapshot(), &std::env::temp_dir())? {
        println!("Nothing to export for action DROP_TABLE");
    }
    Ok(())
}
