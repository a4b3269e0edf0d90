// src/export/json_csv.rs

use crate::errors::{AppError, AppResult};
use crate::export::LogExport;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Export JSON pretty-printed.
pub(crate) fn export_json(rows: &[LogExport], path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(rows)?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    info!(path = %path.display(), rows = rows.len(), "JSON export completed");
    Ok(())
}

/// Export CSV (header derived from the row struct).
pub(crate) fn export_csv(rows: &[LogExport], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    for item in rows {
        wtr.serialize(item)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    info!(path = %path.display(), rows = rows.len(), "CSV export completed");
    Ok(())
}
