// src/export/mod.rs

mod json_csv;
mod model;

pub use model::LogExport;

use crate::errors::AppResult;
use crate::models::DateRange;
use crate::store::RecordStore;
use crate::store::fs_utils::ensure_writable;
use clap::ValueEnum;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Flatten the selected logs and write them to `path`. Returns how many
    /// rows were written.
    pub fn export(
        store: &RecordStore,
        user_id: Option<&str>,
        range: &DateRange,
        format: ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<usize> {
        ensure_writable(path, force)?;

        let rows = model::collect_rows(store, user_id, range);
        match format {
            ExportFormat::Csv => json_csv::export_csv(&rows, path)?,
            ExportFormat::Json => json_csv::export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}
