//! `markrecon-io`: reads mark sheets from disk, writes reports and templates.
//!
//! Readers turn CSV/TSV and spreadsheet files into raw cell grids for the
//! engine. Exporters write a [`Reconciliation`] as CSV, XLSX or JSON.

pub mod csv;
pub mod error;
pub mod json;
pub mod table;
pub mod template;
pub mod xlsx;

use std::path::Path;

use markrecon_recon::{Reconciliation, ReportConfig};

pub use crate::csv::CsvReader;
pub use error::{ReadError, WriteError};
pub use table::{
    read_both, read_both_with, read_table, read_table_with, trim_trailing_empty, ReadOptions,
    TableFormat, TableReader,
};
pub use template::{write_template, TemplateKind};
pub use xlsx::WorkbookReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Write a report to `path`, format chosen by extension.
pub fn export_report(
    path: &Path,
    recon: &Reconciliation,
    labels: &ReportConfig,
    differences_only: bool,
) -> Result<ReportFormat, WriteError> {
    let format = ReportFormat::from_path(path)
        .ok_or_else(|| WriteError::UnsupportedFormat(path.to_path_buf()))?;
    match format {
        ReportFormat::Csv => crate::csv::export_report(path, &recon.result, labels, differences_only)?,
        ReportFormat::Xlsx => xlsx::export_report(path, &recon.result, labels, differences_only)?,
        ReportFormat::Json => json::export_report(path, recon, differences_only)?,
    }
    log::debug!("wrote {:?} report to {}", format, path.display());
    Ok(format)
}
