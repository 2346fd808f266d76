// Sample input files

use std::path::Path;

use markrecon_recon::{CellValue, RawTable};

use crate::error::WriteError;
use crate::table::TableFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Master,
    Secondary,
}

impl TemplateKind {
    /// Sheet name used when the template is written as a workbook.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Secondary => "Rovan",
        }
    }

    pub fn table(self) -> RawTable {
        match self {
            Self::Master => master_template(),
            Self::Secondary => secondary_template(),
        }
    }
}

fn row(key: &str, marks: [f64; 3]) -> Vec<CellValue> {
    let mut cells = vec![CellValue::from(key)];
    cells.extend(marks.into_iter().map(CellValue::Number));
    cells
}

fn header(columns: [&str; 4]) -> Vec<CellValue> {
    columns.into_iter().map(CellValue::from).collect()
}

pub fn master_template() -> RawTable {
    vec![
        header(["RegNo", "MA3351", "PH3251", "CS3391"]),
        row("2123001", [18.0, 20.0, 19.0]),
        row("2123002", [15.0, 18.0, 20.0]),
    ]
}

/// Same students as the master, columns in another order. CS3391 differs
/// for 2123001.
pub fn secondary_template() -> RawTable {
    vec![
        header(["RegNo", "CS3391", "MA3351", "PH3251"]),
        row("2123001", [18.0, 18.0, 20.0]),
        row("2123002", [20.0, 15.0, 18.0]),
    ]
}

/// Write a template, as a workbook or delimited text depending on the
/// extension. `.tsv` files are tab-separated so they read back with the
/// same delimiter.
pub fn write_template(kind: TemplateKind, path: &Path) -> Result<(), WriteError> {
    let table = kind.table();
    match TableFormat::from_path(path) {
        Some(TableFormat::Workbook) if has_xlsx_extension(path) => {
            crate::xlsx::export_table(path, kind.sheet_name(), &table)
        }
        Some(TableFormat::Delimited) => {
            crate::csv::export_table(path, &table, crate::csv::delimiter_for_path(path))
        }
        _ => Err(WriteError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn has_xlsx_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"))
}
