// Excel/ODS import via calamine, report export via rust_xlsxwriter

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use markrecon_recon::summary::rank_by_mismatches;
use markrecon_recon::{CellValue, RawTable, ReconResult, ReportConfig, Status, Summary};

use crate::error::{ReadError, WriteError};
use crate::table::{trim_trailing_empty, TableReader};

/// Spreadsheet reader (xlsx, xlsm, xlsb, xls, ods). Reads one sheet.
#[derive(Debug, Clone, Default)]
pub struct WorkbookReader {
    /// Sheet to read; the first sheet when unset.
    pub sheet: Option<String>,
}

impl WorkbookReader {
    pub fn sheet(name: impl Into<String>) -> Self {
        Self { sheet: Some(name.into()) }
    }
}

impl TableReader for WorkbookReader {
    fn read(&self, path: &Path) -> Result<RawTable, ReadError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| ReadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let sheet_name = match &self.sheet {
            Some(wanted) => sheet_names
                .iter()
                .find(|n| n.as_str() == wanted.as_str())
                .cloned()
                .ok_or_else(|| ReadError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: wanted.clone(),
                })?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ReadError::NoSheets { path: path.to_path_buf() })?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ReadError::Workbook {
                path: path.to_path_buf(),
                message: format!("failed to read sheet '{sheet_name}': {e}"),
            })?;

        let (height, width) = range.get_size();
        log::debug!("{}: sheet '{sheet_name}' is {height}x{width}", path.display());

        let table: RawTable = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        Ok(trim_trailing_empty(table))
    }
}

/// Map a calamine cell onto the closed cell variant.
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        // Store as TRUE/FALSE text
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{e:?}")),
        // Dates compare by serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Build the report workbook: a `Report` sheet with every row and a
/// `Summary` sheet with the overall counts and the per-attribute ranking.
pub fn report_workbook(
    result: &ReconResult,
    labels: &ReportConfig,
    differences_only: bool,
) -> Result<Workbook, WriteError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let report = workbook.add_worksheet().set_name("Report")?;
    for (col, header) in labels.columns().iter().enumerate() {
        report.write_string_with_format(0, col as u16, header, &bold)?;
    }
    let mut row_idx: u32 = 1;
    for row in &result.rows {
        if differences_only && row.status == Status::Match {
            continue;
        }
        report.write_string(row_idx, 0, &row.entity)?;
        report.write_string(row_idx, 1, &row.attribute)?;
        report.write_string(row_idx, 2, &row.master_value)?;
        report.write_string(row_idx, 3, &row.secondary_value)?;
        report.write_string(row_idx, 4, row.status.as_str())?;
        row_idx += 1;
    }
    report.set_column_width(4, 22)?;

    let summary = workbook.add_worksheet().set_name("Summary")?;
    write_summary_header(summary, 0, "", labels, &bold)?;
    write_summary_row(summary, 1, "Overall", &result.summary)?;

    write_summary_header(summary, 3, &labels.attribute_label, labels, &bold)?;
    for (i, (attribute, stats)) in rank_by_mismatches(&result.per_attribute).into_iter().enumerate() {
        write_summary_row(summary, 4 + i as u32, attribute, stats)?;
    }
    summary.set_column_width(0, 14)?;

    Ok(workbook)
}

fn write_summary_header(
    sheet: &mut Worksheet,
    row: u32,
    first: &str,
    labels: &ReportConfig,
    bold: &Format,
) -> Result<(), WriteError> {
    let headers = [
        first.to_string(),
        "Total".to_string(),
        "Matches".to_string(),
        "Mismatches".to_string(),
        format!("Missing in {}", labels.master_label),
        format!("Missing in {}", labels.secondary_label),
        "Match %".to_string(),
        "Mismatch %".to_string(),
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, header, bold)?;
    }
    Ok(())
}

fn write_summary_row(
    sheet: &mut Worksheet,
    row: u32,
    label: &str,
    s: &Summary,
) -> Result<(), WriteError> {
    sheet.write_string(row, 0, label)?;
    let counts = [s.total, s.matches, s.mismatches, s.missing_master, s.missing_secondary];
    for (offset, count) in counts.iter().enumerate() {
        sheet.write_number(row, 1 + offset as u16, *count as f64)?;
    }
    sheet.write_number(row, 6, s.match_percent)?;
    sheet.write_number(row, 7, s.mismatch_percent)?;
    Ok(())
}

pub fn export_report(
    path: &Path,
    result: &ReconResult,
    labels: &ReportConfig,
    differences_only: bool,
) -> Result<(), WriteError> {
    let mut workbook = report_workbook(result, labels, differences_only)?;
    workbook.save(path)?;
    Ok(())
}

/// Report workbook serialized to bytes.
pub fn report_to_bytes(
    result: &ReconResult,
    labels: &ReportConfig,
    differences_only: bool,
) -> Result<Vec<u8>, WriteError> {
    let mut workbook = report_workbook(result, labels, differences_only)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write a raw table to a single named sheet (used for templates).
pub fn export_table(path: &Path, sheet_name: &str, table: &[Vec<CellValue>]) -> Result<(), WriteError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name(sheet_name)?;
    for (r, row) in table.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                CellValue::Text(s) => {
                    sheet.write_string(r, c, s)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number(r, c, *n)?;
                }
                CellValue::Empty => {}
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    #[test]
    fn test_table_roundtrip_keeps_numbers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("master.xlsx");
        let table = vec![
            vec![t("RegNo"), t("MA3351"), t("PH3251")],
            vec![t("2123001"), CellValue::Number(18.0), CellValue::Empty],
            vec![t("2123002"), CellValue::Number(15.5), CellValue::Number(18.0)],
        ];
        export_table(&path, "Master", &table).unwrap();

        let back = WorkbookReader::default().read(&path).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[0], vec![t("RegNo"), t("MA3351"), t("PH3251")]);
        assert_eq!(back[1][1], CellValue::Number(18.0));
        assert!(back[1].get(2).map_or(true, CellValue::is_empty));
        assert_eq!(back[2][1].to_trimmed_string(), "15.5");
    }

    #[test]
    fn test_named_sheet_lookup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rovan.xlsx");
        export_table(&path, "Rovan", &[vec![t("RegNo")]]).unwrap();

        assert!(WorkbookReader::sheet("Rovan").read(&path).is_ok());
        let err = WorkbookReader::sheet("Dean").read(&path).unwrap_err();
        assert!(matches!(err, ReadError::SheetNotFound { .. }));
    }

    #[test]
    fn test_garbage_bytes_are_a_workbook_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();
        let err = WorkbookReader::default().read(&path).unwrap_err();
        assert!(matches!(err, ReadError::Workbook { .. }));
    }

    #[test]
    fn test_cell_mapping() {
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_from_data(&Data::Bool(true)), t("TRUE"));
        assert_eq!(cell_from_data(&Data::String("AB".into())), t("AB"));
    }

    #[test]
    fn test_report_workbook_sheets() {
        let master = vec![vec![t("RegNo"), t("MA3351")], vec![t("2123001"), t("18")]];
        let secondary = vec![vec![t("RegNo"), t("MA3351")], vec![t("2123001"), t("20")]];
        let result = markrecon_recon::reconcile(&master, &secondary);

        let dir = tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        export_report(&path, &result, &ReportConfig::default(), false).unwrap();

        let report = WorkbookReader::sheet("Report").read(&path).unwrap();
        assert_eq!(report[0][0], t("Register"));
        assert_eq!(report[1], vec![t("2123001"), t("MA3351"), t("18"), t("20"), t("Mismatch")]);

        let summary = WorkbookReader::sheet("Summary").read(&path).unwrap();
        assert_eq!(summary[1][0], t("Overall"));
        assert_eq!(summary[1][1], CellValue::Number(1.0));
        assert_eq!(summary[4][0], t("MA3351"));
        assert_eq!(summary[4][7], CellValue::Number(100.0));
    }

    #[test]
    fn test_report_to_bytes_is_a_zip() {
        let result = markrecon_recon::reconcile(&[], &[]);
        let bytes = report_to_bytes(&result, &ReportConfig::default(), false).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
