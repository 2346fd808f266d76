// Tabular file reader: any supported file in, trimmed raw cell grid out.

use std::path::Path;

use markrecon_recon::{CellValue, RawTable};

use crate::csv::CsvReader;
use crate::error::ReadError;
use crate::xlsx::WorkbookReader;

/// Turns a file into a grid of raw cells.
///
/// Implementations drop fully-empty trailing rows and columns before
/// returning (see [`trim_trailing_empty`]).
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<RawTable, ReadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Delimited,
    Workbook,
}

impl TableFormat {
    /// Infer the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Per-file reader overrides. Each one applies only to the formats it names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Workbook sheet to read instead of the first one.
    pub sheet: Option<String>,
    /// Field delimiter for delimited text instead of the sniffed one.
    pub delimiter: Option<u8>,
}

/// Read a file with the reader its extension calls for.
pub fn read_table(path: &Path) -> Result<RawTable, ReadError> {
    read_table_with(path, &ReadOptions::default())
}

pub fn read_table_with(path: &Path, options: &ReadOptions) -> Result<RawTable, ReadError> {
    match TableFormat::from_path(path) {
        Some(TableFormat::Delimited) => {
            if options.sheet.is_some() {
                log::warn!("{}: sheet selection ignored for delimited text", path.display());
            }
            CsvReader { delimiter: options.delimiter }.read(path)
        }
        Some(TableFormat::Workbook) => {
            if options.delimiter.is_some() {
                log::warn!("{}: delimiter ignored for a workbook", path.display());
            }
            WorkbookReader { sheet: options.sheet.clone() }.read(path)
        }
        None => Err(ReadError::UnsupportedFormat { path: path.to_path_buf() }),
    }
}

/// Read both inputs concurrently. Either failure aborts the pair; when both
/// fail the master's error is reported.
pub fn read_both(master: &Path, secondary: &Path) -> Result<(RawTable, RawTable), ReadError> {
    let defaults = ReadOptions::default();
    read_both_with((master, &defaults), (secondary, &defaults))
}

pub fn read_both_with(
    master: (&Path, &ReadOptions),
    secondary: (&Path, &ReadOptions),
) -> Result<(RawTable, RawTable), ReadError> {
    let (master_result, secondary_result) = std::thread::scope(|scope| {
        let secondary_handle = scope.spawn(|| read_table_with(secondary.0, secondary.1));
        let master_result = read_table_with(master.0, master.1);
        let secondary_result = secondary_handle.join().unwrap_or_else(|_| {
            Err(ReadError::io(secondary.0, "reader thread panicked"))
        });
        (master_result, secondary_result)
    });
    Ok((master_result?, secondary_result?))
}

/// Drop trailing rows whose cells are all empty, then cut every row after the
/// right-most non-empty column. Interior empty rows and columns are kept.
pub fn trim_trailing_empty(mut table: RawTable) -> RawTable {
    let before_rows = table.len();
    while table
        .last()
        .is_some_and(|row| row.iter().all(CellValue::is_empty))
    {
        table.pop();
    }

    let width = table
        .iter()
        .filter_map(|row| row.iter().rposition(|c| !c.is_empty()))
        .max()
        .map_or(0, |last| last + 1);
    for row in &mut table {
        row.truncate(width);
    }

    if table.len() != before_rows {
        log::debug!("trimmed {} empty trailing row(s)", before_rows - table.len());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    const E: CellValue = CellValue::Empty;

    #[test]
    fn trims_trailing_rows_and_columns() {
        let table = vec![
            vec![t("RegNo"), t("MA3351"), E, E],
            vec![t("2123001"), t("18"), E, t("")],
            vec![E, E, E],
            vec![],
        ];
        let trimmed = trim_trailing_empty(table);
        assert_eq!(trimmed, vec![vec![t("RegNo"), t("MA3351")], vec![t("2123001"), t("18")]]);
    }

    #[test]
    fn keeps_interior_empty_rows_and_columns() {
        let table = vec![
            vec![t("RegNo"), E, t("CS3391")],
            vec![E, E, E],
            vec![t("2123001"), E, t("19")],
        ];
        let trimmed = trim_trailing_empty(table.clone());
        assert_eq!(trimmed, table);
    }

    #[test]
    fn whitespace_counts_as_content() {
        let table = vec![vec![t("RegNo")], vec![t(" ")]];
        assert_eq!(trim_trailing_empty(table).len(), 2);
    }

    #[test]
    fn all_empty_table_becomes_empty() {
        let table = vec![vec![E, E], vec![E]];
        assert!(trim_trailing_empty(table).is_empty());
    }

    #[test]
    fn width_comes_from_any_row() {
        let table = vec![vec![t("a"), E, E], vec![E, E, t("c"), E]];
        let trimmed = trim_trailing_empty(table);
        assert_eq!(trimmed[0].len(), 3);
        assert_eq!(trimmed[1].len(), 3);
    }

    #[test]
    fn format_from_extension() {
        let f = |p: &str| TableFormat::from_path(&PathBuf::from(p));
        assert_eq!(f("marks.CSV"), Some(TableFormat::Delimited));
        assert_eq!(f("marks.tsv"), Some(TableFormat::Delimited));
        assert_eq!(f("dean.xlsx"), Some(TableFormat::Workbook));
        assert_eq!(f("dean.ods"), Some(TableFormat::Workbook));
        assert_eq!(f("dean.pdf"), None);
        assert_eq!(f("dean"), None);
    }

    #[test]
    fn unsupported_extension_is_a_read_error() {
        let err = read_table(Path::new("report.pdf")).unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn options_pick_sheet_and_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let book = dir.path().join("marks.xlsx");
        crate::xlsx::export_table(&book, "Rovan", &[vec![t("RegNo"), t("MA3351")]]).unwrap();
        let text = dir.path().join("marks.txt");
        std::fs::write(&text, "RegNo|MA3351,PH3251\n2123001|18,20\n").unwrap();

        let named = ReadOptions { sheet: Some("Rovan".into()), ..ReadOptions::default() };
        assert_eq!(read_table_with(&book, &named).unwrap()[0], vec![t("RegNo"), t("MA3351")]);

        let missing = ReadOptions { sheet: Some("Dean".into()), ..ReadOptions::default() };
        let err = read_table_with(&book, &missing).unwrap_err();
        assert!(matches!(err, ReadError::SheetNotFound { .. }));

        let piped = ReadOptions { delimiter: Some(b'|'), ..ReadOptions::default() };
        let table = read_table_with(&text, &piped).unwrap();
        assert_eq!(table[1], vec![t("2123001"), t("18,20")]);
    }

    #[test]
    fn read_both_reports_the_failing_side() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("master.csv");
        std::fs::write(&good, "RegNo,MA3351\n2123001,18\n").unwrap();
        let missing = dir.path().join("absent.csv");

        let err = read_both(&good, &missing).unwrap_err();
        assert_eq!(err.path(), missing.as_path());

        let (m, s) = read_both(&good, &good).unwrap();
        assert_eq!(m, s);
        assert_eq!(m.len(), 2);
    }
}
