// CSV/TSV import, CSV report export

use std::io::Write;
use std::path::Path;

use markrecon_recon::{CellValue, RawTable, ReconResult, ReportConfig};

use crate::error::{ReadError, WriteError};
use crate::table::{trim_trailing_empty, TableReader};

/// Delimited-text reader. Sniffs the delimiter unless one is given.
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    pub delimiter: Option<u8>,
}

impl CsvReader {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter: Some(delimiter) }
    }
}

impl TableReader for CsvReader {
    fn read(&self, path: &Path) -> Result<RawTable, ReadError> {
        let content = read_file_as_utf8(path)?;
        let delimiter = match self.delimiter {
            Some(d) => d,
            None if has_tsv_extension(path) => b'\t',
            None => sniff_delimiter(&content),
        };
        log::debug!("{}: reading with delimiter {:?}", path.display(), delimiter as char);
        parse_delimited(&content, delimiter).map_err(|(line, message)| ReadError::Csv {
            path: path.to_path_buf(),
            line,
            message,
        })
    }
}

/// Delimiter a path's extension calls for: tab for `.tsv`, comma otherwise.
pub fn delimiter_for_path(path: &Path) -> u8 {
    if has_tsv_extension(path) {
        b'\t'
    } else {
        b','
    }
}

fn has_tsv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"))
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Higher field count breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReadError> {
    let bytes = std::fs::read(path).map_err(|e| ReadError::io(path, e))?;

    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            // Fall back to Windows-1252 (common for Excel-exported CSVs)
            log::warn!("{}: not valid UTF-8, decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Parse delimited text into raw cells. Errors carry the 1-based line number.
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<RawTable, (u64, String)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table = RawTable::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            (line, e.to_string())
        })?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(field.to_string())
                }
            })
            .collect();
        table.push(row);
    }

    Ok(trim_trailing_empty(table))
}

// ---------------------------------------------------------------------------
// Report export
// ---------------------------------------------------------------------------

/// Write the comparison rows as CSV: every field quoted, CRLF line endings.
pub fn write_report<W: Write>(
    writer: W,
    result: &ReconResult,
    labels: &ReportConfig,
    differences_only: bool,
) -> Result<(), WriteError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(labels.columns())?;
    for row in &result.rows {
        if differences_only && row.status == markrecon_recon::Status::Match {
            continue;
        }
        writer.write_record([
            row.entity.as_str(),
            row.attribute.as_str(),
            row.master_value.as_str(),
            row.secondary_value.as_str(),
            row.status.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_report(
    path: &Path,
    result: &ReconResult,
    labels: &ReportConfig,
    differences_only: bool,
) -> Result<(), WriteError> {
    let file = std::fs::File::create(path)?;
    write_report(std::io::BufWriter::new(file), result, labels, differences_only)
}

/// Write a raw table as delimited text (used for templates).
pub fn export_table(path: &Path, table: &[Vec<CellValue>], delimiter: u8) -> Result<(), WriteError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;
    for row in table {
        writer.write_record(row.iter().map(CellValue::to_trimmed_string))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn t(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    #[test]
    fn test_sniff_semicolon_delimiter() {
        let content = "RegNo;MA3351;PH3251\n2123001;18;20\n2123002;15;18\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "RegNo,MA3351,PH3251\n2123001,18,20\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_tab_delimiter() {
        let content = "RegNo\tMA3351\tPH3251\n2123001\t18\t20\n";
        assert_eq!(sniff_delimiter(content), b'\t');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "Name;Remark;MA3351\n\"Doe, Jane\";\"late, resit\";18\nBob;\"ok\";15\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn test_parse_maps_empty_fields_to_empty() {
        let table = parse_delimited("RegNo,MA3351,PH3251\n2123001,,20\n", b',').unwrap();
        assert_eq!(table[1], vec![t("2123001"), CellValue::Empty, t("20")]);
    }

    #[test]
    fn test_parse_trims_trailing_blank_rows_and_columns() {
        let table = parse_delimited("RegNo,MA3351,,\n2123001,18,,\n,,,\n,,,\n", b',').unwrap();
        assert_eq!(table, vec![vec![t("RegNo"), t("MA3351")], vec![t("2123001"), t("18")]]);
    }

    #[test]
    fn test_parse_keeps_ragged_rows() {
        let table = parse_delimited("RegNo,MA3351,PH3251\n2123001\n", b',').unwrap();
        assert_eq!(table[1], vec![t("2123001")]);
    }

    #[test]
    fn test_read_strips_bom_and_sniffs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("master.csv");
        fs::write(&path, "\u{feff}RegNo;MA3351\n2123001;18\n").unwrap();

        let table = CsvReader::default().read(&path).unwrap();
        assert_eq!(table[0], vec![t("RegNo"), t("MA3351")]);
        assert_eq!(table[1], vec![t("2123001"), t("18")]);
    }

    #[test]
    fn test_read_windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin.csv");
        // "Désirée" in Windows-1252
        let mut bytes = b"Name,MA3351\nD".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"sir");
        bytes.push(0xE9);
        bytes.extend_from_slice(b"e,18\n");
        fs::write(&path, bytes).unwrap();

        let table = CsvReader::default().read(&path).unwrap();
        assert_eq!(table[1][0], t("Désirée"));
    }

    #[test]
    fn test_tsv_extension_forces_tab() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("marks.tsv");
        fs::write(&path, "RegNo\tRemark\n2123001\tlate; resit\n").unwrap();
        let table = CsvReader::default().read(&path).unwrap();
        assert_eq!(table[1][1], t("late; resit"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CsvReader::default().read(Path::new("/nonexistent/master.csv")).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
        assert!(err.to_string().contains("master.csv"));
    }

    #[test]
    fn test_empty_file_gives_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        let table = CsvReader::with_delimiter(b',').read(&path).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_write_report_quotes_everything_with_crlf() {
        let master = vec![vec![t("RegNo"), t("MA3351")], vec![t("2123001"), t("18")]];
        let secondary = vec![vec![t("RegNo"), t("MA3351")], vec![t("2123001"), t("20")]];
        let result = markrecon_recon::reconcile(&master, &secondary);

        let mut out = Vec::new();
        write_report(&mut out, &result, &ReportConfig::default(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\"Register\",\"Course\",\"MasterMark\",\"RovanMark\",\"Status\"\r\n\
             \"2123001\",\"MA3351\",\"18\",\"20\",\"Mismatch\"\r\n"
        );
    }

    #[test]
    fn test_write_report_differences_only() {
        let master = vec![
            vec![t("RegNo"), t("MA3351"), t("PH3251")],
            vec![t("2123001"), t("18"), t("20")],
        ];
        let secondary = vec![
            vec![t("RegNo"), t("MA3351"), t("PH3251")],
            vec![t("2123001"), t("18"), t("19")],
        ];
        let result = markrecon_recon::reconcile(&master, &secondary);

        let mut out = Vec::new();
        write_report(&mut out, &result, &ReportConfig::default(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("\"PH3251\""));
        assert!(!text.contains("\"Match\""));
    }

    #[test]
    fn test_delimiter_for_path() {
        assert_eq!(delimiter_for_path(Path::new("marks.TSV")), b'\t');
        assert_eq!(delimiter_for_path(Path::new("marks.csv")), b',');
        assert_eq!(delimiter_for_path(Path::new("marks.txt")), b',');
    }

    #[test]
    fn test_export_table_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("template.csv");
        let table = vec![
            vec![t("RegNo"), t("MA3351")],
            vec![t("2123001"), CellValue::Number(18.0)],
        ];
        export_table(&path, &table, b',').unwrap();
        let back = CsvReader::default().read(&path).unwrap();
        assert_eq!(back[1], vec![t("2123001"), t("18")]);
    }
}
