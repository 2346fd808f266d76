use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A scalar read from a table cell.
///
/// Every variant collapses to a string before comparison; numbers are
/// stringified, never parsed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// True for `Empty` and for zero-length text. Whitespace is not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
            Self::Empty => true,
        }
    }

    /// String form with surrounding whitespace removed ("" for `Empty`).
    pub fn to_trimmed_string(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => format_number(*n),
            Self::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Empty)
    }
}

/// Integers without decimals, everything else in shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Rectangular-ish grid of raw cells as handed over by a table reader.
/// Rows may be ragged; a missing cell reads as `Empty`.
pub type RawTable = Vec<Vec<CellValue>>;

// ---------------------------------------------------------------------------
// Frame + Matrix
// ---------------------------------------------------------------------------

/// Header row plus one keyed record per data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub header: Vec<String>,
    pub rows: Vec<HashMap<String, CellValue>>,
}

impl Frame {
    /// Cell of `row` under header column `col`, `Empty` when absent.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.header
            .get(col)
            .and_then(|name| self.rows.get(row).and_then(|r| r.get(name)))
            .unwrap_or(&EMPTY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// First column holds entities; remaining headers are attributes.
    Rows,
    /// First column holds attributes; remaining headers are entities.
    Columns,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rows => write!(f, "rows"),
            Self::Columns => write!(f, "columns"),
        }
    }
}

/// Normalized entity × attribute lookup built from one source table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix {
    pub entities: BTreeSet<String>,
    pub attributes: BTreeSet<String>,
    pub values: HashMap<String, HashMap<String, String>>,
}

impl Matrix {
    pub fn get(&self, entity: &str, attribute: &str) -> Option<&str> {
        self.values
            .get(entity)
            .and_then(|row| row.get(attribute))
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Match,
    Mismatch,
    #[serde(rename = "Missing in Master")]
    MissingInMaster,
    #[serde(rename = "Missing in Secondary")]
    MissingInSecondary,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Match => "Match",
            Status::Mismatch => "Mismatch",
            Status::MissingInMaster => "Missing in Master",
            Status::MissingInSecondary => "Missing in Secondary",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub entity: String,
    pub attribute: String,
    pub master_value: String,
    pub secondary_value: String,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub missing_master: usize,
    pub missing_secondary: usize,
    pub match_percent: f64,
    pub mismatch_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconResult {
    pub rows: Vec<ComparisonRow>,
    pub summary: Summary,
    pub per_attribute: BTreeMap<String, Summary>,
}

impl ReconResult {
    /// Rows whose status is anything but `Match`, in report order.
    pub fn differences(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| r.status != Status::Match)
    }
}

/// What the engine decided about one input table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceProfile {
    pub orientation: Orientation,
    /// False when the orientation was forced by configuration.
    pub detected: bool,
    pub entities: usize,
    pub attributes: usize,
}

/// Full outcome of one compare invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub master: SourceProfile,
    pub secondary: SourceProfile,
    #[serde(flatten)]
    pub result: ReconResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_stringify_without_parsing() {
        assert_eq!(CellValue::Number(18.0).to_trimmed_string(), "18");
        assert_eq!(CellValue::Number(18.5).to_trimmed_string(), "18.5");
        assert_eq!(CellValue::Number(-3.0).to_trimmed_string(), "-3");
        assert_eq!(CellValue::Text("  07 ".into()).to_trimmed_string(), "07");
        assert_eq!(CellValue::Empty.to_trimmed_string(), "");
    }

    #[test]
    fn emptiness() {
        assert!(CellValue::Empty.is_empty());
        assert!(CellValue::Text(String::new()).is_empty());
        assert!(!CellValue::Text(" ".into()).is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
    }

    #[test]
    fn status_serializes_with_display_names() {
        let json = serde_json::to_string(&Status::MissingInSecondary).unwrap();
        assert_eq!(json, "\"Missing in Secondary\"");
        assert_eq!(Status::MissingInMaster.to_string(), "Missing in Master");
    }

    #[test]
    fn frame_cell_defaults_to_empty() {
        let frame = Frame {
            header: vec!["RegNo".into()],
            rows: vec![HashMap::new()],
        };
        assert_eq!(frame.cell(0, 0), &CellValue::Empty);
        assert_eq!(frame.cell(5, 9), &CellValue::Empty);
    }
}
