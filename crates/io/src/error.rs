use std::fmt;
use std::path::{Path, PathBuf};

/// A file could not be turned into a table. Aborts the whole comparison.
#[derive(Debug)]
pub enum ReadError {
    /// File could not be opened or read.
    Io { path: PathBuf, message: String },
    /// Malformed delimited text.
    Csv { path: PathBuf, line: u64, message: String },
    /// Spreadsheet container could not be parsed.
    Workbook { path: PathBuf, message: String },
    /// Spreadsheet has no worksheets.
    NoSheets { path: PathBuf },
    /// Requested worksheet does not exist.
    SheetNotFound { path: PathBuf, sheet: String },
    /// Extension not recognized as a tabular format.
    UnsupportedFormat { path: PathBuf },
}

impl ReadError {
    pub fn io(path: &Path, err: impl fmt::Display) -> Self {
        Self::Io { path: path.to_path_buf(), message: err.to_string() }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Csv { path, .. }
            | Self::Workbook { path, .. }
            | Self::NoSheets { path }
            | Self::SheetNotFound { path, .. }
            | Self::UnsupportedFormat { path } => path,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Csv { path, line, message } => {
                write!(f, "{}: line {line}: {message}", path.display())
            }
            Self::Workbook { path, message } => {
                write!(f, "{}: not a readable spreadsheet: {message}", path.display())
            }
            Self::NoSheets { path } => write!(f, "{}: workbook contains no sheets", path.display()),
            Self::SheetNotFound { path, sheet } => {
                write!(f, "{}: no sheet named '{sheet}'", path.display())
            }
            Self::UnsupportedFormat { path } => write!(
                f,
                "{}: unsupported file type (expected csv, tsv, txt, xlsx, xlsm, xlsb, xls or ods)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ReadError {}

/// A report or template could not be written.
#[derive(Debug)]
pub enum WriteError {
    Io(String),
    Csv(String),
    Xlsx(String),
    Json(String),
    /// Output extension not recognized.
    UnsupportedFormat(PathBuf),
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV write error: {msg}"),
            Self::Xlsx(msg) => write!(f, "XLSX write error: {msg}"),
            Self::Json(msg) => write!(f, "JSON serialization error: {msg}"),
            Self::UnsupportedFormat(path) => write!(
                f,
                "{}: unsupported output type (expected csv, xlsx or json)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for WriteError {}

impl From<std::io::Error> for WriteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for WriteError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for WriteError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx(e.to_string())
    }
}

impl From<serde_json::Error> for WriteError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
