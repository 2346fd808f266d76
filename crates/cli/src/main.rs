// markrecon CLI - reconcile a master mark sheet against a secondary copy

mod compare;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use markrecon_io::{ReadError, ReadOptions, TemplateKind, WriteError};
use markrecon_recon::orientation::explain_orientation;
use markrecon_recon::{OrientationChoice, ReconConfig, ReconError};

use exit_codes::{EXIT_CONFIG, EXIT_READ, EXIT_SUCCESS, EXIT_USAGE, EXIT_WRITE};

#[derive(Parser)]
#[command(name = "markrecon")]
#[command(about = "Reconcile a master mark sheet against a secondary (Rovan) copy")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two mark sheets cell by cell
    #[command(after_help = "\
Examples:
  markrecon compare master.xlsx rovan.xlsx
  markrecon compare master.csv rovan.csv --json
  markrecon compare master.xlsx rovan.xlsx --output report.csv --differences-only
  markrecon compare master.csv rovan.csv --secondary-orientation columns --strict-exit
  markrecon compare marks.xlsx marks.xlsx --master-sheet Master --secondary-sheet Rovan")]
    Compare {
        /// Authoritative sheet
        master: PathBuf,

        /// Sheet checked against the master
        secondary: PathBuf,

        /// TOML config (detection thresholds, orientation, report labels)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Export the report (csv, xlsx or json, by extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Orientation of the master sheet (overrides config)
        #[arg(long, value_name = "auto|rows|columns")]
        master_orientation: Option<OrientationChoice>,

        /// Orientation of the secondary sheet (overrides config)
        #[arg(long, value_name = "auto|rows|columns")]
        secondary_orientation: Option<OrientationChoice>,

        /// Workbook sheet to read from the master (default: first sheet)
        #[arg(long)]
        master_sheet: Option<String>,

        /// Workbook sheet to read from the secondary (default: first sheet)
        #[arg(long)]
        secondary_sheet: Option<String>,

        /// Field delimiter for delimited inputs (default: sniffed)
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Only export rows that are not a match
        #[arg(long)]
        differences_only: bool,

        /// Exit 1 when any cell differs
        #[arg(long)]
        strict_exit: bool,
    },

    /// Show which orientation a sheet is read with, and why
    #[command(after_help = "\
Examples:
  markrecon detect rovan.xlsx
  markrecon detect rovan.csv --json
  markrecon detect marks.xlsx --sheet Rovan")]
    Detect {
        file: PathBuf,

        /// TOML config (detection thresholds)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Workbook sheet to read (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// Field delimiter for delimited input (default: sniffed)
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Print the evidence as JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Write a sample input sheet (xlsx or csv, by extension)
    #[command(after_help = "\
Examples:
  markrecon template master Master_Template.xlsx
  markrecon template secondary Rovan_Template.csv")]
    Template {
        kind: TemplateArg,
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateArg {
    Master,
    Secondary,
}

impl From<TemplateArg> for TemplateKind {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Master => TemplateKind::Master,
            TemplateArg::Secondary => TemplateKind::Secondary,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            master,
            secondary,
            config,
            json,
            output,
            master_orientation,
            secondary_orientation,
            master_sheet,
            secondary_sheet,
            delimiter,
            differences_only,
            strict_exit,
        } => compare::cmd_compare(compare::CompareArgs {
            master,
            secondary,
            config,
            json,
            output,
            master_orientation,
            secondary_orientation,
            master_read: ReadOptions { sheet: master_sheet, delimiter },
            secondary_read: ReadOptions { sheet: secondary_sheet, delimiter },
            differences_only,
            strict_exit,
        }),
        Commands::Detect { file, config, sheet, delimiter, json } => {
            cmd_detect(file, config, ReadOptions { sheet, delimiter }, json)
        }
        Commands::Template { kind, output } => cmd_template(kind.into(), output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("error: {}", e.message);
            }
            if let Some(hint) = &e.hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

/// A single ASCII character, or `tab`.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" => Ok(b'\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("delimiter must be a single ASCII character or 'tab', got '{s}'")),
            }
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\ntarget:  ", env!("TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReadError> for CliError {
    fn from(err: ReadError) -> Self {
        let hint = match &err {
            ReadError::UnsupportedFormat { .. } => {
                Some("inputs must be csv, tsv, txt, xlsx, xlsm, xlsb, xls or ods".to_string())
            }
            ReadError::SheetNotFound { .. } => {
                Some("check the --sheet / --master-sheet / --secondary-sheet name".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_READ, message: err.to_string(), hint }
    }
}

impl From<WriteError> for CliError {
    fn from(err: WriteError) -> Self {
        Self::new(EXIT_WRITE, err.to_string())
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        Self::new(EXIT_CONFIG, err.to_string())
    }
}

/// Load a config file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read config {}: {e}", path.display())))?;
    let config = ReconConfig::from_toml(&text)
        .map_err(|e| CliError::from(e).with_hint(format!("in {}", path.display())))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

// ============================================================================
// detect
// ============================================================================

fn cmd_detect(
    file: PathBuf,
    config: Option<PathBuf>,
    read: ReadOptions,
    json: bool,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref())?;
    let raw = markrecon_io::read_table_with(&file, &read)?;
    let frame = markrecon_recon::to_frame(&raw);
    let evidence = explain_orientation(&frame, &config.detection);

    if json {
        let out = serde_json::to_string_pretty(&evidence)
            .map_err(|e| CliError::new(EXIT_WRITE, format!("JSON serialization error: {e}")))?;
        println!("{out}");
    }

    eprintln!(
        "{}: {} ({} header columns, {} data rows)",
        file.display(),
        evidence.orientation,
        frame.header.len(),
        frame.rows.len(),
    );
    eprintln!(
        "  first column: {} identifier(s), need {}",
        evidence.first_column_hits, evidence.first_column_threshold
    );
    eprintln!(
        "  header:       {} identifier(s), need {}",
        evidence.header_hits, evidence.header_threshold
    );
    Ok(())
}

// ============================================================================
// template
// ============================================================================

fn cmd_template(kind: TemplateKind, output: PathBuf) -> Result<(), CliError> {
    markrecon_io::write_template(kind, &output).map_err(|e| match e {
        WriteError::UnsupportedFormat(_) => {
            CliError::args(e.to_string()).with_hint("use a .xlsx or .csv output path")
        }
        other => CliError::from(other),
    })?;
    eprintln!("wrote {}", output.display());
    Ok(())
}
