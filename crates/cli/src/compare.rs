//! `markrecon compare`: read both sheets, reconcile, report.

use std::path::PathBuf;

use markrecon_io::{json, ReadOptions};
use markrecon_recon::summary::top_by_mismatch_percent;
use markrecon_recon::{OrientationChoice, Reconciliation, ReportConfig, SourceProfile, Status};

use crate::exit_codes::{EXIT_DIFFERENCES, EXIT_WRITE};
use crate::{load_config, CliError};

pub struct CompareArgs {
    pub master: PathBuf,
    pub secondary: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub master_orientation: Option<OrientationChoice>,
    pub secondary_orientation: Option<OrientationChoice>,
    pub master_read: ReadOptions,
    pub secondary_read: ReadOptions,
    pub differences_only: bool,
    pub strict_exit: bool,
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(choice) = args.master_orientation {
        config.orientation.master = choice;
    }
    if let Some(choice) = args.secondary_orientation {
        config.orientation.secondary = choice;
    }

    let (master_raw, secondary_raw) = markrecon_io::read_both_with(
        (args.master.as_path(), &args.master_read),
        (args.secondary.as_path(), &args.secondary_read),
    )?;
    let recon = markrecon_recon::reconcile_with(&config, &master_raw, &secondary_raw);

    if args.json {
        let out = json::to_string(&recon, args.differences_only)
            .map_err(|e| CliError::new(EXIT_WRITE, e.to_string()))?;
        println!("{out}");
    }

    if let Some(ref path) = args.output {
        let exported = exported_rows(&recon, args.differences_only);
        if exported == 0 {
            eprintln!("warning: no differences found (report empty), nothing written to {}", path.display());
        } else {
            markrecon_io::export_report(path, &recon, &config.report, args.differences_only)?;
            eprintln!("wrote {} row(s) to {}", exported, path.display());
        }
    }

    print_summary(&recon, &config.report);

    let differences = recon.result.summary.differences();
    if args.strict_exit && differences > 0 {
        return Err(CliError::new(EXIT_DIFFERENCES, format!("{differences} difference(s) found")));
    }
    Ok(())
}

fn exported_rows(recon: &Reconciliation, differences_only: bool) -> usize {
    if differences_only {
        recon.result.rows.iter().filter(|r| r.status != Status::Match).count()
    } else {
        recon.result.rows.len()
    }
}

fn describe_source(name: &str, profile: &SourceProfile, labels: &ReportConfig) -> String {
    format!(
        "{name}: {} ({}), {} {}(s) x {} {}(s)",
        profile.orientation,
        if profile.detected { "detected" } else { "forced" },
        profile.entities,
        labels.entity_label.to_lowercase(),
        profile.attributes,
        labels.attribute_label.to_lowercase(),
    )
}

/// Human summary to stderr.
fn print_summary(recon: &Reconciliation, labels: &ReportConfig) {
    let s = &recon.result.summary;
    eprintln!("{}", describe_source(&labels.master_label, &recon.master, labels));
    eprintln!("{}", describe_source(&labels.secondary_label, &recon.secondary, labels));
    eprintln!(
        "{} cell(s) compared: {} match ({:.2}%), {} mismatch ({:.2}%), {} missing in {}, {} missing in {}",
        s.total,
        s.matches,
        s.match_percent,
        s.mismatches,
        s.mismatch_percent,
        s.missing_master,
        labels.master_label,
        s.missing_secondary,
        labels.secondary_label,
    );

    let top = top_by_mismatch_percent(&recon.result.per_attribute, labels.top_attributes);
    if top.iter().any(|(_, a)| a.mismatches > 0) {
        eprintln!("{} by mismatch:", labels.attribute_label);
        for (attribute, a) in top.iter().filter(|(_, a)| a.mismatches > 0) {
            eprintln!("  {attribute:<12} {:>6.2}%  ({}/{})", a.mismatch_percent, a.mismatches, a.total);
        }
    }
}
