// JSON report export

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use markrecon_recon::{ComparisonRow, Reconciliation, SourceProfile, Status, Summary};

use crate::error::WriteError;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    /// RFC 3339 timestamp of the run.
    pub run_at: String,
}

impl ReportMeta {
    pub fn now() -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Serialized shape of a reconciliation report.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub meta: ReportMeta,
    pub master: &'a SourceProfile,
    pub secondary: &'a SourceProfile,
    pub summary: &'a Summary,
    pub per_attribute: &'a BTreeMap<String, Summary>,
    pub rows: Vec<&'a ComparisonRow>,
}

impl<'a> JsonReport<'a> {
    pub fn new(recon: &'a Reconciliation, meta: ReportMeta, differences_only: bool) -> Self {
        let rows = recon
            .result
            .rows
            .iter()
            .filter(|r| !differences_only || r.status != Status::Match)
            .collect();
        Self {
            meta,
            master: &recon.master,
            secondary: &recon.secondary,
            summary: &recon.result.summary,
            per_attribute: &recon.result.per_attribute,
            rows,
        }
    }
}

pub fn to_string(recon: &Reconciliation, differences_only: bool) -> Result<String, WriteError> {
    let report = JsonReport::new(recon, ReportMeta::now(), differences_only);
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn write_report<W: Write>(
    writer: W,
    recon: &Reconciliation,
    differences_only: bool,
) -> Result<(), WriteError> {
    let report = JsonReport::new(recon, ReportMeta::now(), differences_only);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

pub fn export_report(path: &Path, recon: &Reconciliation, differences_only: bool) -> Result<(), WriteError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    write_report(&mut writer, recon, differences_only)?;
    writer.flush()?;
    Ok(())
}
