// Orientation detection: are entities laid out down the rows or across the header?
//
// Real exports put identifiers either in the leading column or in the header
// row. The first column is tried first; `Rows` is the fallback.

use serde::Serialize;

use crate::config::DetectionConfig;
use crate::model::{Frame, Orientation};
use crate::normalize::{looks_like_identifier, normalize, normalize_cell};

/// Counts behind an orientation decision, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrientationEvidence {
    pub orientation: Orientation,
    /// Identifier-like values in the first column.
    pub first_column_hits: usize,
    pub first_column_threshold: usize,
    /// Identifier-like header names, first header excluded.
    pub header_hits: usize,
    pub header_threshold: usize,
}

pub fn detect_orientation(frame: &Frame) -> Orientation {
    detect_orientation_with(frame, &DetectionConfig::default())
}

pub fn detect_orientation_with(frame: &Frame, config: &DetectionConfig) -> Orientation {
    explain_orientation(frame, config).orientation
}

/// Run the heuristic and report the counts it compared.
pub fn explain_orientation(frame: &Frame, config: &DetectionConfig) -> OrientationEvidence {
    let first_column_hits = (0..frame.rows.len())
        .map(|row| normalize_cell(frame.cell(row, 0)))
        .filter(|v| looks_like_identifier(v))
        .count();
    let first_column_threshold = config.threshold(frame.rows.len());

    let header_hits = frame
        .header
        .iter()
        .skip(1)
        .filter(|h| looks_like_identifier(&normalize(h)))
        .count();
    let header_threshold = config.threshold(frame.header.len());

    let orientation = if first_column_hits >= first_column_threshold {
        Orientation::Rows
    } else if header_hits >= header_threshold {
        Orientation::Columns
    } else {
        Orientation::Rows
    };

    log::debug!(
        "orientation {orientation}: first column {first_column_hits}/{first_column_threshold}, \
         header {header_hits}/{header_threshold}"
    );

    OrientationEvidence {
        orientation,
        first_column_hits,
        first_column_threshold,
        header_hits,
        header_threshold,
    }
}
