use std::collections::{BTreeMap, BTreeSet};

use crate::classify::classify_pair;
use crate::config::{OrientationChoice, ReconConfig};
use crate::frame::to_frame;
use crate::matrix::build_matrix;
use crate::model::{
    CellValue, ComparisonRow, Matrix, ReconResult, Reconciliation, SourceProfile, Summary,
};
use crate::normalize::normalize;
use crate::orientation::detect_orientation_with;

/// Reconcile two raw tables with default thresholds and detected orientation.
pub fn reconcile(master: &[Vec<CellValue>], secondary: &[Vec<CellValue>]) -> ReconResult {
    reconcile_with(&ReconConfig::default(), master, secondary).result
}

/// Reconcile two raw tables per config. Frames and matrices live only for
/// the duration of the call.
pub fn reconcile_with(
    config: &ReconConfig,
    master: &[Vec<CellValue>],
    secondary: &[Vec<CellValue>],
) -> Reconciliation {
    let (master_matrix, master_profile) = prepare(config, config.orientation.master, master);
    let (secondary_matrix, secondary_profile) =
        prepare(config, config.orientation.secondary, secondary);

    let result = compare(&master_matrix, &secondary_matrix);

    Reconciliation {
        master: master_profile,
        secondary: secondary_profile,
        result,
    }
}

fn prepare(
    config: &ReconConfig,
    choice: OrientationChoice,
    raw: &[Vec<CellValue>],
) -> (Matrix, SourceProfile) {
    let frame = to_frame(raw);
    let (orientation, detected) = match choice.forced() {
        Some(forced) => (forced, false),
        None => (detect_orientation_with(&frame, &config.detection), true),
    };
    let matrix = build_matrix(&frame, orientation);
    let profile = SourceProfile {
        orientation,
        detected,
        entities: matrix.entities.len(),
        attributes: matrix.attributes.len(),
    };
    (matrix, profile)
}

/// Compare two matrices over the union of their entities and attributes.
///
/// Rows come out entity-major, attribute-minor, both ascending. Pairs that
/// are empty on both sides are skipped. Every attribute of the union gets a
/// per-attribute summary, even if nothing was counted for it.
pub fn compare(master: &Matrix, secondary: &Matrix) -> ReconResult {
    let entities: BTreeSet<&str> = master
        .entities
        .iter()
        .chain(&secondary.entities)
        .map(String::as_str)
        .collect();
    let attributes: BTreeSet<&str> = master
        .attributes
        .iter()
        .chain(&secondary.attributes)
        .map(String::as_str)
        .collect();

    let mut rows = Vec::new();
    let mut summary = Summary::default();
    let mut per_attribute: BTreeMap<String, Summary> = attributes
        .iter()
        .map(|a| (a.to_string(), Summary::default()))
        .collect();

    for entity in &entities {
        for attribute in &attributes {
            let m = normalize(master.get(entity, attribute).unwrap_or(""));
            let s = normalize(secondary.get(entity, attribute).unwrap_or(""));

            let Some(status) = classify_pair(&m, &s) else {
                continue;
            };

            summary.record(status);
            if let Some(bucket) = per_attribute.get_mut(*attribute) {
                bucket.record(status);
            }

            rows.push(ComparisonRow {
                entity: entity.to_string(),
                attribute: attribute.to_string(),
                master_value: m,
                secondary_value: s,
                status,
            });
        }
    }

    summary.finalize();
    for bucket in per_attribute.values_mut() {
        bucket.finalize();
    }

    log::debug!(
        "compared {} entities x {} attributes: {} cells, {} matches, {} mismatches, {} missing",
        entities.len(),
        attributes.len(),
        summary.total,
        summary.matches,
        summary.mismatches,
        summary.missing(),
    );

    ReconResult {
        rows,
        summary,
        per_attribute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Orientation, Status};

    fn table(rows: &[&[&str]]) -> Vec<Vec<CellValue>> {
        rows.iter()
            .map(|r| r.iter().map(|s| CellValue::from(*s)).collect())
            .collect()
    }

    fn matrix(values: &[(&str, &str, &str)]) -> Matrix {
        let mut m = Matrix::default();
        for (e, a, v) in values {
            m.entities.insert(e.to_string());
            m.attributes.insert(a.to_string());
            m.values
                .entry(e.to_string())
                .or_default()
                .insert(a.to_string(), v.to_string());
        }
        m
    }

    #[test]
    fn classifies_every_outcome() {
        let master = matrix(&[("E1", "A", "10"), ("E1", "B", "5"), ("E2", "A", "7")]);
        let secondary = matrix(&[("E1", "A", "10"), ("E1", "B", "6"), ("E3", "A", "1")]);
        let result = compare(&master, &secondary);

        let got: Vec<(&str, &str, Status)> = result
            .rows
            .iter()
            .map(|r| (r.entity.as_str(), r.attribute.as_str(), r.status))
            .collect();
        assert_eq!(
            got,
            vec![
                ("E1", "A", Status::Match),
                ("E1", "B", Status::Mismatch),
                ("E2", "A", Status::MissingInSecondary),
                ("E3", "A", Status::MissingInMaster),
            ]
        );
        assert_eq!(result.summary.total, 4);
        assert_eq!(result.summary.match_percent, 25.0);
        assert_eq!(result.per_attribute["A"].total, 3);
        assert_eq!(result.per_attribute["B"].mismatches, 1);
    }

    #[test]
    fn values_compare_case_and_space_insensitively() {
        let master = matrix(&[("E1", "A", " ab ")]);
        let secondary = matrix(&[("E1", "A", "AB")]);
        let result = compare(&master, &secondary);
        assert_eq!(result.rows[0].status, Status::Match);
        assert_eq!(result.rows[0].master_value, "AB");
    }

    #[test]
    fn blank_on_both_sides_is_skipped() {
        let master = matrix(&[("E1", "A", ""), ("E1", "B", "3")]);
        let secondary = matrix(&[("E1", "A", "  ")]);
        let result = compare(&master, &secondary);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].attribute, "B");
        // Attribute A stays in the mapping with nothing counted.
        assert_eq!(result.per_attribute["A"].total, 0);
        assert_eq!(result.per_attribute["A"].mismatch_percent, 0.0);
    }

    #[test]
    fn reconcile_detects_each_side_independently() {
        let master = table(&[
            &["RegNo", "MA3351", "PH3251"],
            &["2123001", "18", "20"],
            &["2123002", "15", "18"],
            &["2123003", "17", "19"],
        ]);
        let secondary = table(&[
            &["Course", "2123001", "2123002", "2123003"],
            &["PH3251", "20", "18", "19"],
            &["MA3351", "18", "16", "17"],
        ]);
        let out = reconcile_with(&ReconConfig::default(), &master, &secondary);
        assert_eq!(out.master.orientation, Orientation::Rows);
        assert_eq!(out.secondary.orientation, Orientation::Columns);
        assert!(out.master.detected && out.secondary.detected);
        assert_eq!(out.result.summary.total, 6);
        assert_eq!(out.result.summary.mismatches, 1);
        let diff: Vec<_> = out.result.differences().collect();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].entity, "2123002");
        assert_eq!(diff[0].attribute, "MA3351");
    }

    #[test]
    fn forced_orientation_skips_detection() {
        let secondary = table(&[&["Course", "2123001"], &["MA3351", "18"]]);
        let master = table(&[&["RegNo", "MA3351"], &["2123001", "18"]]);

        let detected = reconcile(&master, &secondary);
        // Too small for the heuristic: secondary is read as rows and nothing lines up.
        assert_eq!(detected.summary.matches, 0);

        let mut config = ReconConfig::default();
        config.orientation.secondary = OrientationChoice::Columns;
        let out = reconcile_with(&config, &master, &secondary);
        assert!(!out.secondary.detected);
        assert_eq!(out.secondary.orientation, Orientation::Columns);
        assert_eq!(out.result.summary.matches, 1);
        assert_eq!(out.result.summary.total, 1);
    }
}
