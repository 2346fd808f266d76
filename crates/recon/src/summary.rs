use std::collections::BTreeMap;

use crate::model::{Status, Summary};

/// Percentage of `part` in `total`, rounded to two decimals; 0 when `total` is 0.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 10_000.0).round() / 100.0
}

impl Summary {
    /// Count one classified cell.
    pub fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Match => self.matches += 1,
            Status::Mismatch => self.mismatches += 1,
            Status::MissingInMaster => self.missing_master += 1,
            Status::MissingInSecondary => self.missing_secondary += 1,
        }
    }

    /// Derive the percentage fields from the counters.
    pub fn finalize(&mut self) {
        self.match_percent = percent(self.matches, self.total);
        self.mismatch_percent = percent(self.mismatches, self.total);
    }

    /// Mismatch percentage recomputed from the counters, unrounded.
    pub fn mismatch_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.mismatches as f64 * 100.0 / self.total as f64
    }

    pub fn missing(&self) -> usize {
        self.missing_master + self.missing_secondary
    }

    /// Anything other than a match: mismatches plus both kinds of missing.
    pub fn differences(&self) -> usize {
        self.total - self.matches
    }
}

/// Attributes with at least one compared cell, most mismatches first.
/// Ties keep attribute order.
pub fn rank_by_mismatches(per_attribute: &BTreeMap<String, Summary>) -> Vec<(&str, &Summary)> {
    let mut ranked: Vec<(&str, &Summary)> = per_attribute
        .iter()
        .filter(|(_, s)| s.total > 0)
        .map(|(a, s)| (a.as_str(), s))
        .collect();
    ranked.sort_by(|a, b| b.1.mismatches.cmp(&a.1.mismatches));
    ranked
}

/// Attributes with at least one compared cell, highest mismatch percentage
/// first, truncated to `limit`. Ties keep attribute order.
pub fn top_by_mismatch_percent(
    per_attribute: &BTreeMap<String, Summary>,
    limit: usize,
) -> Vec<(&str, &Summary)> {
    let mut ranked: Vec<(&str, &Summary)> = per_attribute
        .iter()
        .filter(|(_, s)| s.total > 0)
        .map(|(a, s)| (a.as_str(), s))
        .collect();
    ranked.sort_by(|a, b| b.1.mismatch_rate().total_cmp(&a.1.mismatch_rate()));
    ranked.truncate(limit);
    ranked
}
