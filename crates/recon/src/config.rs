use serde::Deserialize;

use crate::error::ReconError;
use crate::model::Orientation;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub detection: DetectionConfig,
    pub orientation: OrientationConfig,
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// Orientation detection thresholds
// ---------------------------------------------------------------------------

/// Thresholds for the identifier-count heuristic.
///
/// A candidate line of cells (first column, or header row) is accepted when at
/// least `max(min_identifier_count, floor(min_identifier_fraction * n))` of its
/// `n` cells look like identifiers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    pub min_identifier_count: usize,
    pub min_identifier_fraction: f64,
}

pub const DEFAULT_MIN_IDENTIFIER_COUNT: usize = 3;
pub const DEFAULT_MIN_IDENTIFIER_FRACTION: f64 = 0.3;

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_identifier_count: DEFAULT_MIN_IDENTIFIER_COUNT,
            min_identifier_fraction: DEFAULT_MIN_IDENTIFIER_FRACTION,
        }
    }
}

impl DetectionConfig {
    /// Number of identifier-like cells required out of `n`.
    pub fn threshold(&self, n: usize) -> usize {
        let fractional = (self.min_identifier_fraction * n as f64).floor() as usize;
        self.min_identifier_count.max(fractional)
    }
}

// ---------------------------------------------------------------------------
// Orientation overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationChoice {
    #[default]
    Auto,
    Rows,
    Columns,
}

impl OrientationChoice {
    /// The forced orientation, or `None` when it should be detected.
    pub fn forced(&self) -> Option<Orientation> {
        match self {
            Self::Auto => None,
            Self::Rows => Some(Orientation::Rows),
            Self::Columns => Some(Orientation::Columns),
        }
    }
}

impl std::str::FromStr for OrientationChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "rows" => Ok(Self::Rows),
            "columns" => Ok(Self::Columns),
            other => Err(format!("unknown orientation '{other}' (expected auto, rows or columns)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrientationConfig {
    pub master: OrientationChoice,
    pub secondary: OrientationChoice,
}

// ---------------------------------------------------------------------------
// Report labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub entity_label: String,
    pub attribute_label: String,
    pub master_label: String,
    pub secondary_label: String,
    pub value_suffix: String,
    /// How many attributes the ranked summary shows.
    pub top_attributes: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            entity_label: "Register".into(),
            attribute_label: "Course".into(),
            master_label: "Master".into(),
            secondary_label: "Rovan".into(),
            value_suffix: "Mark".into(),
            top_attributes: 12,
        }
    }
}

impl ReportConfig {
    /// Export column headers, in ComparisonRow field order.
    pub fn columns(&self) -> [String; 5] {
        [
            self.entity_label.clone(),
            self.attribute_label.clone(),
            format!("{}{}", self.master_label, self.value_suffix),
            format!("{}{}", self.secondary_label, self.value_suffix),
            "Status".to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let fraction = self.detection.min_identifier_fraction;
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ReconError::ConfigValidation(format!(
                "detection.min_identifier_fraction must be between 0 and 1, got {fraction}"
            )));
        }

        if self.report.top_attributes == 0 {
            return Err(ReconError::ConfigValidation(
                "report.top_attributes must be at least 1".into(),
            ));
        }

        let labels = [
            ("entity_label", &self.report.entity_label),
            ("attribute_label", &self.report.attribute_label),
            ("master_label", &self.report.master_label),
            ("secondary_label", &self.report.secondary_label),
        ];
        for (key, value) in labels {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "report.{key} must not be empty"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
