// Identifier canonicalization and the register-like heuristic.

use crate::model::CellValue;

/// Minimum trimmed length for a string to count as identifier-like.
pub const MIN_IDENTIFIER_LEN: usize = 3;

/// Trim and upper-case. Total and idempotent.
pub fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// `normalize` over a raw cell; `Empty` becomes "".
pub fn normalize_cell(value: &CellValue) -> String {
    normalize(&value.to_trimmed_string())
}

/// Heuristic: does this look like an entity identifier (e.g. a register number)?
///
/// True iff the trimmed string is at least [`MIN_IDENTIFIER_LEN`] characters
/// long and contains an ASCII digit. Any alphanumeric scheme passes as long as
/// it has a digit; purely numeric strings shorter than three characters never
/// do.
pub fn looks_like_identifier(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.chars().count() >= MIN_IDENTIFIER_LEN && trimmed.chars().any(|c| c.is_ascii_digit())
}
