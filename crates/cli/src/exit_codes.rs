//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | Differences found (only with `compare --strict-exit`)    |
//! | 2    | Usage error (bad arguments, unreadable config file)      |
//! | 3    | An input table could not be read                         |
//! | 4    | Config file parsed but is invalid                        |
//! | 5    | Report or template could not be written                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// `compare --strict-exit` found at least one non-matching cell.
/// Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_DIFFERENCES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Reading an input table failed (missing file, unsupported type, malformed CSV or workbook).
pub const EXIT_READ: u8 = 3;

/// Config file could not be parsed or failed validation.
pub const EXIT_CONFIG: u8 = 4;

/// Writing a report or template failed.
pub const EXIT_WRITE: u8 = 5;
