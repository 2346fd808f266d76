use crate::model::Status;

/// Classify one normalized (master, secondary) value pair.
///
/// Returns `None` when both sides are empty: the pairing never appeared in
/// either source and is neither reported nor counted. An explicit blank cell
/// and a cell that was never supplied are indistinguishable here.
pub fn classify_pair(master: &str, secondary: &str) -> Option<Status> {
    match (master.is_empty(), secondary.is_empty()) {
        (true, true) => None,
        (true, false) => Some(Status::MissingInMaster),
        (false, true) => Some(Status::MissingInSecondary),
        (false, false) if master == secondary => Some(Status::Match),
        (false, false) => Some(Status::Mismatch),
    }
}
