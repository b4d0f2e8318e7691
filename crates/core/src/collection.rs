//! Pre-checks for collection track lists.
//!
//! The full-replace operation in the data layer relies on the caller to
//! reject bad input with a precise error instead of letting a raw
//! constraint violation surface. These checks run inside the same
//! transaction as the replace, against a snapshot of existing track ids.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Reject an ordered track list containing the same id more than once.
///
/// Positional replace gives each track exactly one slot; a duplicate is a
/// caller mistake, not a storage conflict.
pub fn ensure_unique_track_ids(ids: &[DbId]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::InvalidArgument(format!(
                "track {id} appears more than once in the ordered list"
            )));
        }
    }
    Ok(())
}

/// Return the requested ids that are absent from `existing`, preserving
/// request order.
pub fn missing_track_ids(requested: &[DbId], existing: &[DbId]) -> Vec<DbId> {
    let known: HashSet<&DbId> = existing.iter().collect();
    requested
        .iter()
        .filter(|id| !known.contains(id))
        .copied()
        .collect()
}

/// Reject a replace request referencing tracks that do not exist,
/// naming every missing id.
pub fn ensure_tracks_exist(requested: &[DbId], existing: &[DbId]) -> Result<(), CoreError> {
    let missing = missing_track_ids(requested, existing);
    if missing.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
    Err(CoreError::InvalidArgument(format!(
        "unknown track ids: {}",
        listed.join(", ")
    )))
}
