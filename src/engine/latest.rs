//! Latest-observation selection.

use super::models::Observation;

/// Return the observation with the greatest timestamp, or `None` when there
/// are no observations.
///
/// Observations sharing the greatest timestamp resolve to the last one in
/// input order, so the choice among equal timestamps depends on how the
/// source ordered them.
pub fn select_latest(observations: &[Observation]) -> Option<&Observation> {
    observations
        .iter()
        .max_by(|a, b| a.timestamp.cmp(&b.timestamp))
}

/// True when a record orders some observations by epoch and others by text.
pub fn has_mixed_timestamps(observations: &[Observation]) -> bool {
    let mut kinds = observations
        .iter()
        .filter_map(|o| o.timestamp.as_ref())
        .map(|t| t.is_epoch());

    match kinds.next() {
        Some(first) => kinds.any(|k| k != first),
        None => false,
    }
}
