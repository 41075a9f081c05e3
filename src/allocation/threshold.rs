use super::{AllocationError, Result};
use crate::model::VoteTally;
use serde::Serialize;

/// Qualifying share of valid votes, in percent.
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 3.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdOutcome {
    pub valid_votes: u64,
    pub threshold_votes: f64,
    pub qualified: VoteTally,
    pub eliminated: VoteTally,
}

/// Split a tally into parties at or above the qualifying threshold and the rest.
///
/// The threshold is sized from every party in the tally, including those
/// that end up eliminated.
pub fn apply_threshold(votes: &VoteTally, percent: f64) -> Result<ThresholdOutcome> {
    if !(0.0..=100.0).contains(&percent) {
        return Err(AllocationError::InvalidThreshold(percent.to_string()));
    }

    let valid_votes = votes.total().ok_or(AllocationError::VoteOverflow)?;
    let threshold_votes = valid_votes as f64 / 100.0 * percent;

    let (qualified, eliminated): (Vec<_>, Vec<_>) = votes
        .iter()
        .partition(|(_, count)| *count as f64 >= threshold_votes);

    Ok(ThresholdOutcome {
        valid_votes,
        threshold_votes,
        qualified: qualified.into_iter().collect(),
        eliminated: eliminated.into_iter().collect(),
    })
}
