use super::{AllocationError, Result};
use crate::model::{AgreementRegistry, SeatTally, SurplusAgreement, VoteTally};
use crate::reporting::Reporter;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Tallies where every active surplus agreement is folded into one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedTally {
    pub seats: SeatTally,
    pub votes: VoteTally,
    /// Alliance key to the agreement it stands for.
    pub alliances: BTreeMap<String, SurplusAgreement>,
}

impl MergedTally {
    pub fn has_alliances(&self) -> bool {
        !self.alliances.is_empty()
    }
}

/// Combine the seats and votes of parties bound by a surplus agreement.
///
/// An agreement applies only when both parties hold an entry in the
/// first-stage tally. Other parties pass through under their own name.
/// The inputs are left untouched.
pub fn merge_surplus_agreements(
    seats: &SeatTally,
    votes: &VoteTally,
    registry: &AgreementRegistry,
    reporter: &mut dyn Reporter,
) -> Result<MergedTally> {
    let mut merged_seats = SeatTally::new();
    let mut merged_votes = VoteTally::new();
    let mut alliances = BTreeMap::new();
    let mut bound: HashSet<&str> = HashSet::new();

    for agreement in registry.iter() {
        let first = (seats.get(&agreement.first), votes.get(&agreement.first));
        let second = (seats.get(&agreement.second), votes.get(&agreement.second));

        match (first, second) {
            ((Some(s1), Some(v1)), (Some(s2), Some(v2)))
                if !bound.contains(agreement.first.as_str())
                    && !bound.contains(agreement.second.as_str()) =>
            {
                let key = agreement.alliance_key();
                let alliance_votes = v1.checked_add(v2).ok_or(AllocationError::VoteOverflow)?;
                merged_seats.set(key.clone(), s1 + s2);
                merged_votes.insert(key.clone(), alliance_votes);
                bound.insert(agreement.first.as_str());
                bound.insert(agreement.second.as_str());
                reporter.detail(&format!(
                    "surplus agreement {}: {} votes, {} seats",
                    key,
                    alliance_votes,
                    s1 + s2
                ));
                alliances.insert(key, agreement.clone());
            }
            _ => {
                reporter.detail(&format!(
                    "surplus agreement {} not applied: both parties must pass the threshold",
                    agreement.alliance_key()
                ));
            }
        }
    }

    for (party, held) in seats.iter() {
        if bound.contains(party) {
            continue;
        }
        merged_seats.set(party, held);
        if let Some(count) = votes.get(party) {
            merged_votes.insert(party, count);
        }
    }

    Ok(MergedTally {
        seats: merged_seats,
        votes: merged_votes,
        alliances,
    })
}
