use super::bader_ofer::allocate_highest_average;
use super::first_stage::{allocate_first_stage, quota};
use super::{AllocationError, Result};
use crate::model::{SeatTally, SurplusAgreement, VoteTally};
use crate::reporting::Reporter;
use std::collections::BTreeMap;

/// Divide one alliance's seats between its two parties.
///
/// Re-runs the first stage over the pair with the alliance's seat count as
/// target, then the highest-average stage for whatever flooring left over.
pub fn split_alliance(
    agreement: &SurplusAgreement,
    alliance_seats: u32,
    party_votes: &VoteTally,
    reporter: &mut dyn Reporter,
) -> Result<SeatTally> {
    let mut pair = VoteTally::new();
    for party in [&agreement.first, &agreement.second] {
        let count = party_votes
            .get(party)
            .ok_or_else(|| AllocationError::MissingVotes(party.clone()))?;
        pair.insert(party.as_str(), count);
    }

    reporter.detail(&format!(
        "calculating split of {}, who have {} mandates",
        agreement.alliance_key(),
        alliance_seats
    ));

    if alliance_seats == 0 {
        return Ok(pair.parties().map(|party| (party, 0)).collect());
    }

    let pair_total = pair.total().ok_or(AllocationError::VoteOverflow)?;
    reporter.detail(&format!("total relevant votes: {}", pair_total));
    if pair_total > 0 {
        reporter.detail(&format!(
            "votes per seat: {:.2}",
            quota(pair_total, alliance_seats)
        ));
    }

    let first_stage = allocate_first_stage(&pair, alliance_seats)?;
    reporter.detail(&format!("after 1st stage, the result is {}", first_stage));
    if first_stage.total() == alliance_seats {
        return Ok(first_stage);
    }

    let split = allocate_highest_average(&first_stage, &pair, alliance_seats, reporter)?;
    reporter.detail(&format!("after 2nd stage, the result is {}", split));
    Ok(split)
}

/// Replace every alliance entry in `merged_seats` with its two parties.
///
/// Entries that are not alliance keys are copied as they are. Returns a new
/// tally; the seat total is unchanged.
pub fn split_alliances(
    merged_seats: &SeatTally,
    alliances: &BTreeMap<String, SurplusAgreement>,
    party_votes: &VoteTally,
    reporter: &mut dyn Reporter,
) -> Result<SeatTally> {
    let mut result = SeatTally::new();

    for (entity, held) in merged_seats.iter() {
        match alliances.get(entity) {
            Some(agreement) => {
                let split = split_alliance(agreement, held, party_votes, reporter)?;
                if split.total() != held {
                    return Err(AllocationError::InvariantViolation(format!(
                        "{} held {} seats but split into {}",
                        entity,
                        held,
                        split.total()
                    )));
                }
                for (party, seats) in split.iter() {
                    result.set(party, seats);
                }
            }
            None => result.set(entity, held),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::merge::merge_surplus_agreements;
    use crate::model::AgreementRegistry;
    use crate::reporting::testing::RecordingReporter;
    use crate::reporting::SilentReporter;

    fn votes(entries: &[(&str, u64)]) -> VoteTally {
        entries.iter().map(|(p, v)| (*p, *v)).collect()
    }

    fn seats(entries: &[(&str, u32)]) -> SeatTally {
        entries.iter().map(|(p, s)| (*p, *s)).collect()
    }

    #[test]
    fn split_uses_highest_average_for_leftover_seat() {
        let agreement = SurplusAgreement::new("A", "B");
        let split = split_alliance(
            &agreement,
            3,
            &votes(&[("A", 40), ("B", 40), ("C", 20)]),
            &mut SilentReporter,
        )
        .unwrap();
        assert_eq!(split, seats(&[("A", 2), ("B", 1)]));
    }

    #[test]
    fn split_reports_pair_totals() {
        let agreement = SurplusAgreement::new("A", "B");
        let mut reporter = RecordingReporter::default();
        split_alliance(
            &agreement,
            3,
            &votes(&[("A", 40), ("B", 40), ("C", 20)]),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(
            &reporter.details[..4],
            &[
                "calculating split of A + B, who have 3 mandates",
                "total relevant votes: 80",
                "votes per seat: 26.67",
                "after 1st stage, the result is {A: 1, B: 1}",
            ]
        );
        assert!(reporter.summaries.is_empty());
    }

    #[test]
    fn split_accepts_exact_first_stage() {
        let agreement = SurplusAgreement::new("A", "B");
        let split = split_alliance(
            &agreement,
            9,
            &votes(&[("A", 600), ("B", 300)]),
            &mut SilentReporter,
        )
        .unwrap();
        assert_eq!(split, seats(&[("A", 6), ("B", 3)]));
    }

    #[test]
    fn zero_seat_alliance_splits_to_zero() {
        let agreement = SurplusAgreement::new("A", "B");
        let split = split_alliance(
            &agreement,
            0,
            &votes(&[("A", 1), ("B", 2)]),
            &mut SilentReporter,
        )
        .unwrap();
        assert_eq!(split, seats(&[("A", 0), ("B", 0)]));
    }

    #[test]
    fn split_sums_to_alliance_seats() {
        let party_votes = votes(&[("A", 123_457), ("B", 98_765)]);
        let agreement = SurplusAgreement::new("A", "B");
        for alliance_seats in 1..=40 {
            let split =
                split_alliance(&agreement, alliance_seats, &party_votes, &mut SilentReporter)
                    .unwrap();
            assert_eq!(split.total(), alliance_seats);
        }
    }

    #[test]
    fn missing_member_votes_are_an_error() {
        let agreement = SurplusAgreement::new("A", "B");
        assert_eq!(
            split_alliance(&agreement, 2, &votes(&[("A", 10)]), &mut SilentReporter),
            Err(AllocationError::MissingVotes("B".to_string()))
        );
    }

    #[test]
    fn replaces_alliance_keys_only() {
        let mut alliances = BTreeMap::new();
        alliances.insert("A + B".to_string(), SurplusAgreement::new("A", "B"));
        let result = split_alliances(
            &seats(&[("A + B", 3), ("C", 0)]),
            &alliances,
            &votes(&[("A", 40), ("B", 40), ("C", 20)]),
            &mut SilentReporter,
        )
        .unwrap();
        assert_eq!(result, seats(&[("A", 2), ("B", 1), ("C", 0)]));
    }

    #[test]
    fn merge_then_split_restores_first_stage() {
        let stage_one = seats(&[("A", 30), ("B", 20), ("C", 15), ("D", 10)]);
        let party_votes = votes(&[("A", 3000), ("B", 2000), ("C", 1500), ("D", 1000)]);
        let registry = AgreementRegistry::new(vec![
            SurplusAgreement::new("A", "B"),
            SurplusAgreement::new("C", "D"),
        ])
        .unwrap();

        let merged =
            merge_surplus_agreements(&stage_one, &party_votes, &registry, &mut SilentReporter)
                .unwrap();
        let split = split_alliances(
            &merged.seats,
            &merged.alliances,
            &party_votes,
            &mut SilentReporter,
        )
        .unwrap();
        assert_eq!(split, stage_one);
    }
}
