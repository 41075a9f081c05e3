use super::{AllocationError, Result};
use crate::model::{SeatTally, VoteTally};
use crate::reporting::Reporter;
use itertools::Itertools;
use std::cmp::Ordering;

/// Compare `a_votes / (a_seats + 1)` with `b_votes / (b_seats + 1)` exactly.
fn compare_quotients(a_votes: u64, a_seats: u32, b_votes: u64, b_seats: u32) -> Ordering {
    let lhs = a_votes as u128 * (b_seats as u128 + 1);
    let rhs = b_votes as u128 * (a_seats as u128 + 1);
    lhs.cmp(&rhs)
}

/// Pick the entity with the highest votes-per-next-seat quotient.
///
/// Entities are scanned in tally order (lexicographic by identifier) and
/// only a strictly greater quotient displaces the current leader, so ties
/// go to the lexicographically smallest identifier.
fn next_seat_winner<'a>(seats: &'a SeatTally, votes: &VoteTally) -> Result<Option<&'a str>> {
    let mut leader: Option<(&str, u64, u32)> = None;

    for (entity, held) in seats.iter() {
        let count = votes
            .get(entity)
            .ok_or_else(|| AllocationError::MissingVotes(entity.to_string()))?;

        leader = match leader {
            Some((_, best_votes, best_seats))
                if compare_quotients(count, held, best_votes, best_seats) != Ordering::Greater =>
            {
                leader
            }
            _ => Some((entity, count, held)),
        };
    }

    Ok(leader.and_then(|(entity, count, _)| if count > 0 { Some(entity) } else { None }))
}

/// `votes / (seats + 1)` for every entity, as `{A: 1005.71, B: 997.62}`.
fn quotients_line(seats: &SeatTally, votes: &VoteTally) -> String {
    let quotients = seats
        .iter()
        .map(|(entity, held)| {
            let count = votes.get(entity).unwrap_or(0);
            format!("{}: {:.2}", entity, count as f64 / (held as f64 + 1.0))
        })
        .join(", ");
    format!("{{{}}}", quotients)
}

/// Hand out the seats left after the first stage, one per round, to the
/// entity with the highest `votes / (seats + 1)` until `target` is reached.
///
/// Runs exactly `target - seats.total()` rounds. Every entity stays in
/// contention regardless of its vote count.
pub fn allocate_highest_average(
    seats: &SeatTally,
    votes: &VoteTally,
    target: u32,
    reporter: &mut dyn Reporter,
) -> Result<SeatTally> {
    let allocated = seats.total();
    if target < allocated {
        return Err(AllocationError::TargetBelowAllocated { allocated, target });
    }

    reporter.detail(&format!("calculating Bader-Ofer for {} mandates:", target));

    let mut result = seats.clone();
    let rounds = target - allocated;

    for round in 1..=rounds {
        let before = result.total();
        let winner = next_seat_winner(&result, votes)?
            .map(str::to_string)
            .ok_or(AllocationError::NoEligibleEntity {
                seat: before + 1,
                target,
            })?;

        reporter.detail(&format!(
            "votes per future mandate: {}",
            quotients_line(&result, votes)
        ));
        result.add_seat(&winner);
        if result.total() != before + 1 {
            return Err(AllocationError::InvariantViolation(format!(
                "round {} changed the seat total from {} to {}",
                round,
                before,
                result.total()
            )));
        }

        reporter.detail(&format!(
            "round {}: seat {} goes to {}",
            round,
            result.total(),
            winner
        ));
    }

    if result.total() != target {
        return Err(AllocationError::InvariantViolation(format!(
            "highest-average stage ended with {} seats instead of {}",
            result.total(),
            target
        )));
    }

    Ok(result)
}
