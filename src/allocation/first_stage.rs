use super::{AllocationError, Result};
use crate::model::{SeatTally, VoteTally};

/// Votes needed for one full seat, as a real number.
pub fn quota(total_votes: u64, seats: u32) -> f64 {
    total_votes as f64 / seats as f64
}

/// Give each party `floor(votes / quota)` seats.
///
/// The division is done as `floor(votes * seats / total)` in integers,
/// which is the same value without floating point error at exact multiples.
/// The sum of the result never exceeds `seats`. Reporting the total and
/// quota is left to the caller, which knows which level it is at.
pub fn allocate_first_stage(votes: &VoteTally, seats: u32) -> Result<SeatTally> {
    if seats == 0 {
        return Err(AllocationError::ZeroSeatTarget);
    }
    let total = votes.total().ok_or(AllocationError::VoteOverflow)?;
    if total == 0 {
        return Err(AllocationError::NoVotes);
    }

    let allocation = votes
        .iter()
        .map(|(party, count)| {
            let party_seats = (count as u128 * seats as u128) / total as u128;
            (party, party_seats as u32)
        })
        .collect();

    Ok(allocation)
}
