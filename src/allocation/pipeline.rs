use super::bader_ofer::allocate_highest_average;
use super::first_stage::{allocate_first_stage, quota};
use super::merge::merge_surplus_agreements;
use super::split::split_alliances;
use super::threshold::{apply_threshold, ThresholdOutcome, DEFAULT_THRESHOLD_PERCENT};
use super::{AllocationError, Result};
use crate::model::{AgreementRegistry, SeatTally, VoteTally};
use crate::reporting::Reporter;
use colored::*;
use serde::Serialize;

/// Seats in the Knesset.
pub const DEFAULT_SEATS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationParams {
    pub seats: u32,
    pub threshold_percent: f64,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            seats: DEFAULT_SEATS,
            threshold_percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

/// Where the calculation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    /// The first stage already filled every seat (or nobody qualified).
    Stage1Done,
    /// Surplus seats were distributed and no alliance needed splitting.
    MergedAllocated,
    /// Alliance seats were divided back to their parties.
    SplitDone,
}

/// Surplus stage artifacts, before and after the highest-average round.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurplusStage {
    pub merged_seats: SeatTally,
    pub merged_votes: VoteTally,
    pub allocated_seats: SeatTally,
    pub alliances: Vec<String>,
}

/// Every intermediate result of one run, kept for auditing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationOutcome {
    pub seats: u32,
    pub threshold: ThresholdOutcome,
    pub quota: Option<f64>,
    pub first_stage: SeatTally,
    pub surplus: Option<SurplusStage>,
    pub final_seats: SeatTally,
    pub state: PipelineState,
}

/// Run the full two-stage allocation over a raw tally.
///
/// Threshold, first stage, and if seats remain: merge surplus agreements,
/// distribute the remainder by highest average, split alliances back.
pub fn allocate_mandates(
    votes: &VoteTally,
    params: &AllocationParams,
    registry: &AgreementRegistry,
    reporter: &mut dyn Reporter,
) -> Result<AllocationOutcome> {
    if params.seats == 0 {
        return Err(AllocationError::ZeroSeatTarget);
    }
    if votes.total().ok_or(AllocationError::VoteOverflow)? == 0 {
        return Err(AllocationError::NoVotes);
    }

    let threshold = apply_threshold(votes, params.threshold_percent)?;
    reporter.summary(&format!(
        "valid votes: {}",
        threshold.valid_votes.to_string().bright_cyan()
    ));
    reporter.summary(&format!(
        "pass percentage votes: {}",
        format!("{:.2}", threshold.threshold_votes).bright_cyan()
    ));
    reporter.summary(&format!(
        "relevant votes ({} parties): {}",
        threshold.qualified.len(),
        threshold.qualified
    ));
    if !threshold.eliminated.is_empty() {
        reporter.summary(&format!(
            "below threshold: {}",
            threshold.eliminated.to_string().red()
        ));
    }

    if threshold.qualified.is_empty() {
        reporter.summary(&"⚠️  No party passed the threshold".yellow().to_string());
        return Ok(AllocationOutcome {
            seats: params.seats,
            threshold,
            quota: None,
            first_stage: SeatTally::new(),
            surplus: None,
            final_seats: SeatTally::new(),
            state: PipelineState::Stage1Done,
        });
    }

    let relevant_total = threshold
        .qualified
        .total()
        .ok_or(AllocationError::VoteOverflow)?;
    let seat_quota = quota(relevant_total, params.seats);
    reporter.summary(&format!(
        "total relevant votes: {}",
        relevant_total.to_string().bright_cyan()
    ));
    reporter.summary(&format!(
        "votes per seat: {}",
        format!("{:.2}", seat_quota).bright_cyan()
    ));

    let first_stage = allocate_first_stage(&threshold.qualified, params.seats)?;
    reporter.summary(&format!(
        "mandates distribution after 1st stage: {}",
        first_stage
    ));
    reporter.summary(&format!(
        "total mandates after 1st stage: {}",
        first_stage.total().to_string().bright_yellow()
    ));

    if first_stage.total() >= params.seats {
        return Ok(AllocationOutcome {
            seats: params.seats,
            quota: Some(seat_quota),
            final_seats: first_stage.clone(),
            first_stage,
            threshold,
            surplus: None,
            state: PipelineState::Stage1Done,
        });
    }

    let merged =
        merge_surplus_agreements(&first_stage, &threshold.qualified, registry, reporter)?;
    reporter.summary(&format!("surplus mandates distribution: {}", merged.seats));

    let allocated =
        allocate_highest_average(&merged.seats, &merged.votes, params.seats, reporter)?;
    reporter.summary(&format!(
        "surplus mandates distribution after Bader-Ofer: {}",
        allocated
    ));

    let (final_seats, state) = if merged.has_alliances() {
        let split = split_alliances(
            &allocated,
            &merged.alliances,
            &threshold.qualified,
            reporter,
        )?;
        (split, PipelineState::SplitDone)
    } else {
        (allocated.clone(), PipelineState::MergedAllocated)
    };

    if final_seats.total() != params.seats {
        return Err(AllocationError::InvariantViolation(format!(
            "final distribution holds {} seats instead of {}",
            final_seats.total(),
            params.seats
        )));
    }

    Ok(AllocationOutcome {
        seats: params.seats,
        threshold,
        quota: Some(seat_quota),
        first_stage,
        surplus: Some(SurplusStage {
            merged_seats: merged.seats,
            merged_votes: merged.votes,
            allocated_seats: allocated,
            alliances: merged.alliances.keys().cloned().collect(),
        }),
        final_seats,
        state,
    })
}
