pub mod bader_ofer;
pub mod first_stage;
pub mod merge;
pub mod pipeline;
pub mod split;
pub mod threshold;

pub use pipeline::{allocate_mandates, AllocationOutcome, AllocationParams};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Seat target must be greater than zero")]
    ZeroSeatTarget,
    #[error("Cannot allocate seats over a tally with zero votes")]
    NoVotes,
    #[error("Vote total does not fit in a 64-bit count")]
    VoteOverflow,
    #[error("Qualifying threshold must be between 0 and 100 percent, got {0}")]
    InvalidThreshold(String),
    #[error("Seat target {target} is below the {allocated} seats already allocated")]
    TargetBelowAllocated { allocated: u32, target: u32 },
    #[error("No vote count for {0}")]
    MissingVotes(String),
    #[error("No entity can receive seat {seat} of {target}")]
    NoEligibleEntity { seat: u32, target: u32 },
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, AllocationError>;
