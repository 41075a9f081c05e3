pub mod agreement;
pub mod tally;

pub use agreement::{AgreementRegistry, SurplusAgreement};
pub use tally::{SeatTally, VoteTally};
