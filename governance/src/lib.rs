//! Treasury governance.
//!
//! Lifecycle: Active (voting open) → AwaitingExecution (deadline passed) → Executed.
//! There is no Rejected state: whether a proposal may execute is recomputed
//! from its counts, the clock and the aggregate on every read.
//!
//! Key principle: one address = one vote. Balance is a gate, never a weight.

pub mod engine;
pub mod error;
pub mod payout;
pub mod proposal;
pub mod store;

pub use engine::{ProposalDraft, VotingEngine};
pub use error::GovernanceError;
pub use payout::{PayoutError, PayoutSink};
pub use proposal::{Proposal, ProposalState, VoteRecord};
pub use store::ProposalStore;
