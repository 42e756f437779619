//! Events emitted by state-mutating treasury operations.

use crate::{Address, Amount, ProposalId, Timestamp, VoteChoice};
use serde::{Deserialize, Serialize};

/// Observable outcome of a successful mutating operation.
///
/// Operations return these as values; delivering them to observers is the
/// caller's concern and never affects whether the operation succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TreasuryEvent {
    /// A member added funds to the pool.
    Deposited { member: Address, amount: Amount },
    /// A new proposal entered its voting window.
    ProposalCreated {
        id: ProposalId,
        creator: Address,
        recipient: Address,
        amount: Amount,
        deadline: Timestamp,
        description: String,
    },
    /// A member cast or changed a vote.
    VoteCast {
        id: ProposalId,
        voter: Address,
        choice: VoteChoice,
    },
    /// An approved proposal paid out.
    ProposalExecuted {
        id: ProposalId,
        recipient: Address,
        amount: Amount,
    },
}

impl TreasuryEvent {
    /// Short name for logs and subscription filters.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "deposited",
            Self::ProposalCreated { .. } => "proposal_created",
            Self::VoteCast { .. } => "vote_cast",
            Self::ProposalExecuted { .. } => "proposal_executed",
        }
    }
}
