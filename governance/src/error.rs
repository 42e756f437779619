use coffer_ledger::LedgerError;
use coffer_types::{Amount, ProposalId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("insufficient balance to create proposal: have {balance}, need {required}")]
    InsufficientBalanceToPropose { balance: Amount, required: Amount },

    #[error("insufficient balance to vote: have {balance}, need {required}")]
    InsufficientBalanceToVote { balance: Amount, required: Amount },

    #[error("invalid recipient: zero address")]
    InvalidRecipient,

    #[error("proposal amount must be greater than zero")]
    ZeroAmount,

    #[error("proposal amount {amount} exceeds treasury aggregate {aggregate}")]
    AmountExceedsAggregate { amount: Amount, aggregate: Amount },

    #[error("voting duration must be greater than zero")]
    InvalidDuration,

    #[error("invalid proposal id {0}")]
    InvalidProposalId(ProposalId),

    #[error("voting period has ended")]
    VotingEnded,

    #[error("voting period has not ended (deadline {deadline})")]
    VotingNotEnded { deadline: Timestamp },

    #[error("execution delay not passed (eligible at {eligible_at})")]
    ExecutionDelayNotPassed { eligible_at: Timestamp },

    #[error("proposal not approved: {for_votes} for, {against_votes} against")]
    NotApproved { for_votes: u64, against_votes: u64 },

    #[error("insufficient funds: need {needed}, aggregate holds {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("proposal {0} already executed")]
    AlreadyExecuted(ProposalId),

    #[error("transfer to recipient failed: {0}")]
    PayoutFailed(String),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
