//! Treasury proposals and their lifecycle.

use coffer_types::{Address, Amount, ProposalId, Timestamp, VoteChoice};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a proposal, derived from its flags and the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Before the deadline and not executed: votes are accepted.
    Active,
    /// Deadline passed, not yet executed. Covers both the cooldown before the
    /// execution-eligible time and proposals that never gathered approval.
    AwaitingExecution,
    /// Paid out. Terminal.
    Executed,
}

impl ProposalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::AwaitingExecution => "awaiting_execution",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to pay `amount` out of the pool to `recipient`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Who created it (the authenticated sender at creation time).
    pub creator: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub created_at: Timestamp,
    /// Votes are accepted strictly before this instant.
    pub deadline: Timestamp,
    /// `deadline` plus the execution delay.
    pub eligible_at: Timestamp,
    pub executed: bool,
    /// Counts of members, not of balance.
    pub for_votes: u64,
    pub against_votes: u64,
    pub abstain_votes: u64,
    pub description: String,
}

impl Proposal {
    pub fn state(&self, now: Timestamp) -> ProposalState {
        if self.executed {
            ProposalState::Executed
        } else if now < self.deadline {
            ProposalState::Active
        } else {
            ProposalState::AwaitingExecution
        }
    }

    /// Strict majority of For over Against. Abstentions count for neither side.
    pub fn is_approved(&self) -> bool {
        self.for_votes > self.against_votes
    }

    pub fn total_votes(&self) -> u64 {
        self.for_votes + self.against_votes + self.abstain_votes
    }

    pub fn votes_for_choice(&self, choice: VoteChoice) -> u64 {
        match choice {
            VoteChoice::Abstain => self.abstain_votes,
            VoteChoice::For => self.for_votes,
            VoteChoice::Against => self.against_votes,
        }
    }

    pub(crate) fn tally_mut(&mut self, choice: VoteChoice) -> &mut u64 {
        match choice {
            VoteChoice::Abstain => &mut self.abstain_votes,
            VoteChoice::For => &mut self.for_votes,
            VoteChoice::Against => &mut self.against_votes,
        }
    }
}

/// A member's live vote on one proposal.
///
/// The default record (`Abstain`, not voted) is what a member who never voted
/// reads back; `has_voted` is the only way to tell it from an explicit abstention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub choice: VoteChoice,
    pub has_voted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal {
            id: 1,
            creator: Address::new([1; 20]),
            recipient: Address::new([2; 20]),
            amount: Amount::new(5),
            created_at: Timestamp::new(1_000),
            deadline: Timestamp::new(2_000),
            eligible_at: Timestamp::new(3_000),
            executed: false,
            for_votes: 0,
            against_votes: 0,
            abstain_votes: 0,
            description: String::new(),
        }
    }

    #[test]
    fn state_follows_clock_and_flag() {
        let mut p = proposal();
        assert_eq!(p.state(Timestamp::new(1_999)), ProposalState::Active);
        assert_eq!(p.state(Timestamp::new(2_000)), ProposalState::AwaitingExecution);
        assert_eq!(p.state(Timestamp::new(9_999)), ProposalState::AwaitingExecution);
        p.executed = true;
        assert_eq!(p.state(Timestamp::new(9_999)), ProposalState::Executed);
    }

    #[test]
    fn approval_needs_strict_majority() {
        let mut p = proposal();
        assert!(!p.is_approved());
        p.for_votes = 2;
        p.against_votes = 2;
        assert!(!p.is_approved());
        p.abstain_votes = 10;
        assert!(!p.is_approved());
        p.for_votes = 3;
        assert!(p.is_approved());
    }

    #[test]
    fn tally_mut_targets_matching_bucket() {
        let mut p = proposal();
        *p.tally_mut(VoteChoice::For) += 1;
        *p.tally_mut(VoteChoice::Against) += 2;
        *p.tally_mut(VoteChoice::Abstain) += 3;
        assert_eq!(p.votes_for_choice(VoteChoice::For), 1);
        assert_eq!(p.votes_for_choice(VoteChoice::Against), 2);
        assert_eq!(p.votes_for_choice(VoteChoice::Abstain), 3);
        assert_eq!(p.total_votes(), 6);
    }
}
