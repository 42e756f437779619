//! Core voting engine: proposal creation gating, vote casting, execution.
//!
//! Every entry point takes the authenticated sender explicitly. Resolving who
//! that is (direct caller or forwarded signer) happens before the call reaches
//! the engine.

use crate::error::GovernanceError;
use crate::payout::PayoutSink;
use crate::proposal::{Proposal, ProposalState, VoteRecord};
use crate::store::ProposalStore;
use coffer_ledger::{LedgerError, TreasuryLedger};
use coffer_types::{
    Address, Amount, GovernanceParams, ProposalId, Timestamp, TreasuryEvent, VoteChoice,
};

/// What a creator asks for when opening a proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalDraft {
    pub recipient: Address,
    pub amount: Amount,
    pub voting_duration_secs: u64,
    pub description: String,
}

/// Stateless rules over a [`ProposalStore`] and a [`TreasuryLedger`].
pub struct VotingEngine {
    params: GovernanceParams,
}

impl VotingEngine {
    pub fn new(params: GovernanceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Open a new proposal.
    ///
    /// The creator must hold at least the threshold share of the aggregate as
    /// it stands at this call; the threshold is not cached.
    pub fn create_proposal(
        &self,
        store: &mut ProposalStore,
        ledger: &TreasuryLedger,
        creator: Address,
        draft: ProposalDraft,
        now: Timestamp,
    ) -> Result<(ProposalId, TreasuryEvent), GovernanceError> {
        let aggregate = ledger.aggregate();
        let balance = ledger.balance_of(&creator);
        let required = self.params.proposal_threshold(aggregate);
        if balance < required {
            return Err(GovernanceError::InsufficientBalanceToPropose { balance, required });
        }
        if draft.recipient.is_zero() {
            return Err(GovernanceError::InvalidRecipient);
        }
        if draft.amount.is_zero() {
            return Err(GovernanceError::ZeroAmount);
        }
        if draft.amount > aggregate {
            return Err(GovernanceError::AmountExceedsAggregate {
                amount: draft.amount,
                aggregate,
            });
        }
        if draft.voting_duration_secs == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        let deadline = now
            .checked_add_secs(draft.voting_duration_secs)
            .ok_or(GovernanceError::Overflow)?;
        let eligible_at = deadline
            .checked_add_secs(self.params.execution_delay_secs)
            .ok_or(GovernanceError::Overflow)?;

        let id = store.insert(Proposal {
            id: 0,
            creator,
            recipient: draft.recipient,
            amount: draft.amount,
            created_at: now,
            deadline,
            eligible_at,
            executed: false,
            for_votes: 0,
            against_votes: 0,
            abstain_votes: 0,
            description: draft.description.clone(),
        });

        tracing::info!(
            id,
            creator = %creator,
            recipient = %draft.recipient,
            amount = %draft.amount,
            deadline = %deadline,
            "proposal created"
        );
        Ok((
            id,
            TreasuryEvent::ProposalCreated {
                id,
                creator,
                recipient: draft.recipient,
                amount: draft.amount,
                deadline,
                description: draft.description,
            },
        ))
    }

    /// Record or change `voter`'s choice on proposal `id`.
    ///
    /// A repeat vote first takes one count away from the previous choice, so
    /// each address contributes exactly one count at any time.
    pub fn cast_vote(
        &self,
        store: &mut ProposalStore,
        ledger: &TreasuryLedger,
        voter: Address,
        id: ProposalId,
        choice: VoteChoice,
        now: Timestamp,
    ) -> Result<TreasuryEvent, GovernanceError> {
        if !store.is_valid_id(id) {
            return Err(GovernanceError::InvalidProposalId(id));
        }
        let balance = ledger.balance_of(&voter);
        if balance < self.params.min_vote_balance {
            return Err(GovernanceError::InsufficientBalanceToVote {
                balance,
                required: self.params.min_vote_balance,
            });
        }
        let previous = store.vote_record(id, &voter);
        let proposal = store.get_mut(id)?;
        if now >= proposal.deadline {
            return Err(GovernanceError::VotingEnded);
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }

        if previous.has_voted {
            let bucket = proposal.tally_mut(previous.choice);
            *bucket = bucket.checked_sub(1).ok_or(GovernanceError::Overflow)?;
        }
        let bucket = proposal.tally_mut(choice);
        *bucket = bucket.checked_add(1).ok_or(GovernanceError::Overflow)?;
        store.set_vote(
            id,
            voter,
            VoteRecord {
                choice,
                has_voted: true,
            },
        );

        tracing::debug!(
            id,
            voter = %voter,
            choice = %choice,
            revote = previous.has_voted,
            "vote cast"
        );
        Ok(TreasuryEvent::VoteCast { id, voter, choice })
    }

    /// Pay out an approved proposal. Anyone may call this.
    ///
    /// Marks the proposal executed and takes the amount from the aggregate
    /// before transferring. If the transfer fails both changes are undone and
    /// the proposal stays executable.
    pub fn execute_proposal(
        &self,
        store: &mut ProposalStore,
        ledger: &mut TreasuryLedger,
        id: ProposalId,
        now: Timestamp,
        payout: &mut dyn PayoutSink,
    ) -> Result<TreasuryEvent, GovernanceError> {
        let (recipient, amount) = {
            let proposal = self.check_executable(store, ledger, id, now)?;
            (proposal.recipient, proposal.amount)
        };

        store.get_mut(id)?.executed = true;
        if let Err(e) = ledger.release(amount) {
            store.get_mut(id)?.executed = false;
            return Err(match e {
                LedgerError::InsufficientFunds { needed, available } => {
                    GovernanceError::InsufficientFunds { needed, available }
                }
                other => other.into(),
            });
        }

        if let Err(e) = payout.transfer(&recipient, amount) {
            store.get_mut(id)?.executed = false;
            ledger.restore(amount)?;
            tracing::warn!(
                id,
                recipient = %recipient,
                amount = %amount,
                error = %e,
                "payout failed, execution rolled back"
            );
            return Err(GovernanceError::PayoutFailed(e.to_string()));
        }

        tracing::info!(
            id,
            recipient = %recipient,
            amount = %amount,
            aggregate = %ledger.aggregate(),
            "proposal executed"
        );
        Ok(TreasuryEvent::ProposalExecuted {
            id,
            recipient,
            amount,
        })
    }

    /// Whether `execute_proposal` would pass its preconditions right now.
    ///
    /// Returns `false` for id 0 and out-of-range ids instead of failing.
    pub fn can_execute(
        &self,
        store: &ProposalStore,
        ledger: &TreasuryLedger,
        id: ProposalId,
        now: Timestamp,
    ) -> bool {
        self.check_executable(store, ledger, id, now).is_ok()
    }

    /// Ids of every proposal that could execute at `now`, ascending.
    pub fn executable_proposals(
        &self,
        store: &ProposalStore,
        ledger: &TreasuryLedger,
        now: Timestamp,
    ) -> Vec<ProposalId> {
        store
            .ids()
            .filter(|id| self.can_execute(store, ledger, *id, now))
            .collect()
    }

    /// Lifecycle state of proposal `id` at `now`.
    pub fn proposal_state(
        &self,
        store: &ProposalStore,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalState, GovernanceError> {
        Ok(store.get(id)?.state(now))
    }

    /// Execution preconditions, in the order they are reported.
    fn check_executable<'a>(
        &self,
        store: &'a ProposalStore,
        ledger: &TreasuryLedger,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<&'a Proposal, GovernanceError> {
        let proposal = store.get(id)?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        if now < proposal.deadline {
            return Err(GovernanceError::VotingNotEnded {
                deadline: proposal.deadline,
            });
        }
        if now < proposal.eligible_at {
            return Err(GovernanceError::ExecutionDelayNotPassed {
                eligible_at: proposal.eligible_at,
            });
        }
        if !proposal.is_approved() {
            return Err(GovernanceError::NotApproved {
                for_votes: proposal.for_votes,
                against_votes: proposal.against_votes,
            });
        }
        let available = ledger.aggregate();
        if available < proposal.amount {
            return Err(GovernanceError::InsufficientFunds {
                needed: proposal.amount,
                available,
            });
        }
        Ok(proposal)
    }
}

impl Default for VotingEngine {
    fn default() -> Self {
        Self::new(GovernanceParams::default())
    }
}
