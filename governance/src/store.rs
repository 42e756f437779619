//! Live proposal set and per-voter vote records.

use crate::error::GovernanceError;
use crate::proposal::{Proposal, VoteRecord};
use coffer_types::{Address, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every proposal ever created, indexed by id, plus each voter's live record.
///
/// Readable by anyone; mutated only by [`crate::VotingEngine`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalStore {
    /// `proposals[i]` has id `i + 1`.
    proposals: Vec<Proposal>,
    votes: HashMap<ProposalId, HashMap<Address, VoteRecord>>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of proposals created; also the highest valid id.
    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn is_valid_id(&self, id: ProposalId) -> bool {
        id > 0 && id <= self.count()
    }

    /// Proposal by id. Id 0 and ids past the end are errors, never a zeroed proposal.
    pub fn get(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        if !self.is_valid_id(id) {
            return Err(GovernanceError::InvalidProposalId(id));
        }
        Ok(&self.proposals[(id - 1) as usize])
    }

    /// All valid ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = ProposalId> {
        1..=self.count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    /// Recorded vote of `voter` on `id`; the default record if they never voted.
    pub fn vote_record(&self, id: ProposalId, voter: &Address) -> VoteRecord {
        self.votes
            .get(&id)
            .and_then(|by_voter| by_voter.get(voter))
            .copied()
            .unwrap_or_default()
    }

    /// Number of distinct addresses that have ever voted on `id`.
    pub fn voter_count(&self, id: ProposalId) -> usize {
        self.votes.get(&id).map(HashMap::len).unwrap_or(0)
    }

    pub(crate) fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, GovernanceError> {
        if !self.is_valid_id(id) {
            return Err(GovernanceError::InvalidProposalId(id));
        }
        Ok(&mut self.proposals[(id - 1) as usize])
    }

    /// Append a proposal, assigning it the next sequential id.
    pub(crate) fn insert(&mut self, mut proposal: Proposal) -> ProposalId {
        let id = self.count() + 1;
        proposal.id = id;
        self.proposals.push(proposal);
        id
    }

    pub(crate) fn set_vote(&mut self, id: ProposalId, voter: Address, record: VoteRecord) {
        self.votes.entry(id).or_default().insert(voter, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_types::{Amount, Timestamp, VoteChoice};

    fn draft() -> Proposal {
        Proposal {
            id: 0,
            creator: Address::new([1; 20]),
            recipient: Address::new([2; 20]),
            amount: Amount::new(1),
            created_at: Timestamp::EPOCH,
            deadline: Timestamp::new(10),
            eligible_at: Timestamp::new(20),
            executed: false,
            for_votes: 0,
            against_votes: 0,
            abstain_votes: 0,
            description: "d".into(),
        }
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut store = ProposalStore::new();
        assert_eq!(store.insert(draft()), 1);
        assert_eq!(store.insert(draft()), 2);
        assert_eq!(store.get(2).unwrap().id, 2);
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn id_zero_and_out_of_range_fail() {
        let mut store = ProposalStore::new();
        store.insert(draft());
        assert_eq!(store.get(0), Err(GovernanceError::InvalidProposalId(0)));
        assert_eq!(store.get(2), Err(GovernanceError::InvalidProposalId(2)));
        assert!(!store.is_valid_id(0));
        assert!(store.is_valid_id(1));
    }

    #[test]
    fn missing_vote_reads_as_default() {
        let store = ProposalStore::new();
        let record = store.vote_record(1, &Address::new([3; 20]));
        assert_eq!(record.choice, VoteChoice::Abstain);
        assert!(!record.has_voted);
    }

    #[test]
    fn set_vote_overwrites() {
        let mut store = ProposalStore::new();
        store.insert(draft());
        let voter = Address::new([4; 20]);
        store.set_vote(1, voter, VoteRecord { choice: VoteChoice::For, has_voted: true });
        store.set_vote(1, voter, VoteRecord { choice: VoteChoice::Against, has_voted: true });
        assert_eq!(store.vote_record(1, &voter).choice, VoteChoice::Against);
        assert_eq!(store.voter_count(1), 1);
    }
}
