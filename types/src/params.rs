//! Governance parameters fixed at deployment.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// Cooldown between a proposal's voting deadline and the moment it may execute.
pub const EXECUTION_DELAY_SECS: u64 = 86_400;

/// Share of the aggregate (in percent, floor) a member must hold to propose.
pub const PROPOSAL_THRESHOLD_PERCENT: u32 = 10;

/// Parameters the voting engine reads on every call.
///
/// None of these change after deployment; the proposal threshold is still
/// recomputed on every call because the aggregate it is relative to moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Absolute balance a member must hold to cast a vote.
    pub min_vote_balance: Amount,

    /// Seconds between a proposal's deadline and its execution-eligible time.
    pub execution_delay_secs: u64,

    /// Percent of the aggregate a creator must hold (floor division).
    pub proposal_threshold_percent: u32,
}

impl GovernanceParams {
    pub fn new(min_vote_balance: Amount) -> Self {
        Self {
            min_vote_balance,
            ..Self::default()
        }
    }

    /// Minimum balance needed to create a proposal against `aggregate`.
    pub fn proposal_threshold(&self, aggregate: Amount) -> Amount {
        aggregate.percent_floor(self.proposal_threshold_percent)
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_vote_balance: Amount::new(1),
            execution_delay_secs: EXECUTION_DELAY_SECS,
            proposal_threshold_percent: PROPOSAL_THRESHOLD_PERCENT,
        }
    }
}
