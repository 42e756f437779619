//! Member balances and the pooled aggregate.

use crate::error::LedgerError;
use coffer_types::{Address, Amount, TreasuryEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The substrate every gating decision reads from.
///
/// There is deliberately no withdrawal path: an individual balance is never
/// decreased. The aggregate is decreased only through [`TreasuryLedger::release`]
/// when a proposal pays out, so after executions the sum of member balances
/// can exceed the aggregate.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TreasuryLedger {
    balances: HashMap<Address, Amount>,
    aggregate: Amount,
}

impl TreasuryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `sender` and to the aggregate.
    pub fn deposit(&mut self, sender: Address, amount: Amount) -> Result<TreasuryEvent, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroDeposit);
        }
        let current = self.balance_of(&sender);
        let new_balance = current.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let new_aggregate = self
            .aggregate
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        self.balances.insert(sender, new_balance);
        self.aggregate = new_aggregate;

        tracing::info!(
            member = %sender,
            amount = %amount,
            balance = %new_balance,
            aggregate = %new_aggregate,
            "deposit accepted"
        );
        Ok(TreasuryEvent::Deposited {
            member: sender,
            amount,
        })
    }

    /// Deposited balance of `address` (zero if it never deposited).
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    /// Pool-wide amount available to proposals.
    pub fn aggregate(&self) -> Amount {
        self.aggregate
    }

    /// Take `amount` out of the aggregate for a payout.
    ///
    /// Member balances are left untouched.
    pub fn release(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.aggregate = self
            .aggregate
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds {
                needed: amount,
                available: self.aggregate,
            })?;
        Ok(())
    }

    /// Return `amount` to the aggregate after a failed payout.
    pub fn restore(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.aggregate = self
            .aggregate
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Number of addresses that have ever deposited.
    pub fn member_count(&self) -> usize {
        self.balances.len()
    }

    /// Whether `address` has ever deposited.
    pub fn is_member(&self, address: &Address) -> bool {
        self.balances.contains_key(address)
    }

    /// Sum of every member balance, saturating at `u128::MAX`.
    pub fn total_member_balances(&self) -> Amount {
        let raw = self
            .balances
            .values()
            .fold(0u128, |acc, b| acc.saturating_add(b.raw()));
        Amount::new(raw)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            members: self.member_count() as u64,
            aggregate: self.aggregate,
            member_balances: self.total_member_balances(),
        }
    }
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub members: u64,
    pub aggregate: Amount,
    pub member_balances: Amount,
}
