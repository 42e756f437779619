//! Recipient balances credited by executed proposals.

use std::collections::{HashMap, HashSet};

use coffer_governance::{PayoutError, PayoutSink};
use coffer_types::{Address, Amount};

/// The default payout sink: an in-memory book of what each recipient received.
///
/// Recipients marked with [`WalletBook::refuse`] reject incoming transfers,
/// the way a receiving account that cannot accept funds would.
#[derive(Clone, Debug, Default)]
pub struct WalletBook {
    balances: HashMap<Address, Amount>,
    refusing: HashSet<Address>,
}

impl WalletBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    /// Make transfers to `address` fail until [`WalletBook::accept`] is called.
    pub fn refuse(&mut self, address: Address) {
        self.refusing.insert(address);
    }

    pub fn accept(&mut self, address: &Address) {
        self.refusing.remove(address);
    }
}

impl PayoutSink for WalletBook {
    fn transfer(&mut self, recipient: &Address, amount: Amount) -> Result<(), PayoutError> {
        if self.refusing.contains(recipient) {
            return Err(PayoutError::Rejected(*recipient));
        }
        let current = self.balance(recipient);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| PayoutError::Other(format!("balance overflow for {recipient}")))?;
        self.balances.insert(*recipient, updated);
        Ok(())
    }
}
