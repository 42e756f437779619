//! Per-sender replay counters.

use crate::error::ForwarderError;
use coffer_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Next expected nonce for every address that has forwarded a request.
///
/// A counter only moves forward by one per successful forwarded execution.
/// The single step back, [`NonceRegistry::rollback`], undoes the increment of
/// a relay that failed within the same operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NonceRegistry {
    nonces: HashMap<Address, u64>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nonce the next request from `address` must carry. Starts at 0.
    pub fn current_nonce(&self, address: &Address) -> u64 {
        self.nonces.get(address).copied().unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, address: Address) -> Result<u64, ForwarderError> {
        let next = self
            .current_nonce(&address)
            .checked_add(1)
            .ok_or(ForwarderError::NonceOverflow)?;
        self.nonces.insert(address, next);
        Ok(next)
    }

    pub(crate) fn rollback(&mut self, address: Address, previous: u64) {
        if previous == 0 {
            self.nonces.remove(&address);
        } else {
            self.nonces.insert(address, previous);
        }
    }

    /// Number of addresses with a non-zero nonce.
    pub fn len(&self) -> usize {
        self.nonces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nonces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_steps_by_one() {
        let mut nonces = NonceRegistry::new();
        let a = Address::new([1; 20]);
        assert_eq!(nonces.current_nonce(&a), 0);
        assert_eq!(nonces.increment(a).unwrap(), 1);
        assert_eq!(nonces.increment(a).unwrap(), 2);
        assert_eq!(nonces.current_nonce(&a), 2);
        assert_eq!(nonces.current_nonce(&Address::new([2; 20])), 0);
    }

    #[test]
    fn rollback_restores_previous() {
        let mut nonces = NonceRegistry::new();
        let a = Address::new([1; 20]);
        nonces.increment(a).unwrap();
        nonces.rollback(a, 0);
        assert_eq!(nonces.current_nonce(&a), 0);
        assert!(nonces.is_empty());

        nonces.increment(a).unwrap();
        nonces.increment(a).unwrap();
        nonces.rollback(a, 1);
        assert_eq!(nonces.current_nonce(&a), 1);
    }
}
