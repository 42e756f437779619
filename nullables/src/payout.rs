//! Nullable payout — records transfers and fails on request.

use coffer_governance::{PayoutError, PayoutSink};
use coffer_types::{Address, Amount};

/// A payout sink that records every transfer it accepts.
///
/// Queue failures with [`NullPayout::fail_next`]; each queued failure
/// rejects exactly one transfer.
#[derive(Debug, Default)]
pub struct NullPayout {
    transfers: Vec<(Address, Amount)>,
    pending_failures: usize,
    attempts: usize,
}

impl NullPayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` transfers fail.
    pub fn fail_next(&mut self, count: usize) {
        self.pending_failures += count;
    }

    /// Transfers that went through, in order.
    pub fn transfers(&self) -> &[(Address, Amount)] {
        &self.transfers
    }

    /// Every transfer attempt, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl PayoutSink for NullPayout {
    fn transfer(&mut self, recipient: &Address, amount: Amount) -> Result<(), PayoutError> {
        self.attempts += 1;
        if self.pending_failures > 0 {
            self.pending_failures -= 1;
            return Err(PayoutError::Other("null payout failure".into()));
        }
        self.transfers.push((*recipient, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_failures_are_consumed_in_order() {
        let mut payout = NullPayout::new();
        let r = Address::new([1; 20]);
        payout.fail_next(1);
        assert!(payout.transfer(&r, Amount::new(5)).is_err());
        assert!(payout.transfer(&r, Amount::new(5)).is_ok());
        assert_eq!(payout.transfers(), &[(r, Amount::new(5))]);
        assert_eq!(payout.attempts(), 2);
    }
}
