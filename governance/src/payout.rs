//! The outbound transfer made when a proposal executes.

use coffer_types::{Address, Amount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayoutError {
    #[error("recipient {0} rejected the transfer")]
    Rejected(Address),

    #[error("{0}")]
    Other(String),
}

/// Moves funds out of the treasury to a proposal's recipient.
///
/// A transfer may fail; the voting engine calls it as the last step of
/// execution and reverses its own state changes when it does.
pub trait PayoutSink {
    fn transfer(&mut self, recipient: &Address, amount: Amount) -> Result<(), PayoutError>;
}

impl<F> PayoutSink for F
where
    F: FnMut(&Address, Amount) -> Result<(), PayoutError>,
{
    fn transfer(&mut self, recipient: &Address, amount: Amount) -> Result<(), PayoutError> {
        self(recipient, amount)
    }
}
