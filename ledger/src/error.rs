use coffer_types::Amount;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("deposit amount must be greater than zero")]
    ZeroDeposit,

    #[error("insufficient funds: need {needed}, aggregate holds {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("arithmetic overflow in ledger accounting")]
    Overflow,
}
