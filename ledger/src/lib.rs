//! Treasury ledger.
//!
//! Tracks what each member has deposited and the pooled aggregate that
//! proposals draw from. Member balances only ever grow; the aggregate grows
//! on deposit and shrinks only when a proposal pays out.

pub mod error;
pub mod treasury;

pub use error::LedgerError;
pub use treasury::{LedgerSummary, TreasuryLedger};
