//! Fundamental types for the Coffer treasury.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, amounts, timestamps, signatures, governance parameters, vote choices,
//! and the events observers subscribe to.

pub mod address;
pub mod amount;
pub mod error;
pub mod event;
pub mod hash;
pub mod keys;
pub mod network;
pub mod params;
pub mod time;
pub mod vote;

pub use address::Address;
pub use amount::Amount;
pub use error::TypesError;
pub use event::TreasuryEvent;
pub use hash::Digest;
pub use keys::{KeyPair, PrivateKey, Signature, SIGNATURE_LENGTH};
pub use network::ChainId;
pub use params::GovernanceParams;
pub use time::{Clock, SystemClock, Timestamp};
pub use vote::VoteChoice;

/// Sequential proposal identifier. Ids start at 1; 0 is never allocated.
pub type ProposalId = u64;
