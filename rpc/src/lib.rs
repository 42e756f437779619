//! HTTP JSON server for the treasury.
//!
//! Provides endpoints for:
//! - Proposal, vote, balance, aggregate and nonce reads
//! - Signed-request verification and relay through the forwarder, the only
//!   way to deposit, propose, vote or execute over HTTP
//! - Polling the event log

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer};
