//! Coffer treasury instance.
//!
//! Wires the ledger, the voting engine and the request forwarder together
//! behind a single lock, and provides the ambient pieces a deployment needs:
//! - TOML configuration
//! - structured logging
//! - the calldata codec forwarded requests carry
//! - an event bus and a drainable event log for observers

pub mod call;
pub mod config;
pub mod error;
pub mod logging;
pub mod tracing_spans;
pub mod treasury;
pub mod treasury_event;
pub mod wallet;

pub use call::{resolve_sender, TreasuryCall};
pub use config::TreasuryConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use treasury::Treasury;
pub use treasury_event::{EventBus, EventLog};
pub use wallet::WalletBook;
