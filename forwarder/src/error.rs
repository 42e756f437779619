use coffer_types::Address;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForwarderError {
    #[error("invalid from address")]
    InvalidFrom,

    #[error("invalid to address")]
    InvalidTo,

    #[error("invalid nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("unknown target {0}")]
    UnknownTarget(Address),

    #[error("relayed call failed: {0}")]
    RelayFailed(String),

    #[error("nonce overflow")]
    NonceOverflow,
}
