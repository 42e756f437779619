//! Parsing errors for the shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("unknown vote choice: {0}")]
    UnknownVoteChoice(u8),
}
