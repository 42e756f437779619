use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("invalid recovery byte v={0}")]
    InvalidRecoveryId(u8),

    #[error("signature s-value is in the upper half of the curve order")]
    MalleableSignature,

    #[error("malformed signature")]
    MalformedSignature,

    #[error("public key recovery failed")]
    RecoveryFailed,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}
