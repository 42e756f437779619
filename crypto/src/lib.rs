//! Cryptographic primitives for Coffer.
//!
//! - **secp256k1 ECDSA** with public-key recovery for request signatures
//! - **Keccak-256** for digests and address derivation
//! - Addresses are the last 20 bytes of `keccak256(uncompressed_pubkey[1..])`

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::derive_address;
pub use error::CryptoError;
pub use hash::{keccak256, keccak256_multi};
pub use keys::{address_of, generate_keypair, keypair_from_seed};
pub use sign::{recover_signer, sign_digest, verify_signer};
