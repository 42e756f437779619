//! Account address derivation from secp256k1 public keys.
//!
//! Address = last 20 bytes of `keccak256(X || Y)`, where `X || Y` is the
//! 64-byte uncompressed public key without its `0x04` SEC1 tag.

use coffer_types::Address;
use k256::ecdsa::VerifyingKey;

/// Derive the account address controlled by a public key.
pub fn derive_address(verifying_key: &VerifyingKey) -> Address {
    let point = verifying_key.to_encoded_point(false);
    let hash = crate::keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::new(bytes)
}
