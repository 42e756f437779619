//! secp256k1 key generation.

use crate::error::CryptoError;
use coffer_types::{Address, KeyPair, PrivateKey};
use k256::ecdsa::SigningKey;

/// Generate a new key pair from the operating system's entropy source.
///
/// Retries on the (astronomically unlikely) draw of a scalar outside the
/// curve order.
pub fn generate_keypair() -> Result<KeyPair, CryptoError> {
    loop {
        let mut seed = [0u8; 32];
        getrandom::getrandom(&mut seed).map_err(|e| CryptoError::Entropy(e.to_string()))?;
        match keypair_from_seed(&seed) {
            Ok(kp) => return Ok(kp),
            Err(CryptoError::InvalidPrivateKey) => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Build a key pair from a 32-byte secret scalar (deterministic).
///
/// Fails for zero or for values not below the curve order.
pub fn keypair_from_seed(seed: &[u8; 32]) -> Result<KeyPair, CryptoError> {
    let signing_key = SigningKey::from_slice(seed).map_err(|_| CryptoError::InvalidPrivateKey)?;
    Ok(KeyPair {
        address: crate::derive_address(signing_key.verifying_key()),
        private: PrivateKey(*seed),
    })
}

/// Address controlled by a private key.
pub fn address_of(private: &PrivateKey) -> Result<Address, CryptoError> {
    let signing_key =
        SigningKey::from_slice(&private.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    Ok(crate::derive_address(signing_key.verifying_key()))
}
