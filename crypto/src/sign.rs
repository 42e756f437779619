//! Recoverable secp256k1 signing over 32-byte digests.
//!
//! Signatures are 65 bytes: `r || s || v`, with `v` in `{27, 28}`. Recovery
//! also accepts the raw parity form `{0, 1}`. High-s signatures are rejected
//! so every signed digest has exactly one accepted encoding.

use crate::error::CryptoError;
use coffer_types::{Address, Digest, PrivateKey, Signature, SIGNATURE_LENGTH};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

/// Offset added to the recovery parity in the `v` byte.
const V_OFFSET: u8 = 27;

/// Sign a digest, producing a 65-byte recoverable signature.
pub fn sign_digest(digest: &Digest, private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let signing_key =
        SigningKey::from_slice(&private_key.0).map_err(|_| CryptoError::InvalidPrivateKey)?;
    let (sig, recid) = signing_key
        .sign_prehash_recoverable(digest.as_bytes())
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    let mut out = [0u8; SIGNATURE_LENGTH];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = recid.to_byte() + V_OFFSET;
    Ok(Signature(out))
}

/// Recover the address that produced `signature` over `digest`.
///
/// The length is checked before anything else, so a truncated or padded
/// signature can never reach the recovery routine.
pub fn recover_signer(digest: &Digest, signature: &[u8]) -> Result<Address, CryptoError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(CryptoError::InvalidSignatureLength(signature.len()));
    }

    let v = signature[64];
    let parity = match v {
        0 | 1 => v,
        27 | 28 => v - V_OFFSET,
        other => return Err(CryptoError::InvalidRecoveryId(other)),
    };
    let recid = RecoveryId::from_byte(parity).ok_or(CryptoError::InvalidRecoveryId(v))?;

    let sig =
        EcdsaSignature::from_slice(&signature[..64]).map_err(|_| CryptoError::MalformedSignature)?;
    if sig.normalize_s().is_some() {
        return Err(CryptoError::MalleableSignature);
    }

    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &sig, recid)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(crate::derive_address(&key))
}

/// Whether `signature` over `digest` was produced by `expected`.
///
/// Returns `false` for any malformed signature instead of an error.
pub fn verify_signer(digest: &Digest, signature: &[u8], expected: &Address) -> bool {
    matches!(recover_signer(digest, signature), Ok(signer) if signer == *expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{generate_keypair, keypair_from_seed};

    /// secp256k1 group order, big-endian.
    const ORDER: [u8; 32] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
        0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
        0x41, 0x41,
    ];

    fn order_minus(s: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        let mut borrow = 0i16;
        for i in (0..32).rev() {
            let mut diff = ORDER[i] as i16 - s[i] as i16 - borrow;
            borrow = if diff < 0 { 1 } else { 0 };
            if diff < 0 {
                diff += 256;
            }
            out[i] = diff as u8;
        }
        out
    }

    fn digest(tag: u8) -> Digest {
        Digest::new(crate::keccak256(&[tag]))
    }

    #[test]
    fn sign_and_recover() {
        let kp = generate_keypair().unwrap();
        let d = digest(1);
        let sig = sign_digest(&d, &kp.private).unwrap();
        assert_eq!(recover_signer(&d, sig.as_bytes()).unwrap(), kp.address);
        assert!(verify_signer(&d, sig.as_bytes(), &kp.address));
    }

    #[test]
    fn v_is_27_or_28() {
        let kp = keypair_from_seed(&[5u8; 32]).unwrap();
        let sig = sign_digest(&digest(2), &kp.private).unwrap();
        assert!(sig.v() == 27 || sig.v() == 28);
    }

    #[test]
    fn raw_parity_v_accepted() {
        let kp = keypair_from_seed(&[6u8; 32]).unwrap();
        let d = digest(3);
        let mut sig = sign_digest(&d, &kp.private).unwrap();
        sig.0[64] -= 27;
        assert_eq!(recover_signer(&d, sig.as_bytes()).unwrap(), kp.address);
    }

    #[test]
    fn wrong_digest_recovers_other_address() {
        let kp = generate_keypair().unwrap();
        let sig = sign_digest(&digest(4), &kp.private).unwrap();
        assert!(!verify_signer(&digest(5), sig.as_bytes(), &kp.address));
    }

    #[test]
    fn wrong_signer_fails() {
        let kp1 = generate_keypair().unwrap();
        let kp2 = generate_keypair().unwrap();
        let d = digest(6);
        let sig = sign_digest(&d, &kp1.private).unwrap();
        assert!(!verify_signer(&d, sig.as_bytes(), &kp2.address));
    }

    #[test]
    fn short_signature_rejected_before_recovery() {
        let d = digest(7);
        assert_eq!(
            recover_signer(&d, &[1u8; 64]),
            Err(CryptoError::InvalidSignatureLength(64))
        );
        assert_eq!(
            recover_signer(&d, &[]),
            Err(CryptoError::InvalidSignatureLength(0))
        );
        assert!(!verify_signer(&d, &[1u8; 64], &Address::ZERO));
    }

    #[test]
    fn bad_v_rejected() {
        let kp = keypair_from_seed(&[8u8; 32]).unwrap();
        let d = digest(8);
        let mut sig = sign_digest(&d, &kp.private).unwrap();
        sig.0[64] = 29;
        assert_eq!(
            recover_signer(&d, sig.as_bytes()),
            Err(CryptoError::InvalidRecoveryId(29))
        );
    }

    #[test]
    fn zero_signature_rejected() {
        let mut raw = [0u8; 65];
        raw[64] = 27;
        assert_eq!(
            recover_signer(&digest(9), &raw),
            Err(CryptoError::MalformedSignature)
        );
    }

    #[test]
    fn high_s_rejected() {
        let kp = keypair_from_seed(&[10u8; 32]).unwrap();
        let d = digest(10);
        let sig = sign_digest(&d, &kp.private).unwrap();

        // Flip s to n - s and the parity bit: the same point, the other encoding.
        let mut raw = [0u8; 65];
        raw[..32].copy_from_slice(sig.r());
        raw[32..64].copy_from_slice(&order_minus(sig.s()));
        raw[64] = if sig.v() == 27 { 28 } else { 27 };

        assert_eq!(
            recover_signer(&d, &raw),
            Err(CryptoError::MalleableSignature)
        );
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = keypair_from_seed(&[11u8; 32]).unwrap();
        let d = digest(11);
        let a = sign_digest(&d, &kp.private).unwrap();
        let b = sign_digest(&d, &kp.private).unwrap();
        assert_eq!(a, b);
    }
}
