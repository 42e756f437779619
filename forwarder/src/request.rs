//! Forward requests and their typed-data digest.
//!
//! The digest follows the structured-data layout
//! `keccak(0x19 0x01 || domain_separator || struct_hash)`, where the domain
//! binds name, version, chain id and the forwarder's own address, and the
//! struct hash binds every request field including the payload hash.

use coffer_crypto::{keccak256, keccak256_multi, sign_digest, CryptoError};
use coffer_types::{Address, Amount, ChainId, Digest, PrivateKey, Signature};
use serde::{Deserialize, Serialize};

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

const FORWARD_REQUEST_TYPE: &[u8] =
    b"ForwardRequest(address from,address to,uint256 value,uint256 gas,uint256 nonce,bytes data)";

/// A member's signed intent to call `to` with `data`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
    /// The member; must be the signer.
    pub from: Address,
    /// The target the payload is relayed to.
    pub to: Address,
    /// Value attached to the relayed call.
    pub value: Amount,
    /// Gas budget. Signed, so part of the authenticated intent, but not
    /// enforced on the relayed call.
    pub gas: u64,
    pub nonce: u64,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl ForwardRequest {
    pub fn struct_hash(&self) -> [u8; 32] {
        let type_hash = keccak256(FORWARD_REQUEST_TYPE);
        let data_hash = keccak256(&self.data);
        keccak256_multi(&[
            &type_hash,
            &self.from.to_word(),
            &self.to.to_word(),
            &self.value.to_word(),
            &u64_word(self.gas),
            &u64_word(self.nonce),
            &data_hash,
        ])
    }
}

/// Deployment identity a signature is bound to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardDomain {
    pub name: String,
    pub version: String,
    pub chain_id: ChainId,
    /// Address of the forwarder itself.
    pub verifying_contract: Address,
}

impl ForwardDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: ChainId,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        keccak256_multi(&[
            &keccak256(DOMAIN_TYPE),
            &keccak256(self.name.as_bytes()),
            &keccak256(self.version.as_bytes()),
            &self.chain_id.to_word(),
            &self.verifying_contract.to_word(),
        ])
    }

    /// The 32-byte value a member signs for `request`.
    pub fn digest(&self, request: &ForwardRequest) -> Digest {
        Digest::new(keccak256_multi(&[
            &[0x19, 0x01],
            &self.separator(),
            &request.struct_hash(),
        ]))
    }
}

/// Sign `request` under `domain`.
pub fn sign_request(
    domain: &ForwardDomain,
    request: &ForwardRequest,
    private_key: &PrivateKey,
) -> Result<Signature, CryptoError> {
    sign_digest(&domain.digest(request), private_key)
}

fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
        } else {
            serializer.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
        } else {
            Vec::<u8>::deserialize(deserializer)
        }
    }
}
