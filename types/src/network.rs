//! Chain identifier used for signature domain separation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the network a treasury is deployed on.
///
/// Bound into every forward-request digest so a signature produced for one
/// deployment cannot be replayed on another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    /// Ethereum mainnet.
    pub const MAINNET: Self = Self(1);
    /// Sepolia test network.
    pub const SEPOLIA: Self = Self(11_155_111);
    /// Local development chain.
    pub const DEV: Self = Self(31_337);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian 32-byte word (ABI encoding).
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&self.0.to_be_bytes());
        word
    }

    /// Human-readable name for well-known chains.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::MAINNET => "mainnet",
            Self::SEPOLIA => "sepolia",
            Self::DEV => "dev",
            _ => "custom",
        }
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::DEV
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.name())
    }
}
