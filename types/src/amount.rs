//! Token amount type.
//!
//! Amounts are integers (u128) in the smallest indivisible unit. There is no
//! fixed-point scaling; the only rounding anywhere in the system is the floor
//! division of the proposal threshold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of pooled value, in raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `floor(self * percent / 100)` without intermediate overflow.
    pub fn percent_floor(self, percent: u32) -> Self {
        let pct = percent as u128;
        let whole = (self.0 / 100).saturating_mul(pct);
        let frac = (self.0 % 100) * pct / 100;
        Self(whole.saturating_add(frac))
    }

    /// Big-endian 32-byte word (ABI encoding).
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&self.0.to_be_bytes());
        word
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
