//! Nullable infrastructure for deterministic testing.
//!
//! The treasury's outside dependencies (the clock and the payout transfer)
//! sit behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the system clock or move real funds
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod payout;

pub use clock::NullClock;
pub use payout::NullPayout;
