//! Shared helpers for the Coffer treasury.

pub mod time;

pub use time::format_duration;
