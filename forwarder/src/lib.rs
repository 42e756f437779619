//! Signed-request forwarding.
//!
//! A relay submits a [`ForwardRequest`] signed by a member; the forwarder
//! checks the typed-data signature and the member's nonce, then relays the
//! payload to the target with the member's address appended as the trailing
//! 20 bytes. The target treats those bytes as the logical sender when, and
//! only when, the direct caller is the trusted forwarder.

pub mod error;
pub mod forwarder;
pub mod nonce;
pub mod request;

pub use error::ForwarderError;
pub use forwarder::{append_sender, split_sender, ForwardReceipt, ForwardTarget, RequestForwarder};
pub use nonce::NonceRegistry;
pub use request::{sign_request, ForwardDomain, ForwardRequest};
