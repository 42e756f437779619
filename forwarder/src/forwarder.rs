//! Verification and relay of signed forward requests.

use crate::error::ForwarderError;
use crate::nonce::NonceRegistry;
use crate::request::{ForwardDomain, ForwardRequest};
use coffer_types::{Address, Amount};
use serde::{Deserialize, Serialize};

/// Receiver of a relayed call.
///
/// `calldata` is the request payload with the signer's address appended as
/// the trailing 20 bytes; `caller` is the forwarder's own address. A target
/// that does not serve `to` answers [`ForwarderError::UnknownTarget`]; a call
/// it serves but refuses answers [`ForwarderError::RelayFailed`].
pub trait ForwardTarget {
    fn relay(
        &mut self,
        caller: &Address,
        to: &Address,
        value: Amount,
        calldata: &[u8],
    ) -> Result<Vec<u8>, ForwarderError>;
}

/// Outcome of a successful forwarded execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardReceipt {
    pub from: Address,
    pub to: Address,
    /// The nonce the request consumed.
    pub nonce: u64,
    /// Whatever the target returned.
    pub output: Vec<u8>,
}

/// Append the 20-byte sender to a payload.
pub fn append_sender(data: &[u8], sender: &Address) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(data.len() + Address::LEN);
    calldata.extend_from_slice(data);
    calldata.extend_from_slice(sender.as_bytes());
    calldata
}

/// Split relayed calldata into payload and trailing sender.
///
/// `None` when the calldata is shorter than an address.
pub fn split_sender(calldata: &[u8]) -> Option<(&[u8], Address)> {
    let split = calldata.len().checked_sub(Address::LEN)?;
    let (payload, tail) = calldata.split_at(split);
    Some((payload, Address::from_slice(tail)?))
}

/// Checks and relays requests signed under one [`ForwardDomain`].
///
/// Holds no mutable state itself; nonces live in the [`NonceRegistry`] the
/// caller passes in, which is guarded together with the rest of the
/// treasury state.
#[derive(Clone, Debug)]
pub struct RequestForwarder {
    domain: ForwardDomain,
}

impl RequestForwarder {
    pub fn new(domain: ForwardDomain) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &ForwardDomain {
        &self.domain
    }

    /// Address the forwarder relays from; the verifying contract of its domain.
    pub fn address(&self) -> Address {
        self.domain.verifying_contract
    }

    /// Whether `request` would be accepted right now. No side effects.
    pub fn verify(&self, nonces: &NonceRegistry, request: &ForwardRequest, signature: &[u8]) -> bool {
        self.check(nonces, request, signature).is_ok()
    }

    /// Consume the request's nonce and relay its payload to `target`.
    ///
    /// The nonce is advanced before relaying and restored if the relayed call
    /// fails, so a failed relay leaves the registry as it was.
    pub fn execute(
        &self,
        nonces: &mut NonceRegistry,
        request: &ForwardRequest,
        signature: &[u8],
        target: &mut dyn ForwardTarget,
    ) -> Result<ForwardReceipt, ForwarderError> {
        let span = tracing::info_span!("forward", from = %request.from, nonce = request.nonce);
        let _enter = span.enter();

        self.check(nonces, request, signature)?;

        let previous = request.nonce;
        nonces.increment(request.from)?;

        let calldata = append_sender(&request.data, &request.from);
        match target.relay(&self.address(), &request.to, request.value, &calldata) {
            Ok(output) => {
                tracing::info!(to = %request.to, value = %request.value, "forwarded request executed");
                Ok(ForwardReceipt {
                    from: request.from,
                    to: request.to,
                    nonce: previous,
                    output,
                })
            }
            Err(err) => {
                nonces.rollback(request.from, previous);
                tracing::warn!(to = %request.to, reason = %err, "relayed call failed, nonce restored");
                Err(err)
            }
        }
    }

    fn check(
        &self,
        nonces: &NonceRegistry,
        request: &ForwardRequest,
        signature: &[u8],
    ) -> Result<(), ForwarderError> {
        if request.from.is_zero() {
            return Err(ForwarderError::InvalidFrom);
        }
        if request.to.is_zero() {
            return Err(ForwarderError::InvalidTo);
        }
        let expected = nonces.current_nonce(&request.from);
        if request.nonce != expected {
            return Err(ForwarderError::InvalidNonce {
                expected,
                got: request.nonce,
            });
        }
        let digest = self.domain.digest(request);
        if !coffer_crypto::verify_signer(&digest, signature, &request.from) {
            return Err(ForwarderError::InvalidSignature);
        }
        Ok(())
    }
}
