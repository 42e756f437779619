//! Calldata for the treasury: the opaque payload a forward request carries.
//!
//! Payloads are `bincode`-encoded [`TreasuryCall`] values. When the direct
//! caller is the trusted forwarder, the last 20 bytes of the calldata are the
//! logical sender and the payload is everything before them.

use coffer_forwarder::split_sender;
use coffer_types::{Address, Amount, ProposalId, VoteChoice};
use serde::{Deserialize, Serialize};

use crate::NodeError;

/// A treasury entry point and its arguments. The sender is never part of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreasuryCall {
    /// Credit the attached value to the sender.
    Deposit,
    CreateProposal {
        recipient: Address,
        amount: Amount,
        voting_duration_secs: u64,
        description: String,
    },
    CastVote {
        id: ProposalId,
        choice: VoteChoice,
    },
    ExecuteProposal {
        id: ProposalId,
    },
}

impl TreasuryCall {
    pub fn encode(&self) -> Result<Vec<u8>, NodeError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(payload: &[u8]) -> Result<Self, NodeError> {
        Ok(bincode::deserialize(payload)?)
    }

    /// Whether the call accepts attached value.
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Deposit)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::CreateProposal { .. } => "create_proposal",
            Self::CastVote { .. } => "cast_vote",
            Self::ExecuteProposal { .. } => "execute_proposal",
        }
    }
}

/// Resolve the logical sender and the payload of a call.
///
/// Calls from `trusted_forwarder` carry their sender in the trailing 20
/// bytes; calls from anyone else are attributed to the direct caller.
pub fn resolve_sender<'a>(
    caller: &Address,
    trusted_forwarder: &Address,
    calldata: &'a [u8],
) -> Result<(Address, &'a [u8]), NodeError> {
    if caller == trusted_forwarder {
        let (payload, sender) = split_sender(calldata)
            .ok_or_else(|| NodeError::Other("forwarded calldata lacks sender".into()))?;
        Ok((sender, payload))
    } else {
        Ok((*caller, calldata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_forwarder::append_sender;

    fn addr(b: u8) -> Address {
        Address::new([b; 20])
    }

    #[test]
    fn calls_survive_encoding() {
        let calls = [
            TreasuryCall::Deposit,
            TreasuryCall::CreateProposal {
                recipient: addr(9),
                amount: Amount::new(5),
                voting_duration_secs: 604_800,
                description: "roof repair".into(),
            },
            TreasuryCall::CastVote {
                id: 3,
                choice: VoteChoice::Against,
            },
            TreasuryCall::ExecuteProposal { id: 3 },
        ];
        for call in calls {
            let bytes = call.encode().unwrap();
            assert_eq!(TreasuryCall::decode(&bytes).unwrap(), call);
        }
    }

    #[test]
    fn garbage_payload_is_codec_error() {
        assert!(matches!(
            TreasuryCall::decode(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(NodeError::Codec(_))
        ));
    }

    #[test]
    fn forwarder_calls_use_trailing_sender() {
        let forwarder = addr(0xF0);
        let payload = TreasuryCall::Deposit.encode().unwrap();
        let calldata = append_sender(&payload, &addr(1));

        let (sender, rest) = resolve_sender(&forwarder, &forwarder, &calldata).unwrap();
        assert_eq!(sender, addr(1));
        assert_eq!(rest, payload.as_slice());
    }

    #[test]
    fn direct_calls_use_caller() {
        let calldata = append_sender(&[1, 2], &addr(1));
        let (sender, rest) = resolve_sender(&addr(7), &addr(0xF0), &calldata).unwrap();
        assert_eq!(sender, addr(7));
        assert_eq!(rest.len(), 22);
    }

    #[test]
    fn short_forwarded_calldata_rejected() {
        let forwarder = addr(0xF0);
        assert!(resolve_sender(&forwarder, &forwarder, &[0u8; 10]).is_err());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn trailing_sender_always_recovered(
                payload in proptest::collection::vec(any::<u8>(), 0..256),
                sender in any::<[u8; 20]>(),
            ) {
                let forwarder = addr(0xF0);
                let sender = Address::new(sender);
                let calldata = append_sender(&payload, &sender);
                let (got, rest) = resolve_sender(&forwarder, &forwarder, &calldata).unwrap();
                prop_assert_eq!(got, sender);
                prop_assert_eq!(rest, payload.as_slice());
            }
        }
    }
}
