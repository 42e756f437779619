use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Ledger(#[from] coffer_ledger::LedgerError),

    #[error(transparent)]
    Governance(#[from] coffer_governance::GovernanceError),

    #[error(transparent)]
    Forwarder(#[from] coffer_forwarder::ForwarderError),

    #[error("malformed call: {0}")]
    Codec(#[from] bincode::Error),

    #[error("direct call from {0} claims to be the trusted forwarder")]
    SpoofedForwarder(coffer_types::Address),

    #[error("{0} does not accept value")]
    NonPayable(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
