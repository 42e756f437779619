//! Treasury configuration with TOML file support.

use serde::{Deserialize, Serialize};

use coffer_forwarder::ForwardDomain;
use coffer_types::{
    params::{EXECUTION_DELAY_SECS, PROPOSAL_THRESHOLD_PERCENT},
    Address, Amount, ChainId, GovernanceParams,
};

use crate::NodeError;

/// Configuration for a treasury instance.
///
/// Can be loaded from a TOML file via [`TreasuryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreasuryConfig {
    /// Chain id bound into every forward-request signature.
    #[serde(default)]
    pub chain_id: ChainId,

    /// Address of the treasury itself; the only target the forwarder relays to.
    #[serde(default = "default_treasury_address")]
    pub treasury_address: Address,

    /// Address of the trusted forwarder, and the verifying contract of its domain.
    #[serde(default = "default_forwarder_address")]
    pub forwarder_address: Address,

    #[serde(default = "default_domain_name")]
    pub domain_name: String,

    #[serde(default = "default_domain_version")]
    pub domain_version: String,

    /// Smallest deposited balance that may vote. Fixed for the life of the instance.
    #[serde(default = "default_min_vote_balance")]
    pub min_vote_balance: u64,

    /// Cooldown between a voting deadline and the earliest execution.
    #[serde(default = "default_execution_delay")]
    pub execution_delay_secs: u64,

    /// Share of the aggregate a creator must hold, in percent.
    #[serde(default = "default_threshold_percent")]
    pub proposal_threshold_percent: u32,

    /// Number of events kept for polling before the oldest are dropped.
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to enable the RPC server.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    /// RPC port (if enabled).
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_treasury_address() -> Address {
    Address::new([0xC0; 20])
}

fn default_forwarder_address() -> Address {
    Address::new([0xF0; 20])
}

fn default_domain_name() -> String {
    "CofferForwarder".to_string()
}

fn default_domain_version() -> String {
    "1".to_string()
}

fn default_min_vote_balance() -> u64 {
    1
}

fn default_execution_delay() -> u64 {
    EXECUTION_DELAY_SECS
}

fn default_threshold_percent() -> u32 {
    PROPOSAL_THRESHOLD_PERCENT
}

fn default_event_log_capacity() -> usize {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rpc_port() -> u16 {
    7077
}

// ── Impl ───────────────────────────────────────────────────────────────

impl TreasuryConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject settings the treasury cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.treasury_address.is_zero() {
            return Err(NodeError::Config("treasury_address must not be zero".into()));
        }
        if self.forwarder_address.is_zero() {
            return Err(NodeError::Config("forwarder_address must not be zero".into()));
        }
        if self.treasury_address == self.forwarder_address {
            return Err(NodeError::Config(
                "treasury_address and forwarder_address must differ".into(),
            ));
        }
        if self.proposal_threshold_percent > 100 {
            return Err(NodeError::Config(format!(
                "proposal_threshold_percent {} exceeds 100",
                self.proposal_threshold_percent
            )));
        }
        Ok(())
    }

    pub fn governance_params(&self) -> GovernanceParams {
        GovernanceParams {
            min_vote_balance: Amount::new(u128::from(self.min_vote_balance)),
            execution_delay_secs: self.execution_delay_secs,
            proposal_threshold_percent: self.proposal_threshold_percent,
        }
    }

    pub fn forward_domain(&self) -> ForwardDomain {
        ForwardDomain::new(
            self.domain_name.clone(),
            self.domain_version.clone(),
            self.chain_id,
            self.forwarder_address,
        )
    }
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::default(),
            treasury_address: default_treasury_address(),
            forwarder_address: default_forwarder_address(),
            domain_name: default_domain_name(),
            domain_version: default_domain_version(),
            min_vote_balance: default_min_vote_balance(),
            execution_delay_secs: default_execution_delay(),
            proposal_threshold_percent: default_threshold_percent(),
            event_log_capacity: default_event_log_capacity(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_rpc: default_true(),
            rpc_port: default_rpc_port(),
        }
    }
}
