//! Coffer daemon: entry point for running a treasury.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use coffer_node::{init_logging, LogFormat, Treasury, TreasuryConfig};
use coffer_rpc::RpcServer;
use coffer_types::{Address, ChainId, SystemClock};
use coffer_utils::format_duration;

#[derive(Parser)]
#[command(name = "coffer-daemon", about = "Pooled treasury with member governance")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "COFFER_CONFIG")]
    config: Option<PathBuf>,

    /// Chain id bound into forward-request signatures.
    #[arg(long, env = "COFFER_CHAIN_ID")]
    chain_id: Option<u64>,

    /// Address of the treasury (0x-prefixed hex).
    #[arg(long, env = "COFFER_TREASURY_ADDRESS")]
    treasury_address: Option<Address>,

    /// Address of the trusted forwarder (0x-prefixed hex).
    #[arg(long, env = "COFFER_FORWARDER_ADDRESS")]
    forwarder_address: Option<Address>,

    /// Smallest deposited balance allowed to vote.
    #[arg(long, env = "COFFER_MIN_VOTE_BALANCE")]
    min_vote_balance: Option<u64>,

    /// Cooldown between a voting deadline and execution, in seconds.
    #[arg(long, env = "COFFER_EXECUTION_DELAY")]
    execution_delay_secs: Option<u64>,

    /// Disable the RPC server.
    #[arg(long, env = "COFFER_DISABLE_RPC")]
    no_rpc: bool,

    /// RPC server port.
    #[arg(long, env = "COFFER_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "COFFER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "COFFER_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the treasury and serve RPC until interrupted.
    Run,
    /// Print the effective configuration as TOML and exit.
    #[command(name = "print-config")]
    PrintConfig,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<TreasuryConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let path = path.to_string_lossy();
                TreasuryConfig::from_toml_file(&path)
                    .with_context(|| format!("loading config from {path}"))?
            }
            None => TreasuryConfig::default(),
        };

        if let Some(id) = self.chain_id {
            config.chain_id = ChainId::new(id);
        }
        if let Some(addr) = self.treasury_address {
            config.treasury_address = addr;
        }
        if let Some(addr) = self.forwarder_address {
            config.forwarder_address = addr;
        }
        if let Some(min) = self.min_vote_balance {
            config.min_vote_balance = min;
        }
        if let Some(delay) = self.execution_delay_secs {
            config.execution_delay_secs = delay;
        }
        if self.no_rpc {
            config.enable_rpc = false;
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    match cli.command {
        Command::PrintConfig => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Run => {
            let format: LogFormat = config.log_format.parse()?;
            init_logging(format, &config.log_level)?;

            tracing::info!(
                "Starting Coffer treasury on chain {} (treasury {}, forwarder {}, execution delay {}, RPC:{})",
                config.chain_id,
                config.treasury_address,
                config.forwarder_address,
                format_duration(config.execution_delay_secs),
                if config.enable_rpc {
                    config.rpc_port.to_string()
                } else {
                    "off".into()
                },
            );

            let treasury = Arc::new(Treasury::new(config.clone(), Arc::new(SystemClock))?);

            if config.enable_rpc {
                let server = RpcServer::new(config.rpc_port, treasury.clone());
                tokio::select! {
                    result = server.start() => result?,
                    _ = tokio::signal::ctrl_c() => {}
                }
            } else {
                tokio::signal::ctrl_c().await?;
            }

            let summary = treasury.ledger_summary().await;
            tracing::info!(?summary, "Shutdown signal received, Coffer daemon exited cleanly");
        }
    }

    Ok(())
}
