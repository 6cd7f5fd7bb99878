//! # Config CLI
//!
//! ```bash
//! attest config check --config deployment.yaml
//! ```
//!
//! A deployment document combines the validator and ledger sections:
//!
//! ```yaml
//! validator:
//!   accepted_contracts: ["0xcCc0000000000000000000000000000000000000"]
//!   request_timeout_ms: 8000
//! ledger:
//!   networks:
//!     "0xa86a":
//!       rpc_url: https://api.avax.network/ext/bc/C/rpc
//!       did_contract: "0xcCc0000000000000000000000000000000000000"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use attest_ledger::LedgerConfig;
use attest_validator::ValidatorConfig;
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load and validate a deployment configuration.
    Check {
        /// Path to the deployment YAML.
        #[arg(long)]
        config: PathBuf,
    },
}

/// Everything a verifier deployment needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    pub validator: ValidatorConfig,
    pub ledger: LedgerConfig,
}

impl DeploymentConfig {
    /// Read, parse and validate both sections.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid deployment config {}", path.display()))?;
        config
            .validator
            .validate()
            .context("invalid validator section")?;
        config.ledger.validate().context("invalid ledger section")?;
        Ok(config)
    }
}

pub fn run_config(args: &ConfigArgs) -> Result<u8> {
    match &args.command {
        ConfigCommand::Check { config } => run_check(config),
    }
}

fn run_check(path: &Path) -> Result<u8> {
    let config = DeploymentConfig::load(path)?;
    println!("{}", summary(&config));
    Ok(0)
}

fn summary(config: &DeploymentConfig) -> String {
    let v = &config.validator;
    let l = &config.ledger;
    let mut out = String::from("deployment config OK\n");
    out.push_str(&format!(
        "  accepted contracts: {}\n",
        v.accepted_contracts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    out.push_str(&format!(
        "  unauthenticated requests: {}\n",
        if v.allow_unauthenticated { "allowed" } else { "rejected" }
    ));
    out.push_str(&format!(
        "  challenge ttl: {} ms, tolerance: {} ms\n",
        v.challenge_ttl_ms, v.challenge_tolerance_ms
    ));
    out.push_str(&format!(
        "  request timeout: {} ms, quorum: {:?}, zero-stake signers: {}\n",
        v.request_timeout_ms,
        v.quorum_comparison,
        if v.count_zero_stake_signers { "counted" } else { "ignored" }
    ));
    out.push_str(&format!(
        "  networks: {} (registry {}), ledger timeout: {} s",
        l.networks
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        l.registry_network,
        l.timeout_secs
    ));
    out
}
