//! # JSON-RPC Ledger
//!
//! [`LedgerQuery`] over `eth_call`. Revocations are read from the credential
//! contract on every configured network and the maximum wins; exposure
//! reports and the signer registry are read from the registry network only.

use std::sync::Arc;
use std::time::Duration;

use attest_core::{Address, ExposureReportId, NetworkId};
use tokio::task::JoinSet;

use crate::abi::{self, layout, AbiWord, Calldata};
use crate::config::{LedgerConfig, NetworkEndpoint};
use crate::error::LedgerError;
use crate::query::{LedgerQuery, QuorumThresholds, SignerInfo};
use crate::rpc::JsonRpc;

/// Ledger client backed by per-network JSON-RPC endpoints.
#[derive(Debug, Clone)]
pub struct JsonRpcLedger {
    rpc: JsonRpc,
    config: Arc<LedgerConfig>,
}

impl JsonRpcLedger {
    /// Create a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Config`] if the configuration is inconsistent, or
    /// [`LedgerError::Unavailable`] if the HTTP client cannot be built.
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let rpc = JsonRpc::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            rpc,
            config: Arc::new(config),
        })
    }

    /// Create a client from `ATTEST_LEDGER_CONFIG`.
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::new(LedgerConfig::from_env()?)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn endpoint(&self, network: &NetworkId) -> Result<&NetworkEndpoint, LedgerError> {
        self.config
            .networks
            .get(network)
            .ok_or_else(|| LedgerError::UnknownNetwork(network.clone()))
    }

    async fn registry_call(
        &self,
        query: &'static str,
        to: &Address,
        data: &Calldata,
    ) -> Result<AbiWord, LedgerError> {
        let network = &self.config.registry_network;
        let endpoint = self.endpoint(network)?;
        self.rpc
            .eth_call(query, network, &endpoint.rpc_url, to, data)
            .await
    }

    /// The 32-byte content handle of `owner`'s credential on `network`.
    pub async fn handle_of(
        &self,
        network: &NetworkId,
        owner: &Address,
    ) -> Result<[u8; 32], LedgerError> {
        let endpoint = self.endpoint(network)?;
        let data = Calldata::selector(abi::HANDLE_OF).address(owner);
        let word = self
            .rpc
            .eth_call("handleOf", network, &endpoint.rpc_url, &endpoint.did_contract, &data)
            .await?;
        Ok(*word.as_bytes())
    }

    /// Whether `owner` holds a credential on `network`.
    pub async fn has_credential(
        &self,
        network: &NetworkId,
        owner: &Address,
    ) -> Result<bool, LedgerError> {
        Ok(self.handle_of(network, owner).await?.iter().any(|b| *b != 0))
    }
}

impl LedgerQuery for JsonRpcLedger {
    async fn last_revoke_timestamp(&self, owner: &Address) -> Result<u64, LedgerError> {
        let data = Calldata::selector(abi::LAST_REVOKE).address(owner);
        let mut lookups = JoinSet::new();
        for (network, endpoint) in &self.config.networks {
            let rpc = self.rpc.clone();
            let network = network.clone();
            let endpoint = endpoint.clone();
            let data = data.clone();
            lookups.spawn(async move {
                let word = rpc
                    .eth_call(
                        "revokes",
                        &network,
                        &endpoint.rpc_url,
                        &endpoint.did_contract,
                        &data,
                    )
                    .await?;
                word.uint("revokes", layout::REVOKE_TIMESTAMP)
            });
        }

        let mut latest = 0;
        while let Some(joined) = lookups.join_next().await {
            let ts = joined.map_err(|e| {
                LedgerError::Unavailable(format!("revocation lookup task failed: {e}"))
            })??;
            latest = latest.max(ts);
        }
        tracing::debug!(%owner, latest, "last revocation");
        Ok(latest)
    }

    async fn exposure_reported_timestamp(
        &self,
        report: &ExposureReportId,
    ) -> Result<u64, LedgerError> {
        let registry = self.endpoint(&self.config.registry_network)?;
        let data = Calldata::selector(abi::EXPOSURE_REPORTED).report_id(report);
        let word = self
            .registry_call("exposureReported", &registry.did_contract, &data)
            .await?;
        word.uint("exposureReported", layout::EXPOSURE_TIMESTAMP)
    }

    async fn signer_info(&self, signer: &Address) -> Result<SignerInfo, LedgerError> {
        let data = Calldata::selector(abi::SIGNER_INFO).address(signer);
        let word = self
            .registry_call("signerInfo", &self.config.signers_contract, &data)
            .await?;
        Ok(SignerInfo {
            address: signer.clone(),
            stake: word.uint("signerInfo", layout::SIGNER_STAKE)?,
            active_from: word.uint("signerInfo", layout::SIGNER_START_TS)?,
            active_until: word.uint("signerInfo", layout::SIGNER_END_TS)?,
        })
    }

    async fn quorum_thresholds(&self) -> Result<QuorumThresholds, LedgerError> {
        let contract = &self.config.signers_contract;
        let count = Calldata::selector(abi::SIGNER_COUNT_NEEDED);
        let stake = Calldata::selector(abi::SIGNER_STAKE_NEEDED);
        let (count, stake) = tokio::try_join!(
            self.registry_call("signerCountNeeded", contract, &count),
            self.registry_call("signerStakeNeeded", contract, &stake),
        )?;
        Ok(QuorumThresholds {
            signer_count: count.uint("signerCountNeeded", layout::COUNT_NEEDED)?,
            stake: stake.uint("signerStakeNeeded", layout::STAKE_NEEDED)?,
        })
    }
}
