//! # In-Memory Ledger
//!
//! A [`LedgerQuery`] answered from fixed tables, for tests and offline
//! tooling. Individual query kinds can be made to fail, and every answer can
//! be delayed, to exercise the verifier's infrastructure-failure and timeout
//! paths.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use attest_core::{Address, ExposureReportId};

use crate::error::LedgerError;
use crate::query::{LedgerQuery, QuorumThresholds, SignerInfo};

/// The four query kinds, for failure injection and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryKind {
    LastRevoke,
    ExposureReported,
    SignerInfo,
    QuorumThresholds,
}

#[derive(Debug, Clone)]
pub struct InMemoryLedger {
    thresholds: QuorumThresholds,
    revocations: BTreeMap<Address, u64>,
    exposures: BTreeMap<ExposureReportId, u64>,
    signers: BTreeMap<Address, SignerInfo>,
    failing: BTreeSet<QueryKind>,
    latency: Option<Duration>,
    calls: Arc<Mutex<Vec<QueryKind>>>,
}

impl InMemoryLedger {
    pub fn new(thresholds: QuorumThresholds) -> Self {
        Self {
            thresholds,
            revocations: BTreeMap::new(),
            exposures: BTreeMap::new(),
            signers: BTreeMap::new(),
            failing: BTreeSet::new(),
            latency: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record a revocation. Repeated calls keep the latest time.
    pub fn with_revocation(mut self, owner: Address, ts: u64) -> Self {
        let entry = self.revocations.entry(owner).or_insert(0);
        *entry = (*entry).max(ts);
        self
    }

    pub fn with_exposure(mut self, report: ExposureReportId, ts: u64) -> Self {
        self.exposures.insert(report, ts);
        self
    }

    pub fn with_signer(mut self, info: SignerInfo) -> Self {
        self.signers.insert(info.address.clone(), info);
        self
    }

    /// Make every query of `kind` fail with [`LedgerError::Unavailable`].
    pub fn failing(mut self, kind: QueryKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of queries of `kind` answered or failed so far.
    pub fn calls(&self, kind: QueryKind) -> usize {
        self.calls
            .lock()
            .map(|log| log.iter().filter(|k| **k == kind).count())
            .unwrap_or(0)
    }

    async fn enter(&self, kind: QueryKind) -> Result<(), LedgerError> {
        if let Ok(mut log) = self.calls.lock() {
            log.push(kind);
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.contains(&kind) {
            return Err(LedgerError::Unavailable(format!("{kind:?} lookup failed")));
        }
        Ok(())
    }
}

impl LedgerQuery for InMemoryLedger {
    async fn last_revoke_timestamp(&self, owner: &Address) -> Result<u64, LedgerError> {
        self.enter(QueryKind::LastRevoke).await?;
        Ok(self.revocations.get(owner).copied().unwrap_or(0))
    }

    async fn exposure_reported_timestamp(
        &self,
        report: &ExposureReportId,
    ) -> Result<u64, LedgerError> {
        self.enter(QueryKind::ExposureReported).await?;
        Ok(self.exposures.get(report).copied().unwrap_or(0))
    }

    async fn signer_info(&self, signer: &Address) -> Result<SignerInfo, LedgerError> {
        self.enter(QueryKind::SignerInfo).await?;
        Ok(self.signers.get(signer).cloned().unwrap_or(SignerInfo {
            address: signer.clone(),
            stake: 0,
            active_from: 0,
            active_until: 0,
        }))
    }

    async fn quorum_thresholds(&self) -> Result<QuorumThresholds, LedgerError> {
        self.enter(QueryKind::QuorumThresholds).await?;
        Ok(self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> QuorumThresholds {
        QuorumThresholds {
            signer_count: 3,
            stake: 100,
        }
    }

    #[tokio::test]
    async fn answers_from_tables() {
        let owner = Address::from_bytes([1; 20]);
        let signer = Address::from_bytes([2; 20]);
        let report = ExposureReportId::new("cd".repeat(32)).unwrap();
        let ledger = InMemoryLedger::new(thresholds())
            .with_revocation(owner.clone(), 50)
            .with_revocation(owner.clone(), 40)
            .with_exposure(report.clone(), 70)
            .with_signer(SignerInfo {
                address: signer.clone(),
                stake: 9,
                active_from: 1,
                active_until: 0,
            });

        assert_eq!(ledger.last_revoke_timestamp(&owner).await.unwrap(), 50);
        assert_eq!(ledger.exposure_reported_timestamp(&report).await.unwrap(), 70);
        assert_eq!(ledger.signer_info(&signer).await.unwrap().stake, 9);
        assert_eq!(ledger.quorum_thresholds().await.unwrap(), thresholds());
        assert_eq!(ledger.calls(QueryKind::SignerInfo), 1);
    }

    #[tokio::test]
    async fn unknown_entries_read_as_zero() {
        let ledger = InMemoryLedger::new(thresholds());
        let nobody = Address::from_bytes([9; 20]);
        assert_eq!(ledger.last_revoke_timestamp(&nobody).await.unwrap(), 0);
        let info = ledger.signer_info(&nobody).await.unwrap();
        assert_eq!((info.stake, info.active_from, info.active_until), (0, 0, 0));
    }

    #[tokio::test]
    async fn injected_failures_are_per_kind() {
        let ledger = InMemoryLedger::new(thresholds()).failing(QueryKind::QuorumThresholds);
        assert!(matches!(
            ledger.quorum_thresholds().await.unwrap_err(),
            LedgerError::Unavailable(_)
        ));
        assert!(ledger
            .last_revoke_timestamp(&Address::from_bytes([1; 20]))
            .await
            .is_ok());
    }
}
