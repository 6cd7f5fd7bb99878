//! # Ledger Query Trait
//!
//! The read-only surface the validator depends on. Implementations must be
//! shareable across tasks: the validator fans queries out concurrently from
//! behind an `Arc`.

use std::future::Future;

use attest_core::{Address, ExposureReportId};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A registered signer's stake and active interval, in ledger seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerInfo {
    pub address: Address,
    pub stake: u64,
    pub active_from: u64,
    /// 0 means open-ended.
    pub active_until: u64,
}

impl SignerInfo {
    /// Whether the signer was active at `ts`: strictly after `active_from`
    /// and, unless open-ended, strictly before `active_until`.
    pub fn is_active_at(&self, ts: u64) -> bool {
        self.active_from < ts && (self.active_until == 0 || ts < self.active_until)
    }
}

/// Quorum a section's qualifying signers must reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumThresholds {
    pub signer_count: u64,
    pub stake: u64,
}

/// Read-only ledger queries.
pub trait LedgerQuery: Send + Sync + 'static {
    /// Latest revocation time of `owner` across every network; 0 if never.
    fn last_revoke_timestamp(
        &self,
        owner: &Address,
    ) -> impl Future<Output = Result<u64, LedgerError>> + Send;

    /// Latest exposure report time for `report`; 0 if none.
    fn exposure_reported_timestamp(
        &self,
        report: &ExposureReportId,
    ) -> impl Future<Output = Result<u64, LedgerError>> + Send;

    /// Registry entry for `signer`. Unregistered signers read as all zeros.
    fn signer_info(
        &self,
        signer: &Address,
    ) -> impl Future<Output = Result<SignerInfo, LedgerError>> + Send;

    /// Current quorum thresholds.
    fn quorum_thresholds(&self) -> impl Future<Output = Result<QuorumThresholds, LedgerError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(from: u64, until: u64) -> SignerInfo {
        SignerInfo {
            address: Address::from_bytes([1; 20]),
            stake: 10,
            active_from: from,
            active_until: until,
        }
    }

    #[test]
    fn open_ended_interval() {
        let s = info(100, 0);
        assert!(!s.is_active_at(100));
        assert!(s.is_active_at(101));
        assert!(s.is_active_at(u64::MAX));
    }

    #[test]
    fn closed_interval_excludes_both_ends() {
        let s = info(100, 200);
        assert!(!s.is_active_at(100));
        assert!(s.is_active_at(150));
        assert!(!s.is_active_at(200));
    }

    #[test]
    fn unregistered_signer_reads_as_active_from_epoch() {
        assert!(info(0, 0).is_active_at(1));
        assert!(!info(0, 0).is_active_at(0));
    }
}
