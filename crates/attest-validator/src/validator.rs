//! # Validator
//!
//! Orchestrates one request: contract check, authentication, the concurrent
//! ledger fetch and per-section scoring. Every path returns a
//! [`ValidationReport`]; nothing here panics on request input.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use attest_core::{
    Address, ContractId, ExposureReportId, SectionReport, Timestamp, ValidationReport,
    ValidationRequest,
};
use attest_crypto::SignerRecovery;
use attest_ledger::{LedgerError, LedgerQuery, QuorumThresholds, SignerInfo};
use tokio::task::JoinSet;

use crate::challenge::ChallengeAuthenticator;
use crate::config::{ConfigError, ValidatorConfig};
use crate::error::TerminalError;
use crate::report;
use crate::scoring::{self, Exposure, LedgerFacts, SectionFacts};

/// A validator bound to one ledger and one recovery oracle.
pub struct Validator<L, R> {
    ledger: Arc<L>,
    authenticator: ChallengeAuthenticator<R>,
    config: Arc<ValidatorConfig>,
}

impl<L, R> Clone for Validator<L, R> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            authenticator: self.authenticator.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

/// Recovered signers and exposure state of one section.
struct Recovered {
    signature_ts: u64,
    signers: Vec<Address>,
    failure: Option<String>,
    report_id: Result<Option<ExposureReportId>, ()>,
}

/// One completed ledger lookup.
enum Fetched {
    Revoke(u64),
    Exposure(ExposureReportId, u64),
    Thresholds(QuorumThresholds),
    Signer(SignerInfo),
}

/// Everything the scorer needs from the ledger.
struct Snapshot {
    last_revoke: u64,
    thresholds: QuorumThresholds,
    exposures: BTreeMap<ExposureReportId, u64>,
    signers: BTreeMap<Address, SignerInfo>,
}

impl<L: LedgerQuery, R: SignerRecovery + 'static> Validator<L, R> {
    /// Build a validator.
    ///
    /// # Errors
    ///
    /// Any error from [`ValidatorConfig::validate`].
    pub fn new(config: ValidatorConfig, ledger: Arc<L>, recovery: Arc<R>) -> Result<Self, ConfigError> {
        config.validate()?;
        let authenticator = ChallengeAuthenticator::new(recovery, config.challenge_policy());
        Ok(Self {
            ledger,
            authenticator,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `request` against the current time.
    pub async fn validate(&self, request: &ValidationRequest) -> ValidationReport {
        self.validate_at(request, Timestamp::now()).await
    }

    /// Validate `request` as of `now`.
    pub async fn validate_at(&self, request: &ValidationRequest, now: Timestamp) -> ValidationReport {
        let contract = ContractId::new(request.contract_id.as_str());
        if !self.config.accepts(&contract) {
            let err = TerminalError::UnsupportedDid(request.contract_id.clone());
            tracing::warn!(contract = %contract, code = %err.code(), "request rejected");
            return report::terminal(&err, false);
        }

        let auth = match self.authenticator.authenticate(request, now) {
            Ok(auth) => auth,
            Err(err) => {
                tracing::warn!(contract = %contract, code = %err.code(), error = %err, "authentication failed");
                return report::terminal(&err, false);
            }
        };

        if request.decrypted_sections.is_empty() {
            tracing::info!(contract = %contract, owner = %auth.owner, "no sections to validate");
            return report::aggregate(auth.is_authenticated, BTreeMap::new());
        }

        let recovered = self.recover_sections(request, &auth.owner);

        let fetched = tokio::time::timeout(
            self.config.request_timeout(),
            self.fetch(&auth.owner, &recovered),
        )
        .await;
        let snapshot = match fetched {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                tracing::warn!(
                    contract = %contract,
                    owner = %auth.owner,
                    chain_id = request.chain_id.as_deref().unwrap_or("-"),
                    error = %err,
                    "ledger lookup failed"
                );
                let err = TerminalError::InfrastructureUnavailable("ledger query failed".to_string());
                return report::terminal(&err, auth.is_authenticated);
            }
            Err(_) => {
                tracing::warn!(
                    contract = %contract,
                    owner = %auth.owner,
                    timeout_ms = self.config.request_timeout_ms,
                    "ledger lookups timed out"
                );
                let err = TerminalError::InfrastructureUnavailable("request timed out".to_string());
                return report::terminal(&err, auth.is_authenticated);
            }
        };

        let per_section = self.score(&recovered, &snapshot);
        let report = report::aggregate(auth.is_authenticated, per_section);
        tracing::info!(
            contract = %contract,
            owner = %auth.owner,
            chain_id = request.chain_id.as_deref().unwrap_or("-"),
            is_valid = report.is_valid,
            is_authenticated = report.is_authenticated,
            sections = report.per_section.len(),
            "request validated"
        );
        report
    }

    fn recover_sections(&self, request: &ValidationRequest, owner: &Address) -> BTreeMap<String, Recovered> {
        request
            .decrypted_sections
            .iter()
            .map(|(name, section)| {
                let (signers, failure) =
                    match self.authenticator.recovery().recover_section_signers(name, section, owner) {
                        Ok(signers) => {
                            let distinct: BTreeSet<Address> = signers.into_iter().collect();
                            (distinct.into_iter().collect(), None)
                        }
                        Err(err) => {
                            tracing::debug!(section = %name, error = %err, "signer recovery failed");
                            (Vec::new(), Some(err.to_string()))
                        }
                    };
                let report_id = match section.exposure_report_id.as_deref() {
                    None => Ok(None),
                    Some(raw) => ExposureReportId::new(raw).map(Some).map_err(|err| {
                        tracing::debug!(section = %name, error = %err, "malformed exposure report id");
                    }),
                };
                (
                    name.clone(),
                    Recovered {
                        signature_ts: section.signature_ts,
                        signers,
                        failure,
                        report_id,
                    },
                )
            })
            .collect()
    }

    /// Issue every lookup concurrently. The first failure drops the join
    /// set, which aborts the lookups still in flight.
    async fn fetch(
        &self,
        owner: &Address,
        recovered: &BTreeMap<String, Recovered>,
    ) -> Result<Snapshot, LedgerError> {
        let mut set: JoinSet<Result<Fetched, LedgerError>> = JoinSet::new();

        let ledger = Arc::clone(&self.ledger);
        let who = owner.clone();
        set.spawn(async move { ledger.last_revoke_timestamp(&who).await.map(Fetched::Revoke) });

        let ledger = Arc::clone(&self.ledger);
        set.spawn(async move { ledger.quorum_thresholds().await.map(Fetched::Thresholds) });

        let report_ids: BTreeSet<&ExposureReportId> = recovered
            .values()
            .filter_map(|r| r.report_id.as_ref().ok().and_then(Option::as_ref))
            .collect();
        for id in report_ids {
            let ledger = Arc::clone(&self.ledger);
            let id = id.clone();
            set.spawn(async move {
                let ts = ledger.exposure_reported_timestamp(&id).await?;
                Ok(Fetched::Exposure(id, ts))
            });
        }

        let signers: BTreeSet<&Address> = recovered.values().flat_map(|r| r.signers.iter()).collect();
        for signer in signers {
            let ledger = Arc::clone(&self.ledger);
            let signer = signer.clone();
            set.spawn(async move { ledger.signer_info(&signer).await.map(Fetched::Signer) });
        }

        let mut last_revoke = 0;
        let mut thresholds = None;
        let mut exposures = BTreeMap::new();
        let mut signer_info = BTreeMap::new();
        while let Some(joined) = set.join_next().await {
            let fetched = joined.map_err(|e| LedgerError::Unavailable(format!("lookup task failed: {e}")))??;
            match fetched {
                Fetched::Revoke(ts) => last_revoke = ts,
                Fetched::Thresholds(t) => thresholds = Some(t),
                Fetched::Exposure(id, ts) => {
                    exposures.insert(id, ts);
                }
                Fetched::Signer(info) => {
                    tracing::debug!(signer = %info.address, stake = info.stake, "signer info fetched");
                    signer_info.insert(info.address.clone(), info);
                }
            }
        }

        let thresholds = thresholds
            .ok_or_else(|| LedgerError::Unavailable("quorum thresholds were not fetched".to_string()))?;
        Ok(Snapshot {
            last_revoke,
            thresholds,
            exposures,
            signers: signer_info,
        })
    }

    fn score(
        &self,
        recovered: &BTreeMap<String, Recovered>,
        snapshot: &Snapshot,
    ) -> BTreeMap<String, SectionReport> {
        let ledger = LedgerFacts {
            last_revoke: snapshot.last_revoke,
            thresholds: snapshot.thresholds,
            signer_info: &snapshot.signers,
            comparison: self.config.quorum_comparison,
            count_zero_stake: self.config.count_zero_stake_signers,
        };
        recovered
            .iter()
            .map(|(name, r)| {
                let exposure = match &r.report_id {
                    Ok(None) => Exposure::NotLinked,
                    Ok(Some(id)) => Exposure::Reported(snapshot.exposures.get(id).copied().unwrap_or(0)),
                    Err(()) => Exposure::MalformedId,
                };
                let section = scoring::score_section(
                    &SectionFacts {
                        signature_ts: r.signature_ts,
                        signers: &r.signers,
                        recovery_failure: r.failure.as_deref(),
                        exposure,
                    },
                    &ledger,
                );
                if !section.is_valid {
                    let codes: Vec<u16> = section.errors.iter().map(|e| e.code.code()).collect();
                    tracing::debug!(section = %name, ?codes, "section rejected");
                }
                (name.clone(), section)
            })
            .collect()
    }
}
