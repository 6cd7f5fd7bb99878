//! # Section Scoring
//!
//! Pure evaluation of one section against already-fetched ledger facts.
//! A section is valid iff, at its `signatureTs`:
//!
//! - the distinct active signers meet the count threshold,
//! - their summed stake meets the stake threshold,
//! - `signatureTs ≥ lastRevoke`,
//! - for identity-linked sections, `signatureTs ≥ exposureReported`.
//!
//! Each failed predicate contributes one error, in the order
//! count (8), stake (9), revoked (6), exposure (7).

use std::collections::BTreeMap;

use attest_core::{Address, ErrorCode, ReportError, SectionReport};
use attest_ledger::{QuorumThresholds, SignerInfo};

use crate::config::QuorumComparison;

/// Exposure-report state of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exposure {
    /// The section carries no `exposureReportID`.
    NotLinked,
    /// Last exposure report time for the section's report id; 0 if none.
    Reported(u64),
    /// The section carries an `exposureReportID` that is not 32-byte hex.
    MalformedId,
}

/// Per-section inputs.
#[derive(Debug, Clone)]
pub struct SectionFacts<'a> {
    pub signature_ts: u64,
    /// Recovered signers, already de-duplicated.
    pub signers: &'a [Address],
    /// Why signer recovery failed, if it did.
    pub recovery_failure: Option<&'a str>,
    pub exposure: Exposure,
}

/// Request-wide ledger facts shared by every section.
#[derive(Debug, Clone, Copy)]
pub struct LedgerFacts<'a> {
    pub last_revoke: u64,
    pub thresholds: QuorumThresholds,
    pub signer_info: &'a BTreeMap<Address, SignerInfo>,
    pub comparison: QuorumComparison,
    /// Whether active signers with zero stake add to the count.
    pub count_zero_stake: bool,
}

/// Count and summed stake of the signers active at `ts`.
///
/// Signers with no fetched registry entry do not qualify. An unregistered
/// key reads back as all zeros and so is active from 0 with no stake;
/// `count_zero_stake = false` keeps such keys out of the count.
pub fn active_quorum(
    signers: &[Address],
    ts: u64,
    info: &BTreeMap<Address, SignerInfo>,
    count_zero_stake: bool,
) -> (u64, u64) {
    signers
        .iter()
        .filter_map(|s| info.get(s))
        .filter(|i| i.is_active_at(ts))
        .filter(|i| count_zero_stake || i.stake > 0)
        .fold((0u64, 0u64), |(count, stake), i| {
            (count + 1, stake.saturating_add(i.stake))
        })
}

/// Score one section.
pub fn score_section(section: &SectionFacts<'_>, ledger: &LedgerFacts<'_>) -> SectionReport {
    let ts = section.signature_ts;
    let (count, stake) = active_quorum(
        section.signers,
        ts,
        ledger.signer_info,
        ledger.count_zero_stake,
    );
    let mut errors = Vec::new();

    if !ledger.comparison.meets(count, ledger.thresholds.signer_count) {
        let details = section
            .recovery_failure
            .map(|reason| vec![reason.to_string()])
            .unwrap_or_default();
        errors.push(ReportError::with_details(
            ErrorCode::InsufficientSignerCount,
            details,
        ));
    }
    if !ledger.comparison.meets(stake, ledger.thresholds.stake) {
        errors.push(ReportError::new(ErrorCode::InsufficientSignerStake));
    }
    if ts < ledger.last_revoke {
        errors.push(ReportError::new(ErrorCode::RevokedSection));
    }
    match section.exposure {
        Exposure::NotLinked => {}
        Exposure::Reported(reported) if ts >= reported => {}
        Exposure::Reported(_) => {
            errors.push(ReportError::new(ErrorCode::ExposureReportedSection));
        }
        Exposure::MalformedId => errors.push(ReportError::with_details(
            ErrorCode::ExposureReportedSection,
            vec!["malformed exposureReportID".to_string()],
        )),
    }

    SectionReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn registry(entries: &[(u8, u64, u64, u64)]) -> BTreeMap<Address, SignerInfo> {
        entries
            .iter()
            .map(|&(b, stake, from, until)| {
                (
                    addr(b),
                    SignerInfo {
                        address: addr(b),
                        stake,
                        active_from: from,
                        active_until: until,
                    },
                )
            })
            .collect()
    }

    fn ledger(info: &BTreeMap<Address, SignerInfo>) -> LedgerFacts<'_> {
        LedgerFacts {
            last_revoke: 0,
            thresholds: QuorumThresholds {
                signer_count: 2,
                stake: 20,
            },
            signer_info: info,
            comparison: QuorumComparison::AtLeast,
            count_zero_stake: true,
        }
    }

    fn codes(report: &SectionReport) -> Vec<u16> {
        report.errors.iter().map(|e| e.code.code()).collect()
    }

    #[test]
    fn quorum_met_is_valid() {
        let info = registry(&[(1, 10, 0, 0), (2, 10, 0, 0)]);
        let signers = [addr(1), addr(2)];
        let r = score_section(
            &SectionFacts {
                signature_ts: 100,
                signers: &signers,
                recovery_failure: None,
                exposure: Exposure::NotLinked,
            },
            &ledger(&info),
        );
        assert!(r.is_valid);
        assert!(r.errors.is_empty());
    }

    #[test]
    fn inactive_signers_do_not_count() {
        let info = registry(&[(1, 10, 0, 0), (2, 10, 100, 0), (3, 10, 0, 50)]);
        assert_eq!(active_quorum(&[addr(1), addr(2), addr(3)], 100, &info, true), (1, 10));
        assert_eq!(active_quorum(&[addr(1), addr(2)], 101, &info, true), (2, 20));
        assert_eq!(active_quorum(&[addr(9)], 101, &info, true), (0, 0));
    }

    #[test]
    fn errors_follow_fixed_order() {
        let info = registry(&[(1, 5, 0, 0)]);
        let signers = [addr(1)];
        let mut facts = ledger(&info);
        facts.last_revoke = 200;
        let r = score_section(
            &SectionFacts {
                signature_ts: 100,
                signers: &signers,
                recovery_failure: None,
                exposure: Exposure::Reported(150),
            },
            &facts,
        );
        assert!(!r.is_valid);
        assert_eq!(codes(&r), vec![8, 9, 6, 7]);
    }

    #[test]
    fn revocation_boundary_is_inclusive() {
        let info = registry(&[(1, 10, 0, 0), (2, 10, 0, 0)]);
        let signers = [addr(1), addr(2)];
        let mut facts = ledger(&info);
        facts.last_revoke = 100;
        let section = SectionFacts {
            signature_ts: 100,
            signers: &signers,
            recovery_failure: None,
            exposure: Exposure::Reported(100),
        };
        assert!(score_section(&section, &facts).is_valid);
        facts.last_revoke = 101;
        assert_eq!(codes(&score_section(&section, &facts)), vec![6]);
    }

    #[test]
    fn exceeds_mode_rejects_exact_threshold() {
        let info = registry(&[(1, 10, 0, 0), (2, 10, 0, 0)]);
        let signers = [addr(1), addr(2)];
        let mut facts = ledger(&info);
        facts.comparison = QuorumComparison::Exceeds;
        let r = score_section(
            &SectionFacts {
                signature_ts: 100,
                signers: &signers,
                recovery_failure: None,
                exposure: Exposure::NotLinked,
            },
            &facts,
        );
        assert_eq!(codes(&r), vec![8, 9]);
    }

    #[test]
    fn recovery_failure_is_a_count_detail() {
        let info = BTreeMap::new();
        let r = score_section(
            &SectionFacts {
                signature_ts: 100,
                signers: &[],
                recovery_failure: Some("malformed signature"),
                exposure: Exposure::NotLinked,
            },
            &ledger(&info),
        );
        assert_eq!(
            r.errors[0].details,
            Some(vec!["malformed signature".to_string()])
        );
        assert_eq!(codes(&r), vec![8, 9]);
    }

    #[test]
    fn malformed_report_id_is_an_exposure_error() {
        let info = registry(&[(1, 10, 0, 0), (2, 10, 0, 0)]);
        let signers = [addr(1), addr(2)];
        let r = score_section(
            &SectionFacts {
                signature_ts: 100,
                signers: &signers,
                recovery_failure: None,
                exposure: Exposure::MalformedId,
            },
            &ledger(&info),
        );
        assert_eq!(codes(&r), vec![7]);
        assert!(r.errors[0].details.is_some());
    }

    #[test]
    fn stake_sum_saturates() {
        let info = registry(&[(1, u64::MAX, 0, 0), (2, u64::MAX, 0, 0)]);
        assert_eq!(active_quorum(&[addr(1), addr(2)], 1, &info, true), (2, u64::MAX));
    }

    #[test]
    fn zero_stake_padding_cannot_meet_stake_threshold() {
        // One staked signer plus unregistered keys, which read back as zeros.
        let info = registry(&[(1, 10, 0, 0), (2, 0, 0, 0), (3, 0, 0, 0)]);
        let signers = [addr(1), addr(2), addr(3)];
        let section = SectionFacts {
            signature_ts: 100,
            signers: &signers,
            recovery_failure: None,
            exposure: Exposure::NotLinked,
        };

        let mut facts = ledger(&info);
        assert_eq!(codes(&score_section(&section, &facts)), vec![9]);

        facts.count_zero_stake = false;
        assert_eq!(active_quorum(&signers, 100, &info, false), (1, 10));
        assert_eq!(codes(&score_section(&section, &facts)), vec![8, 9]);
    }

    #[test]
    fn excluding_zero_stake_keeps_staked_quorum_valid() {
        let info = registry(&[(1, 10, 0, 0), (2, 10, 0, 0), (3, 0, 0, 0)]);
        let signers = [addr(1), addr(2), addr(3)];
        let mut facts = ledger(&info);
        facts.count_zero_stake = false;
        let r = score_section(
            &SectionFacts {
                signature_ts: 100,
                signers: &signers,
                recovery_failure: None,
                exposure: Exposure::NotLinked,
            },
            &facts,
        );
        assert!(r.is_valid);
    }
}
