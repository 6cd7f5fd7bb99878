//! Validator configuration.
//!
//! Built once from defaults or YAML, validated, then shared read-only by
//! every request.
//!
//! ```yaml
//! accepted_contracts:
//!   - "0xcCc0000000000000000000000000000000000000"
//! allow_unauthenticated: false
//! challenge_ttl_ms: 600000000
//! challenge_tolerance_ms: 600000000
//! request_timeout_ms: 10000
//! quorum_comparison: at_least
//! count_zero_stake_signers: true
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use attest_core::ContractId;
use serde::{Deserialize, Serialize};

use crate::challenge::ChallengePolicy;

/// Default challenge lifetime: about one week.
pub const DEFAULT_CHALLENGE_TTL_MS: u64 = 600_000_000;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// How a signer count or stake is compared against its threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumComparison {
    /// `value >= threshold`.
    #[default]
    AtLeast,
    /// `value > threshold`.
    Exceeds,
}

impl QuorumComparison {
    pub fn meets(self, value: u64, threshold: u64) -> bool {
        match self {
            Self::AtLeast => value >= threshold,
            Self::Exceeds => value > threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Credential contracts this verifier accepts (case-insensitive).
    pub accepted_contracts: BTreeSet<ContractId>,
    /// Accept a bare `ownerAddress` without a signed challenge.
    pub allow_unauthenticated: bool,
    /// A challenge expires this long after its nonce.
    pub challenge_ttl_ms: u64,
    /// How far in the past a nonce may lie.
    pub challenge_tolerance_ms: u64,
    /// Deadline for all ledger lookups of one request.
    pub request_timeout_ms: u64,
    pub quorum_comparison: QuorumComparison,
    /// Count active signers with zero stake toward the signer-count
    /// threshold. Unregistered keys read back with zero stake.
    pub count_zero_stake_signers: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            accepted_contracts: BTreeSet::new(),
            allow_unauthenticated: false,
            challenge_ttl_ms: DEFAULT_CHALLENGE_TTL_MS,
            challenge_tolerance_ms: DEFAULT_CHALLENGE_TTL_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            quorum_comparison: QuorumComparison::AtLeast,
            count_zero_stake_signers: true,
        }
    }
}

impl ValidatorConfig {
    /// Defaults with a single accepted contract.
    pub fn accepting(contract: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.accepted_contracts.insert(ContractId::new(contract));
        config
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can validate anything at all.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoAcceptedContracts`] if the accepted set is empty.
    /// - [`ConfigError::ZeroDuration`] for a zero TTL, tolerance or request
    ///   timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_contracts.is_empty() {
            return Err(ConfigError::NoAcceptedContracts);
        }
        if self.challenge_ttl_ms == 0 {
            return Err(ConfigError::ZeroDuration("challenge_ttl_ms"));
        }
        if self.challenge_tolerance_ms == 0 {
            return Err(ConfigError::ZeroDuration("challenge_tolerance_ms"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("request_timeout_ms"));
        }
        Ok(())
    }

    pub fn accepts(&self, contract: &ContractId) -> bool {
        self.accepted_contracts.contains(contract)
    }

    pub fn challenge_policy(&self) -> ChallengePolicy {
        ChallengePolicy {
            ttl_ms: self.challenge_ttl_ms,
            tolerance_ms: self.challenge_tolerance_ms,
            allow_unauthenticated: self.allow_unauthenticated,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid validator config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("at least one accepted contract must be configured")]
    NoAcceptedContracts,
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_with_defaults() {
        let cfg = ValidatorConfig::from_yaml(
            "accepted_contracts: [\"0xABC0000000000000000000000000000000000000\"]\n",
        )
        .unwrap();
        assert!(cfg.accepts(&ContractId::new("0xabc0000000000000000000000000000000000000")));
        assert!(!cfg.allow_unauthenticated);
        assert_eq!(cfg.challenge_ttl_ms, DEFAULT_CHALLENGE_TTL_MS);
        assert_eq!(cfg.challenge_tolerance_ms, DEFAULT_CHALLENGE_TTL_MS);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.quorum_comparison, QuorumComparison::AtLeast);
    }

    #[test]
    fn quorum_comparison_modes() {
        let cfg = ValidatorConfig::from_yaml(
            "accepted_contracts: [\"0x01\"]\nquorum_comparison: exceeds\n",
        )
        .unwrap();
        assert_eq!(cfg.quorum_comparison, QuorumComparison::Exceeds);
        assert!(QuorumComparison::AtLeast.meets(3, 3));
        assert!(!QuorumComparison::Exceeds.meets(3, 3));
        assert!(QuorumComparison::Exceeds.meets(4, 3));
    }

    #[test]
    fn rejects_empty_contract_set() {
        assert!(matches!(
            ValidatorConfig::default().validate().unwrap_err(),
            ConfigError::NoAcceptedContracts
        ));
    }

    #[test]
    fn rejects_zero_durations() {
        let mut cfg = ValidatorConfig::accepting("0x01");
        cfg.request_timeout_ms = 0;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::ZeroDuration("request_timeout_ms")
        ));
        let err = ValidatorConfig::from_yaml("accepted_contracts: [\"0x01\"]\nchallenge_ttl_ms: 0\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration("challenge_ttl_ms")));
        let err = ValidatorConfig::from_yaml(
            "accepted_contracts: [\"0x01\"]\nchallenge_tolerance_ms: 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroDuration("challenge_tolerance_ms")));
    }

    #[test]
    fn zero_stake_signers_count_unless_disabled() {
        assert!(ValidatorConfig::accepting("0x01").count_zero_stake_signers);
        let cfg = ValidatorConfig::from_yaml(
            "accepted_contracts: [\"0x01\"]\ncount_zero_stake_signers: false\n",
        )
        .unwrap();
        assert!(!cfg.count_zero_stake_signers);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            ValidatorConfig::from_yaml("accepted_contracts: [\"0x01\"]\nttl: 5\n").unwrap_err(),
            ConfigError::Yaml(_)
        ));
    }
}
