//! # Validation Report
//!
//! The wire-level result of one validation request, and the stable integer
//! error codes it carries. Codes 1 through 9 are the protocol's published
//! codes; 10 marks a check that could not be performed at all, so a verifier
//! never confuses "could not check" with "passed".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Stable protocol error codes. Serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCode {
    UnsupportedDid,
    StaleChallengeResponse,
    MissingSignature,
    UnauthenticatedNotAllowed,
    OwnerAddressMissing,
    RevokedSection,
    ExposureReportedSection,
    InsufficientSignerCount,
    InsufficientSignerStake,
    /// Ledger unreachable, malformed ledger response, or request timeout.
    InfrastructureUnavailable,
}

impl ErrorCode {
    /// All codes in ascending numeric order.
    pub const ALL: [ErrorCode; 10] = [
        Self::UnsupportedDid,
        Self::StaleChallengeResponse,
        Self::MissingSignature,
        Self::UnauthenticatedNotAllowed,
        Self::OwnerAddressMissing,
        Self::RevokedSection,
        Self::ExposureReportedSection,
        Self::InsufficientSignerCount,
        Self::InsufficientSignerStake,
        Self::InfrastructureUnavailable,
    ];

    /// The integer sent on the wire.
    pub fn code(self) -> u16 {
        match self {
            Self::UnsupportedDid => 1,
            Self::StaleChallengeResponse => 2,
            Self::MissingSignature => 3,
            Self::UnauthenticatedNotAllowed => 4,
            Self::OwnerAddressMissing => 5,
            Self::RevokedSection => 6,
            Self::ExposureReportedSection => 7,
            Self::InsufficientSignerCount => 8,
            Self::InsufficientSignerStake => 9,
            Self::InfrastructureUnavailable => 10,
        }
    }

    /// Look up a code by its wire integer.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// The upper-snake-case name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::UnsupportedDid => "UNSUPPORTED_DID",
            Self::StaleChallengeResponse => "STALE_CHALLENGE_RESPONSE",
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::UnauthenticatedNotAllowed => "UNAUTHENTICATED_NOT_ALLOWED",
            Self::OwnerAddressMissing => "OWNER_ADDRESS_MISSING",
            Self::RevokedSection => "REVOKED_SECTION",
            Self::ExposureReportedSection => "EXPOSURE_REPORTED_SECTION",
            Self::InsufficientSignerCount => "INSUFFICIENT_SIGNER_COUNT",
            Self::InsufficientSignerStake => "INSUFFICIENT_SIGNER_STAKE",
            Self::InfrastructureUnavailable => "INFRASTRUCTURE_UNAVAILABLE",
        }
    }

    pub fn is_infrastructure(self) -> bool {
        matches!(self, Self::InfrastructureUnavailable)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.code())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u16::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown error code {code}")))
    }
}

/// One error entry: a code and optional human-readable details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportError {
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ReportError {
    pub fn new(code: ErrorCode) -> Self {
        Self { code, details: None }
    }

    pub fn with_details(code: ErrorCode, details: Vec<String>) -> Self {
        Self {
            code,
            details: if details.is_empty() { None } else { Some(details) },
        }
    }
}

/// Outcome for a single section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReport {
    pub is_valid: bool,
    pub errors: Vec<ReportError>,
}

/// Outcome for a whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub is_authenticated: bool,
    pub errors: Vec<ReportError>,
    pub per_section: BTreeMap<String, SectionReport>,
}

impl ValidationReport {
    /// Whether any top-level or section error carries `code`.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
            || self
                .per_section
                .values()
                .any(|s| s.errors.iter().any(|e| e.code == code))
    }

    /// The top-level terminal error, if the request was short-circuited.
    pub fn terminal_error(&self) -> Option<&ReportError> {
        self.errors.first()
    }
}
