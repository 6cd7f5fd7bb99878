//! Terminal rejections.
//!
//! A terminal error ends evaluation of the whole request. Each variant maps
//! to exactly one wire [`ErrorCode`]; detail strings are safe to return to
//! the client and never carry ledger endpoints or transport errors.

use attest_core::{ErrorCode, ReportError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    #[error("contract {0:?} is not accepted")]
    UnsupportedDid(String),

    #[error("stale challenge response: {0}")]
    StaleChallengeResponse(String),

    #[error("challenge present without a signature")]
    MissingSignature,

    #[error("unauthenticated requests are not allowed")]
    UnauthenticatedNotAllowed,

    /// `None` when absent, `Some(reason)` when present but malformed.
    #[error("owner address missing or malformed")]
    OwnerAddressMissing(Option<String>),

    #[error("infrastructure unavailable: {0}")]
    InfrastructureUnavailable(String),
}

impl TerminalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedDid(_) => ErrorCode::UnsupportedDid,
            Self::StaleChallengeResponse(_) => ErrorCode::StaleChallengeResponse,
            Self::MissingSignature => ErrorCode::MissingSignature,
            Self::UnauthenticatedNotAllowed => ErrorCode::UnauthenticatedNotAllowed,
            Self::OwnerAddressMissing(_) => ErrorCode::OwnerAddressMissing,
            Self::InfrastructureUnavailable(_) => ErrorCode::InfrastructureUnavailable,
        }
    }

    pub fn details(&self) -> Vec<String> {
        match self {
            Self::StaleChallengeResponse(reason)
            | Self::OwnerAddressMissing(Some(reason))
            | Self::InfrastructureUnavailable(reason) => vec![reason.clone()],
            Self::UnsupportedDid(_)
            | Self::MissingSignature
            | Self::UnauthenticatedNotAllowed
            | Self::OwnerAddressMissing(None) => Vec::new(),
        }
    }

    pub fn to_report_error(&self) -> ReportError {
        ReportError::with_details(self.code(), self.details())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_wire_values() {
        assert_eq!(TerminalError::UnsupportedDid("x".into()).code().code(), 1);
        assert_eq!(
            TerminalError::StaleChallengeResponse("old".into()).code().code(),
            2
        );
        assert_eq!(TerminalError::MissingSignature.code().code(), 3);
        assert_eq!(TerminalError::UnauthenticatedNotAllowed.code().code(), 4);
        assert_eq!(TerminalError::OwnerAddressMissing(None).code().code(), 5);
        assert_eq!(
            TerminalError::InfrastructureUnavailable("down".into()).code().code(),
            10
        );
    }

    #[test]
    fn unsupported_contract_has_no_details() {
        let e = TerminalError::UnsupportedDid("0xdead".into()).to_report_error();
        assert!(e.details.is_none());
    }

    #[test]
    fn malformed_owner_carries_reason() {
        let e = TerminalError::OwnerAddressMissing(Some("bad hex".into())).to_report_error();
        assert_eq!(e.details, Some(vec!["bad hex".to_string()]));
        assert!(TerminalError::OwnerAddressMissing(None)
            .to_report_error()
            .details
            .is_none());
    }
}
