//! Errors raised while parsing signatures or recovering signers.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// The signature bytes are not a 65-byte recoverable signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Well-formed bytes that do not recover to a signer for this message.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// A section could not be framed into its attestation message.
    #[error("section {section:?} cannot be framed: {reason}")]
    SectionEncoding { section: String, reason: String },
}
