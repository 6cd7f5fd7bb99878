//! # Error Types
//!
//! Format errors raised by the validating constructors in this crate. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations, and carry the offending input for operator logs.

use thiserror::Error;

/// A value failed format validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not a `0x`-prefixed, 20-byte hex address.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    /// Not a 32-byte hex exposure report identifier.
    #[error("invalid exposure report id: {0:?}")]
    InvalidExposureReportId(String),

    /// Not a `0x`-prefixed hex network identifier.
    #[error("invalid network id: {0:?}")]
    InvalidNetworkId(String),

    /// Malformed hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Timestamp outside the representable range or otherwise malformed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
