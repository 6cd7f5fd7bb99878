//! # Identity Newtypes
//!
//! Ledger-facing identifiers. Each identifier is a distinct type; you cannot
//! pass an [`ExposureReportId`] where an [`Address`] is expected.
//!
//! ## Validation
//!
//! [`Address`], [`ExposureReportId`] and [`NetworkId`] validate format at
//! construction and on deserialization, and are stored in lowercase so that
//! equality and ordering never depend on the checksum casing a wallet chose.
//! [`ContractId`] is deliberately lenient: any string is accepted (lowercased)
//! because an unknown or malformed contract must be answered with
//! `UNSUPPORTED_DID`, not with a parse failure.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::hex;

/// Implement `Deserialize` for string newtypes that must validate their
/// contents. Deserializes as a plain `String`, then routes through the type's
/// `new()` constructor so that invalid values are rejected at deserialization
/// time instead of being silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A 20-byte account address, stored as `0x` + 40 lowercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Address(String);

impl_validating_deserialize!(Address);

impl Address {
    /// Create an address from a `0x`-prefixed hex string of 40 digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] if the prefix is missing,
    /// the length is wrong, or a digit is not hex.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let digits = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(d) => d,
            None => return Err(ValidationError::InvalidAddress(s)),
        };
        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAddress(s));
        }
        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// Create an address from its raw 20 bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(&bytes)))
    }

    /// The raw 20 address bytes.
    pub fn to_bytes(&self) -> [u8; 20] {
        // Validated at construction: 40 hex digits always decode to 20 bytes.
        hex::decode_fixed(&self.0).unwrap_or([0u8; 20])
    }

    /// Access the `0x`-prefixed lowercase form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of an exposure report: 32 bytes, stored as 64 lowercase hex
/// digits without a prefix (the form appended to call data).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ExposureReportId(String);

impl_validating_deserialize!(ExposureReportId);

impl ExposureReportId {
    /// Create a report id from 64 hex digits, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidExposureReportId`] on any other shape.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let digits = hex::strip_prefix(&s);
        if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidExposureReportId(s));
        }
        Ok(Self(digits.to_ascii_lowercase()))
    }

    /// The 64 lowercase hex digits, no prefix.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExposureReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", self.0)
    }
}

/// Ledger network identifier in its `0x`-prefixed hex chain-id form
/// (e.g. `0x1`, `0xa86a`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NetworkId(String);

impl_validating_deserialize!(NetworkId);

impl NetworkId {
    /// Create a network id from a `0x`-prefixed hex string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNetworkId`] if the prefix is missing
    /// or the digits are empty, too long, or not hex.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let digits = match s.strip_prefix("0x") {
            Some(d) => d,
            None => return Err(ValidationError::InvalidNetworkId(s)),
        };
        if digits.is_empty() || digits.len() > 16 || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(ValidationError::InvalidNetworkId(s));
        }
        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// The network for a numeric chain id.
    pub fn from_chain_id(chain_id: u64) -> Self {
        Self(format!("0x{chain_id:x}"))
    }

    /// The numeric chain id.
    pub fn chain_id(&self) -> u64 {
        // At most 16 hex digits, validated at construction.
        u64::from_str_radix(&self.0[2..], 16).unwrap_or(0)
    }

    /// Access the `0x`-prefixed form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The credential contract a request claims to be issued by.
///
/// Compared case-insensitively against the accepted-contract set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ContractId(String);

impl ContractId {
    /// Create a contract id; any string is accepted and lowercased.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_ascii_lowercase())
    }

    /// Access the normalized string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ContractId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::new(String::deserialize(deserializer)?))
    }
}

impl From<&Address> for ContractId {
    fn from(addr: &Address) -> Self {
        Self::new(addr.as_str())
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
