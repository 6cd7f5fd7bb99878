//! # Recoverable Signatures
//!
//! A wallet signature is 65 bytes: `r` (32), `s` (32) and the recovery id
//! `v` (1). Wallets disagree on whether `v` is `0/1` or `27/28`; both are
//! accepted and stored as `27/28`.
//!
//! The 64-byte compact form (EIP-2098) is accepted as well. It folds the
//! y-parity into the top bit of `s`: `r (32) || yParity << 255 | s (32)`.

use attest_core::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecoveryError;

/// A 65-byte recoverable signature.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub(crate) [u8; 65]);

impl Signature {
    /// Create a signature from raw bytes, normalizing `v`.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::MalformedSignature`] if `v` is not one of
    /// 0, 1, 27 or 28.
    pub fn from_bytes(mut bytes: [u8; 65]) -> Result<Self, RecoveryError> {
        bytes[64] = match bytes[64] {
            0 | 27 => 27,
            1 | 28 => 28,
            v => {
                return Err(RecoveryError::MalformedSignature(format!(
                    "recovery id must be 0, 1, 27 or 28, got {v}"
                )))
            }
        };
        Ok(Self(bytes))
    }

    /// Expand a compact signature: bit 255 of the second word is the
    /// y-parity, the remaining 255 bits are `s`.
    pub fn from_compact(compact: [u8; 64]) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&compact);
        let parity = bytes[32] >> 7;
        bytes[32] &= 0x7f;
        bytes[64] = 27 + parity;
        Self(bytes)
    }

    /// Parse a signature from 130 hex digits (`r || s || v`) or 128 hex
    /// digits (compact), with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::MalformedSignature`] on bad hex, wrong length
    /// or an invalid recovery id.
    pub fn from_hex(s: &str) -> Result<Self, RecoveryError> {
        let bytes =
            hex::decode(s.trim()).map_err(|e| RecoveryError::MalformedSignature(e.to_string()))?;
        match bytes.len() {
            65 => {
                let mut full = [0u8; 65];
                full.copy_from_slice(&bytes);
                Self::from_bytes(full)
            }
            64 => {
                let mut compact = [0u8; 64];
                compact.copy_from_slice(&bytes);
                Ok(Self::from_compact(compact))
            }
            len => Err(RecoveryError::MalformedSignature(format!(
                "expected 64 or 65 bytes, got {len}"
            ))),
        }
    }

    /// The 64-byte compact form.
    pub fn to_compact(&self) -> [u8; 64] {
        let mut compact = [0u8; 64];
        compact.copy_from_slice(&self.0[..64]);
        if self.v() == 28 {
            compact[32] |= 0x80;
        }
        compact
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    /// Recovery id, always 27 or 28.
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", &hex::encode(&self.0[..8]))
    }
}
