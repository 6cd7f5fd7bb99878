//! # Validation Request
//!
//! The JSON body a client sends to a verifier. `contractId` and
//! `ownerAddress` are kept as raw strings: a malformed value must surface as
//! a protocol error code, not a deserialization failure.

use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::section::DecryptedSections;

/// A request to validate a set of decrypted credential sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<Challenge>,

    /// Hex-encoded wallet signature over `challenge.text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,

    /// The credential contract; `didContract` is accepted as an alias.
    #[serde(alias = "didContract")]
    pub contract_id: String,

    /// Informational network hint; not used for routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,

    #[serde(default)]
    pub decrypted_sections: DecryptedSections,
}

impl ValidationRequest {
    /// A request with no owner proof and no sections.
    pub fn new(contract_id: impl Into<String>) -> Self {
        Self {
            challenge: None,
            signature: None,
            owner_address: None,
            contract_id: contract_id.into(),
            chain_id: None,
            decrypted_sections: DecryptedSections::new(),
        }
    }
}
