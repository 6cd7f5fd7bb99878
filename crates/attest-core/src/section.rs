//! # Decrypted Sections
//!
//! A section is one named, decrypted attribute bundle of a credential. The
//! protocol only interprets three keys; every other field is carried through
//! untouched as a JSON object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The decrypted sections of a request, keyed by section name.
///
/// A `BTreeMap` so that iteration and report ordering are by ascending name.
pub type DecryptedSections = BTreeMap<String, Section>;

/// One decrypted, signed section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// When the signers attested this section, in seconds since the epoch.
    #[serde(rename = "signatureTs")]
    pub signature_ts: u64,

    /// Signer signatures over the section, hex encoded.
    #[serde(default)]
    pub signatures: Vec<String>,

    /// Present only on the identity-linked section.
    #[serde(
        rename = "exposureReportID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exposure_report_id: Option<String>,

    /// Domain fields, preserved verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Section {
    /// Create a section with no domain fields.
    pub fn new(signature_ts: u64, signatures: Vec<String>) -> Self {
        Self {
            signature_ts,
            signatures,
            exposure_report_id: None,
            fields: Map::new(),
        }
    }

    /// Mark this section as identity-linked.
    pub fn with_exposure_report_id(mut self, id: impl Into<String>) -> Self {
        self.exposure_report_id = Some(id.into());
        self
    }

    /// Whether this is the identity-linked section.
    pub fn is_identity_linked(&self) -> bool {
        self.exposure_report_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_fields_survive_deserialization() {
        let v = json!({
            "first": "Kaan",
            "last": "Ankara",
            "signatureTs": 1_700_000_000u64,
            "signatures": ["0xaa", "0xbb"]
        });
        let s: Section = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(s.signature_ts, 1_700_000_000);
        assert_eq!(s.signatures.len(), 2);
        assert!(!s.is_identity_linked());
        assert_eq!(s.fields.get("first"), Some(&json!("Kaan")));
        assert_eq!(serde_json::to_value(&s).unwrap(), v);
    }

    #[test]
    fn exposure_report_id_marks_identity_section() {
        let s: Section = serde_json::from_value(json!({
            "signatureTs": 1,
            "exposureReportID": "0x01"
        }))
        .unwrap();
        assert!(s.is_identity_linked());
        assert!(s.signatures.is_empty());
        assert!(s.fields.is_empty());
    }

    #[test]
    fn missing_signature_ts_is_rejected() {
        let r: Result<Section, _> = serde_json::from_value(json!({ "signatures": [] }));
        assert!(r.is_err());
    }
}
