//! # Personal Messages
//!
//! Wallets never sign raw bytes: they sign an EIP-191 "personal message",
//! the payload prefixed with `\x19Ethereum Signed Message:\n` and the
//! payload's decimal byte length. Recovery oracles hash exactly these bytes.

use attest_core::{Address, Section};
use serde_json::Value;

use crate::error::RecoveryError;

const PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// An EIP-191 framed payload, ready for digesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalMessage {
    framed: Vec<u8>,
    payload_len: usize,
}

impl PersonalMessage {
    /// Frame arbitrary payload bytes.
    pub fn new(payload: impl AsRef<[u8]>) -> Self {
        let payload = payload.as_ref();
        let header = format!("{PREFIX}{}", payload.len());
        let mut framed = Vec::with_capacity(header.len() + payload.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(payload);
        Self {
            framed,
            payload_len: payload.len(),
        }
    }

    /// Frame a section attestation: the owner, section name, signing time
    /// and domain fields that the signers committed to.
    ///
    /// Domain fields are rendered as compact JSON with keys in ascending
    /// order, so the same section always frames to the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::SectionEncoding`] if the fields cannot be
    /// rendered.
    pub fn for_section(
        name: &str,
        section: &Section,
        owner: &Address,
    ) -> Result<Self, RecoveryError> {
        let mut fields = section.fields.clone();
        if let Some(id) = &section.exposure_report_id {
            fields.insert("exposureReportID".to_string(), Value::String(id.clone()));
        }
        let body = serde_json::to_string(&Value::Object(fields)).map_err(|e| {
            RecoveryError::SectionEncoding {
                section: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self::new(format!(
            "owner: {owner}\nsection: {name}\nsignatureTs: {}\nfields: {body}",
            section.signature_ts
        )))
    }

    /// The framed bytes handed to the digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.framed
    }

    /// The unframed payload.
    pub fn payload(&self) -> &[u8] {
        &self.framed[self.framed.len() - self.payload_len..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_prefixes_decimal_length() {
        let m = PersonalMessage::new("hello");
        assert_eq!(m.as_bytes(), b"\x19Ethereum Signed Message:\n5hello");
        assert_eq!(m.payload(), b"hello");
    }

    #[test]
    fn length_counts_bytes_not_chars() {
        let m = PersonalMessage::new("ş");
        assert!(m.as_bytes().starts_with(b"\x19Ethereum Signed Message:\n2"));
    }

    #[test]
    fn empty_payload() {
        let m = PersonalMessage::new("");
        assert_eq!(m.as_bytes(), b"\x19Ethereum Signed Message:\n0");
        assert!(m.payload().is_empty());
    }

    #[test]
    fn section_framing_binds_owner_and_timestamp() {
        let owner = Address::new(format!("0x{}", "11".repeat(20))).unwrap();
        let other = Address::new(format!("0x{}", "22".repeat(20))).unwrap();
        let section = Section::new(100, vec![]);

        let a = PersonalMessage::for_section("personInfo", &section, &owner).unwrap();
        let b = PersonalMessage::for_section("personInfo", &section, &other).unwrap();
        let c = PersonalMessage::for_section("personInfo", &Section::new(101, vec![]), &owner)
            .unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(
            a,
            PersonalMessage::for_section("personInfo", &section, &owner).unwrap()
        );
    }

    #[test]
    fn section_framing_includes_report_id() {
        let owner = Address::new(format!("0x{}", "11".repeat(20))).unwrap();
        let plain = Section::new(1, vec![]);
        let linked = plain.clone().with_exposure_report_id("0xabc");
        let a = PersonalMessage::for_section("s", &plain, &owner).unwrap();
        let b = PersonalMessage::for_section("s", &linked, &owner).unwrap();
        assert_ne!(a, b);
    }
}
