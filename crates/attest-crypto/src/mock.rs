//! # Mock Recovery Oracle
//!
//! A deterministic stand-in for secp256k1 recovery. A mock signature embeds
//! the signer address and a 64-bit FNV-1a fingerprint of the framed message:
//!
//! ```text
//! [0..20)  signer address
//! [20..28) fnv1a64(message), big-endian
//! [28..64) zero
//! [64]     v = 27
//! ```
//!
//! Recovery checks the fingerprint, so a mock signature only recovers for
//! the exact message it was produced over. This is enough to exercise
//! replay and substitution paths without a curve implementation.

use attest_core::{Address, Section};

use crate::error::RecoveryError;
use crate::personal::PersonalMessage;
use crate::recovery::SignerRecovery;
use crate::signature::Signature;

#[derive(Debug, Clone, Copy, Default)]
pub struct MockRecovery;

impl MockRecovery {
    /// Produce a mock signature by `signer` over `message`.
    pub fn sign(message: &PersonalMessage, signer: &Address) -> Signature {
        let mut bytes = [0u8; 65];
        bytes[..20].copy_from_slice(&signer.to_bytes());
        bytes[20..28].copy_from_slice(&fnv1a64(message.as_bytes()).to_be_bytes());
        bytes[64] = 27;
        Signature(bytes)
    }

    /// Mock-sign a challenge text, returning the hex form a client sends.
    pub fn sign_text(text: &str, signer: &Address) -> String {
        Self::sign(&PersonalMessage::new(text), signer).to_hex()
    }

    /// Mock-sign a section attestation, returning the hex form stored in
    /// `Section::signatures`.
    ///
    /// # Errors
    ///
    /// Propagates [`RecoveryError::SectionEncoding`] from framing.
    pub fn sign_section(
        name: &str,
        section: &Section,
        owner: &Address,
        signer: &Address,
    ) -> Result<String, RecoveryError> {
        let message = PersonalMessage::for_section(name, section, owner)?;
        Ok(Self::sign(&message, signer).to_hex())
    }
}

impl SignerRecovery for MockRecovery {
    fn recover(
        &self,
        message: &PersonalMessage,
        signature: &Signature,
    ) -> Result<Address, RecoveryError> {
        let bytes = signature.as_bytes();
        let expected = fnv1a64(message.as_bytes()).to_be_bytes();
        if bytes[20..28] != expected || bytes[28..64].iter().any(|b| *b != 0) {
            return Err(RecoveryError::InvalidSignature(
                "signature does not match message".to_string(),
            ));
        }
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&bytes[..20]);
        Ok(Address::from_bytes(addr))
    }

    fn adapter_name(&self) -> &str {
        "MockRecovery"
    }
}

fn fnv1a64(data: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    data.iter()
        .fold(OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn recovers_signer_for_same_message() {
        let msg = PersonalMessage::new("Please sign");
        let sig = MockRecovery::sign(&msg, &addr(7));
        assert_eq!(MockRecovery.recover(&msg, &sig).unwrap(), addr(7));
    }

    #[test]
    fn different_message_fails() {
        let sig = MockRecovery::sign(&PersonalMessage::new("a"), &addr(7));
        let err = MockRecovery
            .recover(&PersonalMessage::new("b"), &sig)
            .unwrap_err();
        assert!(matches!(err, RecoveryError::InvalidSignature(_)));
    }

    #[test]
    fn sign_text_roundtrips_through_hex() {
        let hex = MockRecovery::sign_text("hello", &addr(9));
        let sig = Signature::from_hex(&hex).unwrap();
        let got = MockRecovery
            .recover(&PersonalMessage::new("hello"), &sig)
            .unwrap();
        assert_eq!(got, addr(9));
    }

    #[test]
    fn section_signers_recovered_in_order() {
        let owner = addr(1);
        let mut section = Section::new(500, vec![]);
        let s1 = MockRecovery::sign_section("info", &section, &owner, &addr(2)).unwrap();
        let s2 = MockRecovery::sign_section("info", &section, &owner, &addr(3)).unwrap();
        section.signatures = vec![s1, s2];

        let signers = MockRecovery
            .recover_section_signers("info", &section, &owner)
            .unwrap();
        assert_eq!(signers, vec![addr(2), addr(3)]);
    }

    #[test]
    fn section_signed_for_another_owner_fails() {
        let mut section = Section::new(500, vec![]);
        let sig = MockRecovery::sign_section("info", &section, &addr(1), &addr(2)).unwrap();
        section.signatures = vec![sig];
        assert!(MockRecovery
            .recover_section_signers("info", &section, &addr(4))
            .is_err());
    }

    #[test]
    fn malformed_section_signature_fails() {
        let section = Section::new(1, vec!["0x1234".to_string()]);
        let err = MockRecovery
            .recover_section_signers("info", &section, &addr(1))
            .unwrap_err();
        assert!(matches!(err, RecoveryError::MalformedSignature(_)));
    }

    #[test]
    fn trait_object_dispatch() {
        let oracle: std::sync::Arc<dyn SignerRecovery> = std::sync::Arc::new(MockRecovery);
        assert_eq!(oracle.adapter_name(), "MockRecovery");
    }
}
