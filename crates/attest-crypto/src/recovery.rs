//! # Signer Recovery Oracle
//!
//! Digesting a [`PersonalMessage`] and recovering the public key behind a
//! [`Signature`] are provided by an external primitive. [`SignerRecovery`]
//! is the seam: deployments plug in a secp256k1 backend, tests use
//! [`MockRecovery`](crate::MockRecovery).

use attest_core::{Address, Section};

use crate::error::RecoveryError;
use crate::personal::PersonalMessage;
use crate::signature::Signature;

/// Recovers the address that produced a signature over a personal message.
///
/// Implementations must be `Send + Sync` so they can be shared across async
/// tasks behind an `Arc`. The trait is object-safe to support runtime
/// oracle selection.
pub trait SignerRecovery: Send + Sync {
    /// Recover the signer of `message`.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::InvalidSignature`] when the signature does
    /// not recover to a key for this message.
    fn recover(
        &self,
        message: &PersonalMessage,
        signature: &Signature,
    ) -> Result<Address, RecoveryError>;

    /// Recover every signer of a section, in signature order.
    ///
    /// The default frames the section with [`PersonalMessage::for_section`]
    /// and recovers each hex signature against it. Any malformed or
    /// unrecoverable signature fails the whole section.
    fn recover_section_signers(
        &self,
        name: &str,
        section: &Section,
        owner: &Address,
    ) -> Result<Vec<Address>, RecoveryError> {
        let message = PersonalMessage::for_section(name, section, owner)?;
        section
            .signatures
            .iter()
            .map(|raw| {
                let signature = Signature::from_hex(raw)?;
                self.recover(&message, &signature)
            })
            .collect()
    }

    /// Human-readable name of this implementation (e.g. "MockRecovery").
    fn adapter_name(&self) -> &str;
}

impl<T: SignerRecovery + ?Sized> SignerRecovery for std::sync::Arc<T> {
    fn recover(
        &self,
        message: &PersonalMessage,
        signature: &Signature,
    ) -> Result<Address, RecoveryError> {
        (**self).recover(message, signature)
    }

    fn recover_section_signers(
        &self,
        name: &str,
        section: &Section,
        owner: &Address,
    ) -> Result<Vec<Address>, RecoveryError> {
        (**self).recover_section_signers(name, section, owner)
    }

    fn adapter_name(&self) -> &str {
        (**self).adapter_name()
    }
}
