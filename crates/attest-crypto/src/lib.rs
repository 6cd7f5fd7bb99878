//! # attest-crypto: Signature Recovery Seam
//!
//! The protocol needs exactly one cryptographic capability: given a message
//! and a recoverable wallet signature, name the address that signed it. This
//! crate frames messages the way wallets sign them and defines the
//! [`SignerRecovery`] oracle trait behind which digesting and public-key
//! recovery live.
//!
//! - **Personal messages** ([`PersonalMessage`]) carry the EIP-191 framing
//!   `"\x19Ethereum Signed Message:\n" + len + text`.
//! - **Signatures** ([`Signature`]) are 65-byte `r || s || v` values parsed
//!   from hex, with `v` normalized to 27/28.
//! - **Section attestations** are framed by
//!   [`PersonalMessage::for_section`], binding a section's contents and
//!   timestamp to its owner.
//!
//! ## Crate Policy
//!
//! - Depends only on `attest-core` internally.
//! - The mock oracle is compiled only under the `mock` feature (or in this
//!   crate's own tests).
//! - No `unsafe` code.

pub mod error;
pub mod personal;
pub mod recovery;
pub mod signature;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::RecoveryError;
pub use personal::PersonalMessage;
pub use recovery::SignerRecovery;
pub use signature::Signature;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockRecovery;
