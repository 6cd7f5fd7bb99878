//! # attest-core: Foundational Types for the Credential Validation Protocol
//!
//! Every other crate in the workspace depends on `attest-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for ledger primitives.** [`Address`],
//!    [`ExposureReportId`], [`NetworkId`] and [`ContractId`] are distinct
//!    types. Validating types reject malformed input at construction and at
//!    deserialization time.
//!
//! 2. **Raw where the protocol needs a code, typed everywhere else.** The
//!    wire-level [`ValidationRequest`] keeps `contractId` and `ownerAddress`
//!    as strings so that a malformed value is answered with a stable
//!    [`ErrorCode`] instead of a parse failure.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] carries millisecond precision
//!    for challenge nonces and renders ISO 8601 with a `Z` suffix at seconds
//!    precision for the text a wallet signs.
//!
//! 4. **Stable integer error codes.** [`ErrorCode`] serializes as the integer
//!    the verifier contract promises, never as a variant name.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `attest-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod challenge;
pub mod error;
pub mod hex;
pub mod identity;
pub mod report;
pub mod request;
pub mod section;
pub mod temporal;

pub use challenge::Challenge;
pub use error::ValidationError;
pub use identity::{Address, ContractId, ExposureReportId, NetworkId};
pub use report::{ErrorCode, ReportError, SectionReport, ValidationReport};
pub use request::ValidationRequest;
pub use section::{DecryptedSections, Section};
pub use temporal::Timestamp;
