//! # attest-validator: Credential Validation
//!
//! Runs the decision procedure for one [`ValidationRequest`]:
//!
//! ```text
//! Start → ContractCheck → Authenticate → Fetch → Score → Done
//! ```
//!
//! - **ContractCheck** rejects contracts outside the accepted set.
//! - **Authenticate** ([`ChallengeAuthenticator`]) derives the owner from a
//!   fresh signed challenge, or accepts a bare address when the deployment
//!   allows unauthenticated requests.
//! - **Fetch** issues every ledger lookup concurrently under one deadline.
//!   Any failure aborts the request; there is no partial trust decision.
//! - **Score** ([`scoring`]) evaluates each section independently against
//!   quorum, revocation and exposure.
//! - **Done** ([`report`]) assembles the wire report.
//!
//! Terminal failures become a report with a single top-level error and no
//! sections; business-rule failures are reported per section and never stop
//! sibling sections from being evaluated.
//!
//! ## Crate Policy
//!
//! - Configuration ([`ValidatorConfig`]) is validated once at construction
//!   and immutable afterwards.
//! - `validate` always returns a report; it never panics on request input.
//!
//! [`ValidationRequest`]: attest_core::ValidationRequest

pub mod challenge;
pub mod config;
pub mod error;
pub mod report;
pub mod scoring;
pub mod validator;

pub use challenge::{Authenticated, ChallengeAuthenticator, ChallengePolicy};
pub use config::{ConfigError, QuorumComparison, ValidatorConfig};
pub use error::TerminalError;
pub use validator::Validator;
