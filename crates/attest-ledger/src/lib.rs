//! # attest-ledger: Ledger Query Surface
//!
//! Everything the verifier needs to know about on-chain state, behind one
//! trait, [`LedgerQuery`]:
//!
//! | Query | Where | Meaning |
//! |-------|-------|---------|
//! | `last_revoke_timestamp` | every configured network | max revocation time, 0 if never |
//! | `exposure_reported_timestamp` | registry network | last exposure report, 0 if none |
//! | `signer_info` | signer registry | stake and active interval |
//! | `quorum_thresholds` | signer registry | required signer count and stake |
//!
//! [`JsonRpcLedger`] answers these with `eth_call` against per-network
//! endpoints from [`LedgerConfig`]; [`InMemoryLedger`] answers them from
//! fixed tables and can inject failures. Return words are decoded by a
//! single typed decoder, [`abi::AbiWord`].
//!
//! ## Failure model
//!
//! Every query can fail with a [`LedgerError`]. Failures are never retried
//! here and never collapse into a default value: "could not check" must
//! stay distinguishable from "checked and clean".
//!
//! ## Crate Policy
//!
//! - Depends only on `attest-core` internally.
//! - Configuration is injected at construction; no process-wide state.

pub mod abi;
pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod query;
pub mod rpc;

pub use client::JsonRpcLedger;
pub use config::{ConfigError, LedgerConfig, NetworkEndpoint};
pub use error::LedgerError;
pub use memory::{InMemoryLedger, QueryKind};
pub use query::{LedgerQuery, QuorumThresholds, SignerInfo};
