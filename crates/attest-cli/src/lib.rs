//! # attest-cli: Verifier Command-Line Interface
//!
//! ## Subcommands
//!
//! - `select`: plan which unlockable bundles to decrypt for a set of
//!   requested sections
//! - `challenge`: issue a fresh challenge for a wallet to sign
//! - `config check`: load and validate a deployment configuration
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return
//!   `anyhow::Result<u8>` exit codes.
//! - Handlers delegate to domain crates; no protocol logic here.

pub mod challenge;
pub mod config;
pub mod select;
