//! # attest-disclosure: Minimal Selective Disclosure
//!
//! A credential's encrypted data is split into overlapping *unlockables*,
//! each covering a subset of section names. Before decrypting anything the
//! holder picks the fewest unlockables that cover the requested sections,
//! preferring those that expose the fewest unrequested ones.
//!
//! - [`Catalog`] models the unlockable map attached to a credential.
//! - [`select`] runs the three-tier selection (singleton, pair, greedy) and
//!   returns a [`Selection`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `attest-*` crates; selection is pure.
//! - Deterministic: identical inputs always produce identical output.

pub mod catalog;
pub mod selector;

pub use catalog::{Catalog, CatalogError, Unlockable};
pub use selector::{select, ChosenUnlockable, Selection};
