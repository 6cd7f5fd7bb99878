//! # Unlockable Catalog
//!
//! Wire form, as attached to a credential:
//!
//! ```json
//! { "unlockables": { "personInfo,contactInfo": { "userPrompt": "...", ... } } }
//! ```
//!
//! The key is the comma-separated list of section names the entry unlocks.
//! Everything besides `userPrompt` is an opaque encrypted payload.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unlockable key {0:?} names no sections")]
    EmptyKey(String),
}

/// One encrypted bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unlockable {
    /// Shown to the holder by the wallet; never forwarded for decryption.
    #[serde(
        rename = "userPrompt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_prompt: Option<String>,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Unlockable {
    /// This unlockable with its prompt removed.
    pub fn without_prompt(&self) -> Self {
        Self {
            user_prompt: None,
            payload: self.payload.clone(),
        }
    }
}

/// All unlockables of one credential, keyed by covered-name list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub unlockables: BTreeMap<String, Unlockable>,
}

impl Catalog {
    /// Parse a catalog and check every key names at least one section.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Json`] on malformed JSON, [`CatalogError::EmptyKey`]
    /// if a key contains only commas or whitespace.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(raw)?;
        if let Some(key) = catalog
            .unlockables
            .keys()
            .find(|k| covered_names(k).is_empty())
        {
            return Err(CatalogError::EmptyKey(key.clone()));
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.unlockables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlockables.is_empty()
    }

    /// Insert an unlockable covering `names`, joining them into the key.
    pub fn insert(&mut self, names: &[&str], unlockable: Unlockable) {
        self.unlockables.insert(names.join(","), unlockable);
    }
}

/// Section names covered by a catalog key.
pub fn covered_names(key: &str) -> BTreeSet<String> {
    key.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}
