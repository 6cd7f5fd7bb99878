//! # Select CLI
//!
//! ```bash
//! attest select --catalog unlockables.json --sections personInfo,idDocument
//! ```
//!
//! Prints the chosen keys and unlockables as JSON. Exits 2 when some
//! requested section cannot be covered.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use attest_disclosure::{select, Catalog, Selection};
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Path to the unlockable catalog (JSON).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Requested section names, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub sections: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SelectOutput<'a> {
    keys: Vec<&'a str>,
    #[serde(flatten)]
    selection: &'a Selection,
}

pub fn run_select(args: &SelectArgs) -> Result<u8> {
    let catalog = load_catalog(&args.catalog)?;
    let requested: Vec<&str> = args
        .sections
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let selection = select(&catalog, &requested);

    let out = SelectOutput {
        keys: selection.keys(),
        selection: &selection,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);

    if selection.is_complete() {
        Ok(0)
    } else {
        let missing: Vec<&str> = selection.uncovered.iter().map(String::as_str).collect();
        tracing::warn!(uncovered = %missing.join(","), "no unlockable covers some requested sections");
        Ok(2)
    }
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read catalog {}", path.display()))?;
    Catalog::from_json(&raw).with_context(|| format!("invalid catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "unlockables": {
            "a": { "cid": "1" },
            "a,b": { "cid": "2", "userPrompt": "share name?" },
            "c,d": { "cid": "3" }
        }
    }"#;

    fn write_catalog(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn complete_selection_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let args = SelectArgs {
            catalog: write_catalog(&dir, CATALOG),
            sections: vec!["b".into()],
        };
        assert_eq!(run_select(&args).unwrap(), 0);
    }

    #[test]
    fn uncovered_sections_exit_two() {
        let dir = tempfile::tempdir().unwrap();
        let args = SelectArgs {
            catalog: write_catalog(&dir, CATALOG),
            sections: vec!["a".into(), "z".into()],
        };
        assert_eq!(run_select(&args).unwrap(), 2);
    }

    #[test]
    fn unreadable_or_invalid_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_catalog(&dir.path().join("missing.json")).is_err());
        let path = write_catalog(&dir, r#"{ "unlockables": { ",": {} } }"#);
        let err = load_catalog(&path).unwrap_err();
        assert!(format!("{err:#}").contains("names no sections"));
    }
}
