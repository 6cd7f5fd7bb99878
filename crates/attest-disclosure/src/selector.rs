//! # Disclosure Selector
//!
//! Picks the fewest unlockables whose covered names include every requested
//! section, breaking ties by the fewest unrequested ("excess") names. Three
//! tiers, first success wins:
//!
//! 1. **Singleton**: the covering entry with least excess.
//! 2. **Pair**: the covering unordered pair with the lowest pair score. Names
//!    excluded by both members are discounted by half, so a shared exclusion
//!    is not double-penalized.
//! 3. **Greedy**: entries sorted (stable) by descending
//!    `|covered ∩ requested| − |excess|`, each taken if it still covers a
//!    missing name. Best effort: names nobody covers stay uncovered.
//!
//! Entries are visited in ascending key order and ties keep the first
//! candidate, which makes the result deterministic.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::{covered_names, Catalog, Unlockable};

/// An unlockable picked for decryption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChosenUnlockable {
    pub key: String,
    #[serde(skip)]
    pub covered: BTreeSet<String>,
    pub unlockable: Unlockable,
}

/// Result of a selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    /// Chosen unlockables, prompts stripped (except the single-entry case).
    pub chosen: Vec<ChosenUnlockable>,
    /// Requested names no chosen unlockable covers.
    pub uncovered: BTreeSet<String>,
}

impl Selection {
    pub fn keys(&self) -> Vec<&str> {
        self.chosen.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }
}

struct Entry<'a> {
    key: &'a str,
    covered: BTreeSet<String>,
    unlockable: &'a Unlockable,
}

impl Entry<'_> {
    fn covers(&self, wanted: &BTreeSet<String>) -> bool {
        wanted.is_subset(&self.covered)
    }

    fn excess<'s>(&'s self, wanted: &BTreeSet<String>) -> BTreeSet<&'s str> {
        self.covered
            .iter()
            .filter(|n| !wanted.contains(*n))
            .map(String::as_str)
            .collect()
    }

    fn chosen(&self, keep_prompt: bool) -> ChosenUnlockable {
        ChosenUnlockable {
            key: self.key.to_string(),
            covered: self.covered.clone(),
            unlockable: if keep_prompt {
                self.unlockable.clone()
            } else {
                self.unlockable.without_prompt()
            },
        }
    }
}

/// Select unlockables covering `requested` from `catalog`.
///
/// An empty request yields an empty selection. A single-entry catalog
/// yields that entry verbatim, prompt included, whatever it covers.
pub fn select<S: AsRef<str>>(catalog: &Catalog, requested: &[S]) -> Selection {
    let wanted: BTreeSet<String> = requested
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if wanted.is_empty() {
        return Selection::default();
    }

    let entries: Vec<Entry<'_>> = catalog
        .unlockables
        .iter()
        .map(|(key, unlockable)| Entry {
            key,
            covered: covered_names(key),
            unlockable,
        })
        .collect();

    let chosen = if entries.len() == 1 {
        tracing::debug!(key = entries[0].key, "single-entry catalog");
        vec![entries[0].chosen(true)]
    } else if let Some(i) = best_singleton(&entries, &wanted) {
        tracing::debug!(key = entries[i].key, "singleton cover");
        vec![entries[i].chosen(false)]
    } else if let Some((i, j)) = best_pair(&entries, &wanted) {
        tracing::debug!(first = entries[i].key, second = entries[j].key, "pair cover");
        vec![entries[i].chosen(false), entries[j].chosen(false)]
    } else {
        greedy(&entries, &wanted)
            .into_iter()
            .map(|i| entries[i].chosen(false))
            .collect()
    };

    let uncovered = wanted
        .into_iter()
        .filter(|n| !chosen.iter().any(|c| c.covered.contains(n)))
        .collect();
    Selection { chosen, uncovered }
}

fn best_singleton(entries: &[Entry<'_>], wanted: &BTreeSet<String>) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (i, e) in entries.iter().enumerate() {
        if !e.covers(wanted) {
            continue;
        }
        let excess = e.excess(wanted).len();
        if best.map_or(true, |(_, b)| excess < b) {
            best = Some((i, excess));
        }
    }
    best.map(|(i, _)| i)
}

/// Score in half-units: `2|Ei| + 2|Ej| − |Ei ∩ Ej|`.
fn pair_score(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> usize {
    2 * a.len() + 2 * b.len() - a.intersection(b).count()
}

fn best_pair(entries: &[Entry<'_>], wanted: &BTreeSet<String>) -> Option<(usize, usize)> {
    let excess: Vec<BTreeSet<&str>> = entries.iter().map(|e| e.excess(wanted)).collect();
    let mut best: Option<(usize, usize, usize)> = None;
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let covers = wanted
                .iter()
                .all(|n| entries[i].covered.contains(n) || entries[j].covered.contains(n));
            if !covers {
                continue;
            }
            let score = pair_score(&excess[i], &excess[j]);
            if best.map_or(true, |(_, _, b)| score < b) {
                best = Some((i, j, score));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

fn greedy(entries: &[Entry<'_>], wanted: &BTreeSet<String>) -> Vec<usize> {
    let gain = |e: &Entry<'_>| -> i64 {
        let hits = e.covered.iter().filter(|n| wanted.contains(*n)).count() as i64;
        hits - e.excess(wanted).len() as i64
    };
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by_key(|&i| Reverse(gain(&entries[i])));

    let mut remaining = wanted.clone();
    let mut picked = Vec::new();
    for i in order {
        if remaining.is_empty() {
            break;
        }
        let e = &entries[i];
        if e.covered.iter().any(|n| remaining.contains(n)) {
            remaining.retain(|n| !e.covered.contains(n));
            picked.push(i);
        }
    }
    tracing::debug!(picked = picked.len(), missing = remaining.len(), "greedy cover");
    picked
}
