use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-session frequency table of mistyped keys: which character was
/// produced when each target character was intended.
///
/// Keyed first by the intended character, then by the character actually
/// typed. Counts only grow during a session; a new session starts from an
/// empty (or `reset`) table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MistypeTable {
    counts: HashMap<char, HashMap<char, u32>>,
}

impl MistypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one miss: `typed` was pressed where `intended` was required.
    pub fn record(&mut self, typed: char, intended: char) {
        *self
            .counts
            .entry(intended)
            .or_default()
            .entry(typed)
            .or_insert(0) += 1;
    }

    /// All wrong keys observed for `intended`, most frequent first
    /// (ties broken by character for a stable order).
    pub fn confusions_for(&self, intended: char) -> Vec<(char, u32)> {
        match self.counts.get(&intended) {
            Some(inner) => inner
                .iter()
                .map(|(&typed, &n)| (typed, n))
                .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn total_misses(&self, intended: char) -> u32 {
        self.counts
            .get(&intended)
            .map(|inner| inner.values().sum())
            .unwrap_or(0)
    }

    /// Weak-spot summary: every intended character with at least one miss,
    /// ordered by total miss count descending, then by character.
    pub fn summary(&self) -> Vec<(char, u32)> {
        self.counts
            .iter()
            .map(|(&intended, inner)| (intended, inner.values().sum::<u32>()))
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Clears the table for a new session.
    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Iterates raw (intended, typed, count) entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (char, char, u32)> + '_ {
        self.counts.iter().flat_map(|(&intended, inner)| {
            inner.iter().map(move |(&typed, &n)| (intended, typed, n))
        })
    }
}
