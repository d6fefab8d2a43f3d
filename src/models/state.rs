//! Persisted watcher state.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::Identity;

/// Last seen `Last-Modified` value of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCheckpoint {
    pub latest: Option<String>,
}

impl FeedCheckpoint {
    /// Whether `last_modified` differs from the stored marker.
    pub fn is_stale(&self, last_modified: &str) -> bool {
        self.latest.as_deref() != Some(last_modified)
    }
}

/// Every identity ever emitted or skipped, in the order it was first seen.
///
/// Grows without bound; entries are never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessedIdentities {
    entries: Vec<Identity>,
    #[serde(skip)]
    lookup: HashSet<Identity>,
}

impl ProcessedIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        if self.lookup.len() == self.entries.len() {
            self.lookup.contains(identity)
        } else {
            self.entries.contains(identity)
        }
    }

    /// Append an identity. Already known identities are not duplicated.
    pub fn push(&mut self, identity: Identity) {
        self.reindex();
        if self.lookup.insert(identity.clone()) {
            self.entries.push(identity);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.entries.iter()
    }

    /// Rebuild the lookup set after deserialization.
    fn reindex(&mut self) {
        if self.lookup.len() != self.entries.len() {
            self.lookup = self.entries.iter().cloned().collect();
        }
    }
}

impl PartialEq for ProcessedIdentities {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ProcessedIdentities {}

impl FromIterator<Identity> for ProcessedIdentities {
    fn from_iter<I: IntoIterator<Item = Identity>>(iter: I) -> Self {
        let mut identities = Self::new();
        for identity in iter {
            identities.push(identity);
        }
        identities
    }
}

/// How many times each sequenced body text has been finalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportLedger {
    counts: BTreeMap<String, u32>,
}

impl ReportLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more report for `body` and return the new count (1 on first sight).
    pub fn record(&mut self, body: &str) -> u32 {
        let count = self.counts.entry(body.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, body: &str) -> u32 {
        self.counts.get(body).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
