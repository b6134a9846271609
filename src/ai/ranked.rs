//! Scored candidates and the ordered set they live in

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::ai::outcome::OutcomeEstimate;
use crate::ai::trace::Trace;
use crate::battle::path::CandidatePath;
use crate::core::types::SnapshotVersion;

/// One (decision, path) pair that made it past the applicability gate
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub score: f64,
    /// Name of the decision that produced the score
    pub decision: String,
    pub path: Arc<CandidatePath>,
    pub trace: Option<Trace>,
    pub outcome: OutcomeEstimate,
    pub snapshot_version: SnapshotVersion,
    /// Position in evaluation order; breaks score ties
    pub sequence: usize,
}

impl RankedCandidate {
    pub fn key(&self) -> RankKey {
        RankKey::new(self.score, self.sequence)
    }
}

/// Sort key: higher score first, then earlier sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankKey {
    score: Reverse<OrderedFloat<f64>>,
    sequence: usize,
}

impl RankKey {
    pub fn new(score: f64, sequence: usize) -> Self {
        Self {
            score: Reverse(OrderedFloat(score)),
            sequence,
        }
    }
}

/// Candidates ordered best first
///
/// Keys include the evaluation sequence, so the order is total and does not
/// depend on insertion order. Partial sets built on different threads merge
/// into the same result as a sequential pass.
#[derive(Debug, Clone, Default)]
pub struct RankedSet {
    entries: BTreeMap<RankKey, RankedCandidate>,
}

impl RankedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, candidate: RankedCandidate) {
        self.entries.insert(candidate.key(), candidate);
    }

    /// Absorb another partial set
    pub fn merge(&mut self, other: RankedSet) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-ranked candidate
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.entries.values().next()
    }

    /// Consume the set, keeping only the highest-ranked candidate
    pub fn into_best(self) -> Option<RankedCandidate> {
        self.entries.into_values().next()
    }

    /// Best first
    pub fn iter(&self) -> impl Iterator<Item = &RankedCandidate> {
        self.entries.values()
    }

    pub fn top(&self, n: usize) -> Vec<&RankedCandidate> {
        self.iter().take(n).collect()
    }
}

impl IntoIterator for RankedSet {
    type Item = RankedCandidate;
    type IntoIter = std::collections::btree_map::IntoValues<RankKey, RankedCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl FromIterator<RankedCandidate> for RankedSet {
    fn from_iter<I: IntoIterator<Item = RankedCandidate>>(iter: I) -> Self {
        let mut set = RankedSet::new();
        for candidate in iter {
            set.insert(candidate);
        }
        set
    }
}
