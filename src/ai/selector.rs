//! Picks the winner of a ranking pass

use crate::ai::ranked::{RankedCandidate, RankedSet};

/// Highest-scoring candidate, or None when nothing was ranked
///
/// None means no path was legal or every decision gated out every path.
/// It is distinct from a candidate that scored zero.
pub fn select(ranked: RankedSet) -> Option<RankedCandidate> {
    ranked.into_best()
}
