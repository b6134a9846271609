//! What the bot chose last time, per unit
//!
//! The only mutable state shared between ranking passes. Units ranked in
//! parallel record concurrently, so the map sits behind one lock; writes
//! happen once per unit per turn.

use std::sync::RwLock;

use ahash::{AHashMap, AHashSet};

use crate::ai::ranked::RankedCandidate;
use crate::core::types::UnitId;

#[derive(Debug, Default)]
pub struct DecisionMemory {
    choices: RwLock<AHashMap<UnitId, RankedCandidate>>,
}

impl DecisionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest choice, replacing any earlier one
    pub fn record(&self, unit_id: UnitId, candidate: RankedCandidate) {
        self.choices
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(unit_id, candidate);
    }

    pub fn lookup(&self, unit_id: UnitId) -> Option<RankedCandidate> {
        self.choices
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&unit_id)
            .cloned()
    }

    pub fn forget(&self, unit_id: UnitId) -> Option<RankedCandidate> {
        self.choices
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&unit_id)
    }

    /// Drop entries for units that are no longer in play
    pub fn retain_units(&self, live: &[UnitId]) -> usize {
        let live: AHashSet<UnitId> = live.iter().copied().collect();
        let mut choices = self.choices.write().unwrap_or_else(|e| e.into_inner());
        let before = choices.len();
        choices.retain(|id, _| live.contains(id));
        before - choices.len()
    }

    pub fn len(&self) -> usize {
        self.choices.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::outcome::OutcomeEstimate;
    use crate::battle::hex::Position;
    use crate::battle::path::CandidatePath;
    use std::sync::Arc;

    fn choice(unit: UnitId, score: f64) -> RankedCandidate {
        RankedCandidate {
            score,
            decision: "attack".to_string(),
            path: Arc::new(CandidatePath::new(unit, 1, Position::default())),
            trace: None,
            outcome: OutcomeEstimate::default(),
            snapshot_version: 1,
            sequence: 0,
        }
    }

    #[test]
    fn test_record_overwrites() {
        let memory = DecisionMemory::new();
        let unit = UnitId::from_u128(7);
        assert!(memory.lookup(unit).is_none());

        memory.record(unit, choice(unit, 1.0));
        memory.record(unit, choice(unit, 2.0));
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.lookup(unit).map(|c| c.score), Some(2.0));
    }

    #[test]
    fn test_forget_and_retain() {
        let memory = DecisionMemory::new();
        let ids: Vec<UnitId> = (1..=3).map(UnitId::from_u128).collect();
        for id in &ids {
            memory.record(*id, choice(*id, 1.0));
        }

        assert!(memory.forget(ids[0]).is_some());
        assert!(memory.forget(ids[0]).is_none());
        assert_eq!(memory.retain_units(&ids[2..]), 1);
        assert_eq!(memory.len(), 1);
        assert!(memory.lookup(ids[2]).is_some());
    }

    #[test]
    fn test_concurrent_records() {
        let memory = Arc::new(DecisionMemory::new());
        let handles: Vec<_> = (0..8u128)
            .map(|i| {
                let memory = Arc::clone(&memory);
                std::thread::spawn(move || {
                    let id = UnitId::from_u128(i);
                    memory.record(id, choice(id, i as f64));
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("recorder thread");
        }
        assert_eq!(memory.len(), 8);
    }
}
