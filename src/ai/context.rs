//! Everything one (unit, path) evaluation can see
//!
//! A context is built fresh for each candidate path and never shared between
//! units. The only mutable part is its [`ScratchCache`], which memoizes
//! geometric sub-results that several considerations ask for.

use std::sync::{Arc, Mutex};

use ahash::AHashMap;

use crate::ai::behavior::BehaviorSettings;
use crate::ai::outcome::OutcomeEstimate;
use crate::battle::hex::{HexCoord, Position};
use crate::battle::path::CandidatePath;
use crate::battle::snapshot::WorldSnapshot;
use crate::battle::units::Unit;

const NEAREST_ENEMY: &str = "nearest_enemy";
const FRIEND_CENTROID: &str = "friend_centroid";
const HOME_EDGE: &str = "home_edge";
const NEAREST_OBJECTIVE: &str = "nearest_objective";

/// Write-once memo owned by a single context
///
/// The first value stored under a key wins; later computations for the same
/// key are discarded.
#[derive(Debug, Default)]
pub struct ScratchCache {
    values: Mutex<AHashMap<&'static str, f64>>,
}

impl ScratchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &'static str) -> Option<f64> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .copied()
    }

    /// Cached value for `key`, computing it on first use
    ///
    /// The lock is not held while `compute` runs, so it may itself use the
    /// cache.
    pub fn get_or_compute<F>(&self, key: &'static str, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute();
        *self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key)
            .or_insert(value)
    }

    pub fn len(&self) -> usize {
        self.values.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The bundle of state considerations score against
pub struct DecisionContext<'a> {
    pub unit: &'a Unit,
    pub path: Arc<CandidatePath>,
    pub outcome: OutcomeEstimate,
    pub behavior: &'a BehaviorSettings,
    pub known_enemies: Vec<&'a Unit>,
    pub known_friends: Vec<&'a Unit>,
    pub snapshot: &'a WorldSnapshot,
    scratch: ScratchCache,
}

impl<'a> DecisionContext<'a> {
    pub fn new(
        unit: &'a Unit,
        path: Arc<CandidatePath>,
        outcome: OutcomeEstimate,
        behavior: &'a BehaviorSettings,
        known_enemies: Vec<&'a Unit>,
        known_friends: Vec<&'a Unit>,
        snapshot: &'a WorldSnapshot,
    ) -> Self {
        Self {
            unit,
            path,
            outcome,
            behavior,
            known_enemies,
            known_friends,
            snapshot,
            scratch: ScratchCache::new(),
        }
    }

    pub fn scratch(&self) -> &ScratchCache {
        &self.scratch
    }

    /// Where the unit ends up
    pub fn destination(&self) -> Position {
        self.path.final_position()
    }

    pub fn wants_withdrawal(&self) -> bool {
        self.behavior.wants_withdrawal(self.unit)
    }

    /// Distance from the destination to the closest enemy that can fight
    pub fn nearest_enemy_distance(&self) -> Option<u32> {
        let distance = self.scratch.get_or_compute(NEAREST_ENEMY, || {
            let here = self.destination().hex;
            self.known_enemies
                .iter()
                .filter(|e| e.is_combatant() && !e.off_board)
                .filter_map(|e| e.position)
                .map(|p| p.hex.distance(&here) as f64)
                .fold(f64::INFINITY, f64::min)
        });
        finite_distance(distance)
    }

    /// Distance from the destination to the middle of the friendly group
    pub fn friend_centroid_distance(&self) -> Option<f64> {
        let distance = self.scratch.get_or_compute(FRIEND_CENTROID, || {
            let positions: Vec<HexCoord> = self
                .known_friends
                .iter()
                .filter(|f| !f.off_board)
                .filter_map(|f| f.position.map(|p| p.hex))
                .collect();
            if positions.is_empty() {
                return f64::INFINITY;
            }
            let count = positions.len() as f64;
            let q = positions.iter().map(|h| h.q as f64).sum::<f64>() / count;
            let r = positions.iter().map(|h| h.r as f64).sum::<f64>() / count;
            let here = self.destination().hex;
            let (dq, dr) = (here.q as f64 - q, here.r as f64 - r);
            (dq.abs() + dr.abs() + (dq + dr).abs()) / 2.0
        });
        distance.is_finite().then_some(distance)
    }

    /// Hexes between the destination and the home edge
    pub fn home_edge_distance(&self) -> u32 {
        let distance = self.scratch.get_or_compute(HOME_EDGE, || {
            self.snapshot
                .board
                .distance_to_edge(self.destination().hex, self.behavior.home_edge) as f64
        });
        distance as u32
    }

    /// Distance from the destination to the closest strategic target
    pub fn nearest_objective_distance(&self) -> Option<u32> {
        let distance = self.scratch.get_or_compute(NEAREST_OBJECTIVE, || {
            let here = self.destination().hex;
            self.behavior
                .strategic_targets
                .iter()
                .map(|hex| hex.distance(&here) as f64)
                .fold(f64::INFINITY, f64::min)
        });
        finite_distance(distance)
    }
}

fn finite_distance(value: f64) -> Option<u32> {
    value.is_finite().then_some(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::board::{Board, BoardEdge};
    use crate::battle::hex::HexDirection;
    use crate::battle::units::UnitKind;
    use crate::core::types::{SideId, UnitId};
    use std::cell::Cell;

    fn unit(id: u128, side: u8, q: i32, r: i32) -> Unit {
        Unit::new(UnitId::from_u128(id), "unit", SideId(side), UnitKind::Mech)
            .at(Position::new(HexCoord::new(q, r), HexDirection::East))
    }

    #[test]
    fn test_scratch_is_write_once() {
        let cache = ScratchCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            3.0
        };
        assert_eq!(cache.get_or_compute("k", compute), 3.0);
        assert_eq!(cache.get_or_compute("k", || 9.0), 3.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_scratch_allows_nested_lookups() {
        let cache = ScratchCache::new();
        let outer = cache.get_or_compute("outer", || cache.get_or_compute("inner", || 2.0) * 2.0);
        assert_eq!(outer, 4.0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_context_helpers() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 20));
        let me = unit(1, 0, 5, 5);
        let friend_a = unit(2, 0, 5, 9);
        let friend_b = unit(3, 0, 5, 7);
        let foe_near = unit(4, 1, 8, 5);
        let foe_far = unit(5, 1, 15, 5);
        let mut behavior = BehaviorSettings::default();
        behavior.home_edge = BoardEdge::North;
        behavior.strategic_targets.push(HexCoord::new(5, 1));

        let path = Arc::new(CandidatePath::new(me.id, 1, me.position.unwrap_or_default()));
        let ctx = DecisionContext::new(
            &me,
            path,
            OutcomeEstimate::default(),
            &behavior,
            vec![&foe_far, &foe_near],
            vec![&friend_a, &friend_b],
            &snapshot,
        );

        assert_eq!(ctx.nearest_enemy_distance(), Some(3));
        assert_eq!(ctx.friend_centroid_distance(), Some(3.0));
        assert_eq!(ctx.home_edge_distance(), 5);
        assert_eq!(ctx.nearest_objective_distance(), Some(4));
        assert_eq!(ctx.scratch().len(), 4);
    }

    #[test]
    fn test_helpers_without_anyone_around() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(10, 10));
        let me = unit(1, 0, 2, 2);
        let behavior = BehaviorSettings::default();
        let path = Arc::new(CandidatePath::new(me.id, 1, me.position.unwrap_or_default()));
        let ctx = DecisionContext::new(
            &me,
            path,
            OutcomeEstimate::default(),
            &behavior,
            Vec::new(),
            Vec::new(),
            &snapshot,
        );
        assert_eq!(ctx.nearest_enemy_distance(), None);
        assert_eq!(ctx.friend_centroid_distance(), None);
        assert_eq!(ctx.nearest_objective_distance(), None);
    }
}
