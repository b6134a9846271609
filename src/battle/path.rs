//! Candidate movement paths
//!
//! Paths are produced by a [`crate::battle::pathing::PathGenerator`] and are
//! immutable once handed to the engine.

use serde::{Deserialize, Serialize};

use crate::battle::hex::{HexCoord, Position};
use crate::core::types::{SnapshotVersion, UnitId};

/// How the unit moves along the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoveMode {
    /// Stays in place
    #[default]
    Stand,
    Walk,
    Run,
    Jump,
}

impl MoveMode {
    /// To-hit penalty the mover suffers when firing after this move
    pub fn attacker_modifier(&self) -> i32 {
        match self {
            MoveMode::Stand => 0,
            MoveMode::Walk => 1,
            MoveMode::Run => 2,
            MoveMode::Jump => 3,
        }
    }
}

/// Kind of a single movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Jump,
}

/// One step, with the position it leaves the unit in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStep {
    pub kind: StepKind,
    pub position: Position,
}

/// An ordered sequence of steps for one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePath {
    pub unit_id: UnitId,
    /// Snapshot the path was generated against
    pub snapshot_version: SnapshotVersion,
    pub start: Position,
    pub mode: MoveMode,
    steps: Vec<MoveStep>,
    cost: u32,
}

impl CandidatePath {
    /// Empty path: the unit stays where it is
    pub fn new(unit_id: UnitId, snapshot_version: SnapshotVersion, start: Position) -> Self {
        Self {
            unit_id,
            snapshot_version,
            start,
            mode: MoveMode::Stand,
            steps: Vec::new(),
            cost: 0,
        }
    }

    pub fn with_mode(mut self, mode: MoveMode) -> Self {
        self.mode = mode;
        self
    }

    /// Append a step; cost only ever grows
    pub fn push_step(&mut self, kind: StepKind, position: Position, step_cost: u32) {
        self.steps.push(MoveStep { kind, position });
        self.cost = self.cost.saturating_add(step_cost);
    }

    pub fn steps(&self) -> &[MoveStep] {
        &self.steps
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn final_position(&self) -> Position {
        self.steps.last().map(|s| s.position).unwrap_or(self.start)
    }

    /// Hexes entered along the way, in order, without the start hex
    pub fn hexes_entered(&self) -> Vec<HexCoord> {
        let mut hexes: Vec<HexCoord> = Vec::new();
        let mut current = self.start.hex;
        for step in &self.steps {
            if step.position.hex != current {
                current = step.position.hex;
                hexes.push(current);
            }
        }
        hexes
    }

    /// Hexes between start and end position
    pub fn distance_moved(&self) -> u32 {
        self.start.hex.distance(&self.final_position().hex)
    }

    pub fn is_jump(&self) -> bool {
        matches!(self.mode, MoveMode::Jump)
    }

    /// Short human-readable description for traces and logs
    pub fn describe(&self) -> String {
        let end = self.final_position();
        format!(
            "{:?} ({},{}) -> ({},{}) facing {:?}, {} steps, cost {}",
            self.mode,
            self.start.hex.q,
            self.start.hex.r,
            end.hex.q,
            end.hex.r,
            end.facing,
            self.steps.len(),
            self.cost
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::hex::HexDirection;

    fn start() -> Position {
        Position::new(HexCoord::new(2, 2), HexDirection::East)
    }

    #[test]
    fn test_empty_path_ends_at_start() {
        let path = CandidatePath::new(UnitId::new(), 1, start());
        assert_eq!(path.final_position(), start());
        assert_eq!(path.cost(), 0);
        assert!(path.hexes_entered().is_empty());
    }

    #[test]
    fn test_cost_accumulates() {
        let mut path = CandidatePath::new(UnitId::new(), 1, start()).with_mode(MoveMode::Walk);
        path.push_step(
            StepKind::Forward,
            Position::new(HexCoord::new(3, 2), HexDirection::East),
            1,
        );
        path.push_step(
            StepKind::TurnLeft,
            Position::new(HexCoord::new(3, 2), HexDirection::NorthEast),
            1,
        );
        path.push_step(
            StepKind::Forward,
            Position::new(HexCoord::new(4, 1), HexDirection::NorthEast),
            2,
        );
        assert_eq!(path.cost(), 4);
        assert_eq!(path.hexes_entered(), vec![HexCoord::new(3, 2), HexCoord::new(4, 1)]);
        assert_eq!(path.final_position().facing, HexDirection::NorthEast);
        assert_eq!(path.distance_moved(), 2);
    }
}
