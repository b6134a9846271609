//! Candidate path generation
//!
//! The engine only consumes [`PathGenerator`]. [`ReachablePathGenerator`] is a
//! plain A* enumeration of every hex the unit can reach this turn, used by the
//! headless runner and the benchmarks.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;

use crate::battle::board::Board;
use crate::battle::hex::{HexCoord, HexDirection, Position};
use crate::battle::path::{CandidatePath, MoveMode, StepKind};
use crate::battle::snapshot::WorldSnapshot;
use crate::battle::units::Unit;

pub trait PathGenerator: Send + Sync {
    /// Legal paths for `unit` this turn, already filtered for basic risk
    fn legal_paths(&self, unit: &Unit, snapshot: &WorldSnapshot) -> Vec<CandidatePath>;
}

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: HexCoord,
    f_cost: u32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord && self.f_cost == other.f_cost
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap, coordinate as tie-break
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest ground route from start to goal within `budget` movement points
///
/// Returns the hexes visited, start included.
pub fn find_route(
    board: &Board,
    start: HexCoord,
    goal: HexCoord,
    budget: u32,
) -> Option<Vec<HexCoord>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_scores: AHashMap<HexCoord, u32> = AHashMap::new();

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.distance(&goal),
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct_route(&came_from, current.coord));
        }

        let current_g = *g_scores.get(&current.coord).unwrap_or(&u32::MAX);

        for neighbor in current.coord.neighbors() {
            let Some(hex) = board.get_hex(neighbor) else {
                continue;
            };
            let Some(move_cost) = hex.terrain.movement_cost() else {
                continue;
            };

            let tentative_g = current_g.saturating_add(move_cost);
            if tentative_g > budget {
                continue;
            }
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.distance(&goal),
                });
            }
        }
    }

    None
}

fn reconstruct_route(came_from: &AHashMap<HexCoord, HexCoord>, mut current: HexCoord) -> Vec<HexCoord> {
    let mut route = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        route.push(prev);
        current = prev;
    }
    route.reverse();
    route
}

/// Enumerates one ground path per reachable hex, plus jumps and standing still
#[derive(Debug, Clone, Copy, Default)]
pub struct ReachablePathGenerator;

impl ReachablePathGenerator {
    /// Turn steps needed to face `to` from `from`, shortest way round
    fn push_turns(path: &mut CandidatePath, hex: HexCoord, from: HexDirection, to: HexDirection) {
        let mut facing = from;
        while facing != to {
            let left = facing.rotate(1);
            let (kind, next) = if left.turns_to(&to) < facing.turns_to(&to) {
                (StepKind::TurnLeft, left)
            } else {
                (StepKind::TurnRight, facing.rotate(-1))
            };
            facing = next;
            path.push_step(kind, Position::new(hex, facing), 1);
        }
    }

    fn ground_path(
        &self,
        unit: &Unit,
        snapshot: &WorldSnapshot,
        start: Position,
        goal: HexCoord,
    ) -> Option<CandidatePath> {
        let route = find_route(&snapshot.board, start.hex, goal, unit.run_mp)?;
        let mut path = CandidatePath::new(unit.id, snapshot.version, start);
        let mut facing = start.facing;

        for pair in route.windows(2) {
            let direction = pair[0].direction_to(&pair[1])?;
            Self::push_turns(&mut path, pair[0], facing, direction);
            facing = direction;
            let cost = snapshot.board.terrain(pair[1]).movement_cost()?;
            let elevation = snapshot.board.elevation(pair[1]);
            path.push_step(
                StepKind::Forward,
                Position::new(pair[1], facing).at_elevation(elevation),
                cost,
            );
        }

        if path.cost() > unit.run_mp {
            return None;
        }
        let mode = if path.cost() <= unit.walk_mp {
            MoveMode::Walk
        } else {
            MoveMode::Run
        };
        Some(path.with_mode(mode))
    }

    fn jump_path(&self, unit: &Unit, snapshot: &WorldSnapshot, start: Position, goal: HexCoord) -> Option<CandidatePath> {
        snapshot.board.terrain(goal).movement_cost()?;
        let facing = start.hex.direction_to(&goal).unwrap_or(start.facing);
        let mut path = CandidatePath::new(unit.id, snapshot.version, start).with_mode(MoveMode::Jump);
        let elevation = snapshot.board.elevation(goal);
        path.push_step(
            StepKind::Jump,
            Position::new(goal, facing).at_elevation(elevation),
            start.hex.distance(&goal),
        );
        Some(path)
    }
}

impl PathGenerator for ReachablePathGenerator {
    fn legal_paths(&self, unit: &Unit, snapshot: &WorldSnapshot) -> Vec<CandidatePath> {
        let Some(start) = unit.position else {
            return Vec::new();
        };
        if unit.off_board {
            return Vec::new();
        }

        let mut paths = vec![CandidatePath::new(unit.id, snapshot.version, start)];

        let mut targets = start.hex.hexes_in_range(unit.run_mp);
        targets.sort();
        paths.extend(
            targets
                .iter()
                .filter(|hex| **hex != start.hex && snapshot.board.in_bounds(**hex))
                .filter_map(|hex| self.ground_path(unit, snapshot, start, *hex)),
        );

        if unit.jump_mp > 0 {
            let mut jumps = start.hex.hexes_in_range(unit.jump_mp);
            jumps.sort();
            paths.extend(
                jumps
                    .iter()
                    .filter(|hex| **hex != start.hex && snapshot.board.in_bounds(**hex))
                    .filter_map(|hex| self.jump_path(unit, snapshot, start, *hex)),
            );
        }

        paths
    }
}
