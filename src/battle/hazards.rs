//! Self-inflicted risk along a path: failed piloting rolls, hazardous
//! terrain, and known minefields
//!
//! Each term is an expected amount of damage, so the outcome estimator can
//! add them straight into the damage-taken total.

use crate::battle::dice::two_d6_at_least;
use crate::battle::path::{CandidatePath, MoveMode};
use crate::battle::snapshot::WorldSnapshot;
use crate::battle::units::{Unit, UnitKind};

/// Extra piloting difficulty for landing a jump in rough ground
const JUMP_LANDING_MODIFIER: i32 = 1;

pub trait HazardModel: Send + Sync {
    /// Expected damage from falls caused by failed piloting rolls
    fn piloting_risk(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64;

    /// Expected damage from entering hazardous terrain
    fn terrain_hazard(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64;

    /// Expected damage from known minefields on the path
    fn minefield_risk(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64;

    /// Sum of all self-inflicted risk terms
    fn self_risk(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64 {
        self.piloting_risk(snapshot, unit, path)
            + self.terrain_hazard(snapshot, unit, path)
            + self.minefield_risk(snapshot, unit, path)
    }
}

/// Reference hazard model
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardHazardModel;

impl StandardHazardModel {
    /// Target numbers of every piloting roll the path forces
    pub fn piloting_rolls(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> Vec<i32> {
        if unit.airborne || !matches!(unit.kind, UnitKind::Mech) {
            return Vec::new();
        }

        let running = matches!(path.mode, MoveMode::Run);
        let base = unit.piloting as i32;

        if path.is_jump() {
            let landing = snapshot.board.terrain(path.final_position().hex);
            return landing
                .piloting_modifier(false)
                .map(|m| vec![base + m + JUMP_LANDING_MODIFIER])
                .unwrap_or_default();
        }

        path.hexes_entered()
            .into_iter()
            .filter_map(|hex| snapshot.board.terrain(hex).piloting_modifier(running))
            .map(|m| base + m)
            .collect()
    }
}

impl HazardModel for StandardHazardModel {
    fn piloting_risk(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64 {
        let rolls = self.piloting_rolls(snapshot, unit, path);
        if rolls.is_empty() {
            return 0.0;
        }
        // One failure ends the move on the ground, so chain the successes
        let all_pass: f64 = rolls.into_iter().map(two_d6_at_least).product();
        let elevation = path.final_position().elevation.max(0) as u32;
        (1.0 - all_pass) * unit.fall_damage(elevation)
    }

    fn terrain_hazard(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64 {
        if unit.airborne {
            return 0.0;
        }
        let hexes = if path.is_jump() {
            vec![path.final_position().hex]
        } else {
            path.hexes_entered()
        };
        hexes
            .into_iter()
            .filter_map(|hex| snapshot.board.terrain(hex).hazard())
            .map(|(chance, damage)| chance * damage)
            .sum()
    }

    fn minefield_risk(&self, snapshot: &WorldSnapshot, unit: &Unit, path: &CandidatePath) -> f64 {
        if unit.airborne {
            return 0.0;
        }
        let hexes = if path.is_jump() {
            vec![path.final_position().hex]
        } else {
            path.hexes_entered()
        };
        hexes
            .into_iter()
            .filter_map(|hex| snapshot.board.minefield_at(hex))
            .map(|m| m.density.clamp(0.0, 1.0) * m.damage)
            .sum()
    }
}
