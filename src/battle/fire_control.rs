//! To-hit and line-of-sight service
//!
//! The outcome estimator treats this as a black box. [`StandardFireControl`]
//! is a compact 2d6 model good enough for tests and the headless runner;
//! a full rules engine plugs in by implementing [`FireControl`].

use crate::battle::dice::two_d6_at_least;
use crate::battle::hex::Position;
use crate::battle::path::MoveMode;
use crate::battle::snapshot::WorldSnapshot;
use crate::battle::units::{RangeBracket, Unit, Weapon};

/// Penalty for shooting at something in the air
const AIRBORNE_TARGET_MODIFIER: i32 = 2;

/// A hypothetical exchange: `shooter` at `shooter_at` firing on `target`
#[derive(Debug, Clone, Copy)]
pub struct Engagement<'a> {
    pub shooter: &'a Unit,
    pub shooter_at: Position,
    pub shooter_mode: MoveMode,
    pub target: &'a Unit,
    pub target_at: Position,
    /// Hexes the target moved this turn
    pub target_moved: u32,
    pub target_jumped: bool,
}

impl<'a> Engagement<'a> {
    pub fn distance(&self) -> u32 {
        self.shooter_at.distance(&self.target_at)
    }
}

/// Target movement modifier for a target that moved `hexes`
pub fn target_movement_modifier(hexes: u32, jumped: bool) -> i32 {
    let base = match hexes {
        0..=2 => 0,
        3..=4 => 1,
        5..=6 => 2,
        7..=9 => 3,
        10..=17 => 4,
        _ => 5,
    };
    base + i32::from(jumped)
}

pub trait FireControl: Send + Sync {
    /// Can the shooter see the target at all
    fn line_of_sight(&self, snapshot: &WorldSnapshot, from: &Position, to: &Position) -> bool {
        snapshot.board.has_line_of_sight(from.hex, to.hex)
    }

    /// Chance (0.0-1.0) that one weapon hits in this engagement
    fn hit_probability(
        &self,
        snapshot: &WorldSnapshot,
        engagement: &Engagement,
        weapon: &Weapon,
    ) -> f64;

    /// Expected weapon damage for one turn of fire
    fn expected_fire_damage(&self, snapshot: &WorldSnapshot, engagement: &Engagement) -> f64 {
        if !self.line_of_sight(snapshot, &engagement.shooter_at, &engagement.target_at) {
            return 0.0;
        }
        engagement
            .shooter
            .weapons
            .iter()
            .map(|w| self.hit_probability(snapshot, engagement, w) * w.damage)
            .sum()
    }

    /// Expected damage from the best physical attack available
    fn expected_physical_damage(&self, _snapshot: &WorldSnapshot, engagement: &Engagement) -> f64 {
        let shooter = engagement.shooter;
        if !shooter.can_make_physical_attacks()
            || engagement.target.airborne
            || engagement.distance() != 1
        {
            return 0.0;
        }

        let tmm = target_movement_modifier(engagement.target_moved, engagement.target_jumped);
        let movement = engagement.shooter_mode.attacker_modifier();
        let base = shooter.piloting as i32 + movement + tmm;

        let kick = two_d6_at_least(base - 2) * shooter.kick_damage();
        let punches = 2.0 * two_d6_at_least(base) * shooter.punch_damage();
        kick.max(punches)
    }
}

/// Reference to-hit model: gunnery + range + movement + cover on 2d6
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFireControl;

impl StandardFireControl {
    fn bracket(snapshot: &WorldSnapshot, weapon: &Weapon, distance: u32) -> Option<RangeBracket> {
        let options = &snapshot.options;
        weapon
            .bracket(distance, options.extreme_range)
            .or_else(|| (options.line_of_sight_range && distance > 0).then_some(RangeBracket::Extreme))
    }

    /// Target number for one weapon, None if the shot is impossible
    pub fn to_hit_number(
        &self,
        snapshot: &WorldSnapshot,
        engagement: &Engagement,
        weapon: &Weapon,
    ) -> Option<i32> {
        let distance = engagement.distance();
        let bracket = Self::bracket(snapshot, weapon, distance)?;

        let mut target = engagement.shooter.gunnery as i32;
        target += bracket.to_hit_modifier();
        target += weapon.min_range_modifier(distance);
        target += engagement.shooter_mode.attacker_modifier();
        target += target_movement_modifier(engagement.target_moved, engagement.target_jumped);
        target += snapshot.board.terrain(engagement.target_at.hex).to_hit_modifier();
        if engagement.target.airborne {
            target += AIRBORNE_TARGET_MODIFIER;
        }
        Some(target)
    }
}

impl FireControl for StandardFireControl {
    fn hit_probability(
        &self,
        snapshot: &WorldSnapshot,
        engagement: &Engagement,
        weapon: &Weapon,
    ) -> f64 {
        self.to_hit_number(snapshot, engagement, weapon)
            .map(two_d6_at_least)
            .unwrap_or(0.0)
    }
}
