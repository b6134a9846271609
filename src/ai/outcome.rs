//! Risk/reward estimate for a candidate path
//!
//! Predicts, before the move is made, the best damage the unit could deal
//! from the end of the path and how much damage it should expect to take on
//! the way and once it gets there.
//!
//! Damage dealt is scored on the single best opportunity (the max over
//! enemies). Damage taken is additive over every risk source.

use std::sync::{Arc, Mutex};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ai::behavior::BehaviorSettings;
use crate::battle::fire_control::{Engagement, FireControl};
use crate::battle::hazards::HazardModel;
use crate::battle::hex::{HexCoord, Position};
use crate::battle::path::{CandidatePath, MoveMode};
use crate::battle::snapshot::WorldSnapshot;
use crate::battle::units::{Unit, UnitKind};
use crate::core::types::{SideId, SnapshotVersion, UnitId};

/// Damage against designated priority units counts this much more
pub const PRIORITY_TARGET_MULTIPLIER: f64 = 1.5;

/// Predicted result of executing a path
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEstimate {
    /// Best expected weapon damage against any single enemy
    pub best_firing_damage: f64,
    /// Best expected physical-attack damage against any single enemy
    pub best_physical_damage: f64,
    /// Sum of every expected source of damage to the unit
    pub expected_damage_taken: f64,
}

impl OutcomeEstimate {
    /// Larger of the two damage-dealt figures
    pub fn best_damage(&self) -> f64 {
        self.best_firing_damage.max(self.best_physical_damage)
    }
}

/// Why an enemy was left out of an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    NotCombatant,
    OffBoard,
    PositionUnknown,
    Disregarded,
    InvalidData,
}

/// One enemy's contribution to an estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyAssessment {
    pub enemy: UnitId,
    /// Evaluated at its fixed position rather than its movement envelope
    pub treated_as_moved: bool,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub physical_damage_dealt: f64,
}

/// Where the expected damage taken comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    pub piloting: f64,
    pub terrain: f64,
    pub minefield: f64,
    pub enemy_fire: f64,
    pub artillery: f64,
}

impl RiskBreakdown {
    pub fn self_risk(&self) -> f64 {
        self.piloting + self.terrain + self.minefield
    }

    pub fn total(&self) -> f64 {
        self.self_risk() + self.enemy_fire + self.artillery
    }
}

/// Estimate plus everything that went into it
#[derive(Debug, Clone, Default)]
pub struct OutcomeReport {
    pub estimate: OutcomeEstimate,
    pub risk: RiskBreakdown,
    pub enemies: Vec<EnemyAssessment>,
    pub skipped: Vec<(UnitId, SkipReason)>,
    /// A strategic objective raised the firing or physical damage
    pub strategic_bonus: bool,
}

#[derive(Debug, Default)]
struct MemoState {
    version: Option<SnapshotVersion>,
    artillery: AHashMap<HexCoord, f64>,
}

/// Per-hex risk shared by every unit ranked against one snapshot
///
/// Entries are tied to a snapshot version; the first lookup with a newer
/// version throws the old entries away.
#[derive(Debug, Default)]
pub struct RiskMemo {
    state: Mutex<MemoState>,
}

impl RiskMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incoming artillery damage at `hex`, computed once per snapshot
    pub fn artillery_risk(&self, snapshot: &WorldSnapshot, hex: HexCoord) -> f64 {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.version != Some(snapshot.version) {
            state.version = Some(snapshot.version);
            state.artillery.clear();
        }
        *state.artillery.entry(hex).or_insert_with(|| {
            snapshot
                .artillery
                .iter()
                .map(|strike| strike.damage_at(hex))
                .sum()
        })
    }

    /// Number of hexes memoized for the current snapshot
    pub fn len(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).artillery.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where the acting unit ends up and how it got there
#[derive(Debug, Clone, Copy)]
struct Mover<'a> {
    unit: &'a Unit,
    at: Position,
    mode: MoveMode,
    moved: u32,
    jumped: bool,
}

/// Predicts damage dealt and taken for candidate paths
pub struct OutcomeEstimator {
    fire_control: Arc<dyn FireControl>,
    hazards: Arc<dyn HazardModel>,
    memo: RiskMemo,
    unmoved_envelope: bool,
}

impl OutcomeEstimator {
    pub fn new(fire_control: Arc<dyn FireControl>, hazards: Arc<dyn HazardModel>) -> Self {
        Self {
            fire_control,
            hazards,
            memo: RiskMemo::new(),
            unmoved_envelope: true,
        }
    }

    /// Toggle the worst-case envelope for enemies that have not moved yet
    pub fn with_unmoved_envelope(mut self, enabled: bool) -> Self {
        self.unmoved_envelope = enabled;
        self
    }

    pub fn memo(&self) -> &RiskMemo {
        &self.memo
    }

    pub fn estimate(
        &self,
        path: &CandidatePath,
        unit: &Unit,
        known_enemies: &[&Unit],
        snapshot: &WorldSnapshot,
        behavior: &BehaviorSettings,
    ) -> OutcomeEstimate {
        self.assess(path, unit, known_enemies, snapshot, behavior).estimate
    }

    /// Full estimate with its breakdown
    pub fn assess(
        &self,
        path: &CandidatePath,
        unit: &Unit,
        known_enemies: &[&Unit],
        snapshot: &WorldSnapshot,
        behavior: &BehaviorSettings,
    ) -> OutcomeReport {
        let mut report = OutcomeReport {
            risk: RiskBreakdown {
                piloting: finite_or_zero(self.hazards.piloting_risk(snapshot, unit, path)),
                terrain: finite_or_zero(self.hazards.terrain_hazard(snapshot, unit, path)),
                minefield: finite_or_zero(self.hazards.minefield_risk(snapshot, unit, path)),
                ..RiskBreakdown::default()
            },
            ..OutcomeReport::default()
        };

        let me = Mover {
            unit,
            at: path.final_position(),
            mode: path.mode,
            moved: path.distance_moved(),
            jumped: path.is_jump(),
        };

        for enemy in known_enemies {
            let Some(enemy_at) = self.eligible_position(enemy, behavior, &mut report) else {
                continue;
            };

            let treated_as_moved = enemy.has_moved || enemy.is_immobile() || !self.unmoved_envelope;
            let mut assessment = if treated_as_moved {
                self.evaluate_moved_enemy(snapshot, &me, enemy, enemy_at)
            } else {
                self.evaluate_unmoved_enemy(snapshot, &me, enemy, enemy_at)
            };

            let values = [
                assessment.damage_dealt,
                assessment.damage_taken,
                assessment.physical_damage_dealt,
            ];
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                tracing::trace!(enemy = %enemy.id, "skipping enemy with invalid damage figures");
                report.skipped.push((enemy.id, SkipReason::InvalidData));
                continue;
            }

            if behavior.is_priority_target(enemy) {
                assessment.damage_dealt *= PRIORITY_TARGET_MULTIPLIER;
                assessment.physical_damage_dealt *= PRIORITY_TARGET_MULTIPLIER;
            }

            let estimate = &mut report.estimate;
            estimate.best_firing_damage = estimate.best_firing_damage.max(assessment.damage_dealt);
            estimate.best_physical_damage = estimate
                .best_physical_damage
                .max(assessment.physical_damage_dealt);
            report.risk.enemy_fire += assessment.damage_taken;
            report.enemies.push(assessment);
        }

        if !unit.airborne {
            report.risk.artillery = finite_or_zero(self.memo.artillery_risk(snapshot, me.at.hex));
        }

        let (objective_fire, objective_physical) = self.strategic_damage(snapshot, &me, behavior);
        if objective_fire > report.estimate.best_firing_damage {
            report.estimate.best_firing_damage = objective_fire;
            report.strategic_bonus = true;
        }
        if objective_physical > report.estimate.best_physical_damage {
            report.estimate.best_physical_damage = objective_physical;
            report.strategic_bonus = true;
        }

        if !unit.can_make_physical_attacks() {
            report.estimate.best_physical_damage = 0.0;
        }

        report.estimate.expected_damage_taken = report.risk.total();
        report
    }

    /// Position of an enemy worth evaluating, recording why others are skipped
    fn eligible_position(
        &self,
        enemy: &Unit,
        behavior: &BehaviorSettings,
        report: &mut OutcomeReport,
    ) -> Option<Position> {
        let reason = if !enemy.is_combatant() {
            Some(SkipReason::NotCombatant)
        } else if enemy.off_board {
            Some(SkipReason::OffBoard)
        } else if enemy.position.is_none() {
            Some(SkipReason::PositionUnknown)
        } else if behavior.honor.disregards(enemy) {
            Some(SkipReason::Disregarded)
        } else {
            None
        };

        if let Some(reason) = reason {
            tracing::trace!(enemy = %enemy.id, ?reason, "enemy left out of estimate");
            report.skipped.push((enemy.id, reason));
            return None;
        }
        enemy.position
    }

    /// Enemy stays where it is: both sides shoot from known positions
    fn evaluate_moved_enemy(
        &self,
        snapshot: &WorldSnapshot,
        me: &Mover,
        enemy: &Unit,
        enemy_at: Position,
    ) -> EnemyAssessment {
        let outgoing = Engagement {
            shooter: me.unit,
            shooter_at: me.at,
            shooter_mode: me.mode,
            target: enemy,
            target_at: enemy_at,
            target_moved: enemy.hexes_moved,
            target_jumped: enemy.jumped,
        };
        let incoming = Engagement {
            shooter: enemy,
            shooter_at: enemy_at,
            shooter_mode: enemy_mode(enemy, enemy.hexes_moved),
            target: me.unit,
            target_at: me.at,
            target_moved: me.moved,
            target_jumped: me.jumped,
        };

        EnemyAssessment {
            enemy: enemy.id,
            treated_as_moved: true,
            damage_dealt: self.fire_control.expected_fire_damage(snapshot, &outgoing),
            damage_taken: self.fire_control.expected_fire_damage(snapshot, &incoming)
                + self.fire_control.expected_physical_damage(snapshot, &incoming),
            physical_damage_dealt: self.fire_control.expected_physical_damage(snapshot, &outgoing),
        }
    }

    /// Enemy still to move: it may hold its ground or close in before
    /// shooting, and it will be harder to hit once it has moved
    ///
    /// Damage taken is the worst case over the envelope: the enemy's current
    /// hex plus every hex along the closing line it can reach this turn,
    /// stopping adjacent, each fired from with the mode that distance implies.
    fn evaluate_unmoved_enemy(
        &self,
        snapshot: &WorldSnapshot,
        me: &Mover,
        enemy: &Unit,
        enemy_at: Position,
    ) -> EnemyAssessment {
        let distance = enemy_at.distance(&me.at);
        let reach = enemy.max_move();
        let options = &snapshot.options;

        let closest = distance.saturating_sub(reach).max(1);
        let in_reach = options.line_of_sight_range
            || closest <= enemy.max_weapon_range(options.beyond_long_range());

        let damage_taken = if in_reach {
            let furthest = distance.saturating_sub(1).min(reach) as usize;
            let line = enemy_at.hex.line_to(&me.at.hex);
            let facing = enemy_at.hex.direction_to(&me.at.hex).unwrap_or(enemy_at.facing);

            (0..=furthest)
                .map(|closing| {
                    let shooter_at = match line.get(closing) {
                        Some(hex) if closing > 0 => {
                            Position::new(*hex, facing).at_elevation(snapshot.board.elevation(*hex))
                        }
                        _ => enemy_at,
                    };
                    let incoming = Engagement {
                        shooter: enemy,
                        shooter_at,
                        shooter_mode: enemy_mode(enemy, closing as u32),
                        target: me.unit,
                        target_at: me.at,
                        target_moved: me.moved,
                        target_jumped: me.jumped,
                    };
                    self.fire_control.expected_fire_damage(snapshot, &incoming)
                        + self.fire_control.expected_physical_damage(snapshot, &incoming)
                })
                .fold(0.0, |worst: f64, damage| {
                    // NaN must reach the invalid-data check
                    if damage.is_nan() || damage > worst {
                        damage
                    } else {
                        worst
                    }
                })
        } else {
            0.0
        };

        // It will have moved by the time we fire
        let outgoing = Engagement {
            shooter: me.unit,
            shooter_at: me.at,
            shooter_mode: me.mode,
            target: enemy,
            target_at: enemy_at,
            target_moved: enemy.walk_mp,
            target_jumped: false,
        };

        EnemyAssessment {
            enemy: enemy.id,
            treated_as_moved: false,
            damage_dealt: self.fire_control.expected_fire_damage(snapshot, &outgoing),
            damage_taken,
            physical_damage_dealt: self.fire_control.expected_physical_damage(snapshot, &outgoing),
        }
    }

    /// Best (firing, physical) damage against a designated objective hex in reach
    fn strategic_damage(
        &self,
        snapshot: &WorldSnapshot,
        me: &Mover,
        behavior: &BehaviorSettings,
    ) -> (f64, f64) {
        behavior
            .strategic_targets
            .iter()
            .filter(|hex| **hex != me.at.hex)
            .map(|hex| {
                let structure = objective_stand_in(*hex, snapshot.board.elevation(*hex));
                let engagement = Engagement {
                    shooter: me.unit,
                    shooter_at: me.at,
                    shooter_mode: me.mode,
                    target: &structure,
                    target_at: structure.position.unwrap_or_default(),
                    target_moved: 0,
                    target_jumped: false,
                };
                (
                    finite_or_zero(self.fire_control.expected_fire_damage(snapshot, &engagement)),
                    finite_or_zero(self.fire_control.expected_physical_damage(snapshot, &engagement)),
                )
            })
            .fold((0.0, 0.0), |(fire, physical), (f, p)| (f64::max(fire, f), f64::max(physical, p)))
    }
}

/// An immobile structure occupying an objective hex
fn objective_stand_in(hex: HexCoord, elevation: i32) -> Unit {
    let mut structure = Unit::new(UnitId::from_u128(0), "objective", SideId(u8::MAX), UnitKind::Vehicle)
        .at(Position::new(hex, Default::default()).at_elevation(elevation));
    structure.walk_mp = 0;
    structure.run_mp = 0;
    structure
}

/// Movement mode implied by an enemy covering `hexes`
fn enemy_mode(enemy: &Unit, hexes: u32) -> MoveMode {
    if enemy.jumped || hexes > enemy.run_mp {
        MoveMode::Jump
    } else if hexes == 0 {
        MoveMode::Stand
    } else if hexes <= enemy.walk_mp {
        MoveMode::Walk
    } else {
        MoveMode::Run
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::board::Board;
    use crate::battle::fire_control::StandardFireControl;
    use crate::battle::hazards::StandardHazardModel;
    use crate::battle::hex::HexDirection;
    use crate::battle::snapshot::ArtilleryStrike;
    use crate::battle::units::Weapon;

    fn pos(q: i32, r: i32) -> Position {
        Position::new(HexCoord::new(q, r), HexDirection::East)
    }

    fn estimator() -> OutcomeEstimator {
        OutcomeEstimator::new(Arc::new(StandardFireControl), Arc::new(StandardHazardModel))
    }

    fn me() -> Unit {
        Unit::new(UnitId::from_u128(1), "me", SideId(0), UnitKind::Mech)
            .at(pos(2, 2))
            .with_weapon(Weapon::new("Large Laser", 8.0, 5, 10, 15))
    }

    fn enemy(id: u128, q: i32) -> Unit {
        let mut unit = Unit::new(UnitId::from_u128(id), "foe", SideId(1), UnitKind::Mech)
            .at(pos(q, 2))
            .with_weapon(Weapon::new("Medium Laser", 5.0, 3, 6, 9));
        unit.has_moved = true;
        unit
    }

    fn stand_path(unit: &Unit) -> CandidatePath {
        CandidatePath::new(unit.id, 1, unit.position.unwrap_or_default())
    }

    #[test]
    fn test_no_enemies_is_self_risk_only() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let unit = me();
        let estimate = estimator().estimate(
            &stand_path(&unit),
            &unit,
            &[],
            &snapshot,
            &BehaviorSettings::default(),
        );
        assert_eq!(estimate, OutcomeEstimate::default());
    }

    #[test]
    fn test_skips_ineligible_enemies() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let unit = me();

        let mut crew = enemy(2, 5);
        crew.kind = UnitKind::EjectedCrew;
        let mut gone = enemy(3, 5);
        gone.off_board = true;
        let mut hidden = enemy(4, 5);
        hidden.position = None;
        let ignored = enemy(5, 5);

        let mut behavior = BehaviorSettings::default();
        behavior.honor.ignored_units.push(ignored.id);

        let enemies = [&crew, &gone, &hidden, &ignored];
        let report = estimator().assess(&stand_path(&unit), &unit, &enemies, &snapshot, &behavior);

        assert!(report.enemies.is_empty());
        let reasons: Vec<SkipReason> = report.skipped.iter().map(|(_, r)| *r).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::NotCombatant,
                SkipReason::OffBoard,
                SkipReason::PositionUnknown,
                SkipReason::Disregarded
            ]
        );
        assert_eq!(report.estimate.expected_damage_taken, 0.0);
    }

    #[test]
    fn test_moved_enemy_contributes_both_ways() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let unit = me();
        let foe = enemy(2, 6);
        let estimate = estimator().estimate(
            &stand_path(&unit),
            &unit,
            &[&foe],
            &snapshot,
            &BehaviorSettings::default(),
        );
        assert!(estimate.best_firing_damage > 0.0);
        assert!(estimate.expected_damage_taken > 0.0);
        assert_eq!(estimate.best_physical_damage, 0.0);
    }

    #[test]
    fn test_unmoved_enemy_can_close_in() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(30, 10));
        let unit = me();
        let mut foe = enemy(2, 18);
        let behavior = BehaviorSettings::default();

        // 16 hexes out with a 9-hex laser: only a threat if it can close
        let moved = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert_eq!(moved.expected_damage_taken, 0.0);

        foe.has_moved = false;
        foe.run_mp = 8;
        let unmoved = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert!(unmoved.expected_damage_taken > 0.0);

        let flat = estimator()
            .with_unmoved_envelope(false)
            .estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert_eq!(flat.expected_damage_taken, 0.0);
    }

    #[test]
    fn test_unmoved_envelope_never_below_standing_still() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(30, 10));
        let unit = me();
        let behavior = BehaviorSettings::default();
        let mut lrm = Weapon::new("LRM 10", 6.0, 7, 14, 21);
        lrm.min_range = 6;

        for q in 3..=24 {
            let mut foe = Unit::new(UnitId::from_u128(2), "foe", SideId(1), UnitKind::Mech)
                .at(pos(q, 2))
                .with_weapon(lrm.clone());
            foe.run_mp = 6;

            let standing = estimator()
                .with_unmoved_envelope(false)
                .estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
            let envelope = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
            assert!(
                envelope.expected_damage_taken >= standing.expected_damage_taken,
                "at q={}: envelope {} below standing {}",
                q,
                envelope.expected_damage_taken,
                standing.expected_damage_taken
            );
        }
    }

    #[test]
    fn test_min_range_shooter_envelope_covers_holding_position() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(30, 10));
        let unit = me();
        let mut lrm = Weapon::new("LRM 10", 6.0, 7, 14, 21);
        lrm.min_range = 6;
        let mut foe = Unit::new(UnitId::from_u128(2), "foe", SideId(1), UnitKind::Mech)
            .at(pos(10, 2))
            .with_weapon(lrm);
        foe.run_mp = 6;

        let behavior = BehaviorSettings::default();

        // Holding at 8 hexes: medium range, gunnery 4 + 2 needs a 6
        let holding = 6.0 * 26.0 / 36.0;
        let standing = estimator()
            .with_unmoved_envelope(false)
            .estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert!((standing.expected_damage_taken - holding).abs() < 1e-9);

        // Running in to 2 hexes puts it deep inside minimum range
        let envelope = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert!(envelope.expected_damage_taken >= holding);
    }

    #[test]
    fn test_line_of_sight_range_makes_distant_unmoved_enemy_a_threat() {
        let mut snapshot = WorldSnapshot::new(1, 1, Board::new(30, 10));
        let unit = me();
        let mut foe = enemy(2, 27);
        foe.has_moved = false;
        let behavior = BehaviorSettings::default();

        // 25 hexes out, 6 MP and a 12-hex extreme reach
        let out_of_reach = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert_eq!(out_of_reach.expected_damage_taken, 0.0);

        snapshot.options.extreme_range = true;
        let extreme = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert_eq!(extreme.expected_damage_taken, 0.0);

        snapshot.options.line_of_sight_range = true;
        let sighted = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert!(sighted.expected_damage_taken > 0.0);
    }

    #[test]
    fn test_artillery_risk_memoized_and_skipped_when_airborne() {
        let mut snapshot = WorldSnapshot::new(7, 1, Board::new(20, 10));
        snapshot.artillery.push(ArtilleryStrike {
            target: HexCoord::new(2, 2),
            damage: 20.0,
            falloff: 10.0,
            side: SideId(0),
        });
        let est = estimator();
        let mut unit = me();
        let behavior = BehaviorSettings::default();

        let grounded = est.estimate(&stand_path(&unit), &unit, &[], &snapshot, &behavior);
        assert_eq!(grounded.expected_damage_taken, 20.0);
        assert_eq!(est.memo().len(), 1);

        unit.airborne = true;
        let flying = est.estimate(&stand_path(&unit), &unit, &[], &snapshot, &behavior);
        assert_eq!(flying.expected_damage_taken, 0.0);
    }

    #[test]
    fn test_memo_resets_on_new_snapshot() {
        let memo = RiskMemo::new();
        let mut snapshot = WorldSnapshot::new(1, 1, Board::new(5, 5));
        memo.artillery_risk(&snapshot, HexCoord::new(1, 1));
        memo.artillery_risk(&snapshot, HexCoord::new(2, 1));
        assert_eq!(memo.len(), 2);

        snapshot.version = 2;
        memo.artillery_risk(&snapshot, HexCoord::new(1, 1));
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_physical_damage_zeroed_when_forbidden() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let mut unit = me();
        let foe = enemy(2, 3);
        let behavior = BehaviorSettings::default();

        let allowed = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert!(allowed.best_physical_damage > 0.0);

        unit.physical_attacks_forbidden = true;
        let forbidden = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert_eq!(forbidden.best_physical_damage, 0.0);
    }

    #[test]
    fn test_strategic_target_raises_firing_damage() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let unit = me();
        let mut behavior = BehaviorSettings::default();

        let plain = estimator().assess(&stand_path(&unit), &unit, &[], &snapshot, &behavior);
        assert_eq!(plain.estimate.best_firing_damage, 0.0);

        behavior.strategic_targets.push(HexCoord::new(5, 2));
        let report = estimator().assess(&stand_path(&unit), &unit, &[], &snapshot, &behavior);
        assert!(report.strategic_bonus);
        assert!(report.estimate.best_firing_damage > 0.0);
    }

    #[test]
    fn test_adjacent_strategic_target_raises_physical_damage() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let mut unit = me();
        let mut behavior = BehaviorSettings::default();
        behavior.strategic_targets.push(HexCoord::new(3, 2));

        let report = estimator().assess(&stand_path(&unit), &unit, &[], &snapshot, &behavior);
        assert!(report.strategic_bonus);
        assert!(report.estimate.best_physical_damage > 0.0);

        unit.physical_attacks_forbidden = true;
        let forbidden = estimator().assess(&stand_path(&unit), &unit, &[], &snapshot, &behavior);
        assert_eq!(forbidden.estimate.best_physical_damage, 0.0);
        assert!(forbidden.estimate.best_firing_damage > 0.0);
    }

    #[test]
    fn test_priority_target_multiplier() {
        let snapshot = WorldSnapshot::new(1, 1, Board::new(20, 10));
        let unit = me();
        let foe = enemy(2, 6);
        let mut behavior = BehaviorSettings::default();

        let base = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        behavior.priority_units.push(foe.id);
        let boosted = estimator().estimate(&stand_path(&unit), &unit, &[&foe], &snapshot, &behavior);
        assert!(
            (boosted.best_firing_damage - base.best_firing_damage * PRIORITY_TARGET_MULTIPLIER).abs()
                < 1e-9
        );
    }
}
