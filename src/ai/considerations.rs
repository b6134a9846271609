//! Stock decision set used by the runner and tests
//!
//! These are ordinary [`Consideration`] implementations; the ranking engine
//! knows nothing about them. Bot profiles pick their weights through
//! [`DecisionWeights`].

use crate::ai::behavior::DecisionWeights;
use crate::ai::context::DecisionContext;
use crate::ai::decision::{Consideration, Decision};
use crate::ai::trace::TraceSink;

/// Score lost per hex between us and the nearest enemy, at full aggression
const CLOSING_PER_HEX: f64 = 0.1;

/// Score lost per hex away from the friendly centroid, at full herding
const HERDING_PER_HEX: f64 = 0.1;

/// Friends further than this add nothing to the herd score
const HERD_RANGE: f64 = 10.0;

/// Objectives further than this add nothing to the objective score
const OBJECTIVE_RANGE: f64 = 15.0;

/// Expected damage taken, as a fraction of remaining armor, that counts as
/// overwhelming
const OVERWHELMING_RISK: f64 = 0.5;

/// Bonus left on attacking while the unit is trying to get away
const WITHDRAWING_ATTACK_BONUS: f64 = 0.25;

/// Utility of a break-even position once shifted onto the non-negative scale
const NEUTRAL_UTILITY: f64 = 1.0;

/// Map a net gain onto `(0, inf)` without reordering it
///
/// Gains shift up by [`NEUTRAL_UTILITY`]; losses shrink toward zero. Stock
/// scores stay non-negative so raising a decision's weight never lowers them.
fn non_negative_utility(net: f64) -> f64 {
    if net >= 0.0 {
        NEUTRAL_UTILITY + net
    } else {
        NEUTRAL_UTILITY * NEUTRAL_UTILITY / (NEUTRAL_UTILITY - net)
    }
}

/// Deal the most damage possible from here
#[derive(Debug, Clone, Copy, Default)]
pub struct AttackConsideration;

impl Consideration for AttackConsideration {
    fn bonus(&self, ctx: &DecisionContext) -> f64 {
        if ctx.outcome.best_damage() <= 0.0 {
            0.0
        } else if ctx.wants_withdrawal() {
            WITHDRAWING_ATTACK_BONUS
        } else {
            1.0
        }
    }

    fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64 {
        let outcome = ctx.outcome;
        trace.note(|| {
            format!(
                "fire {:.2}, physical {:.2}",
                outcome.best_firing_damage, outcome.best_physical_damage
            )
        });
        outcome.best_damage()
    }
}

/// General positioning: trade damage for risk, close in, stay with friends
#[derive(Debug, Clone, Copy, Default)]
pub struct ManeuverConsideration;

impl Consideration for ManeuverConsideration {
    fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64 {
        let behavior = ctx.behavior;
        let outcome = ctx.outcome;

        let nerve = 0.5 + 0.5 * behavior.bravery.max(behavior.aggression);
        let reward = outcome.best_damage() * nerve;
        let risk = outcome.expected_damage_taken * behavior.self_preservation;

        let closing = ctx
            .nearest_enemy_distance()
            .map(|d| -(d as f64) * CLOSING_PER_HEX * behavior.aggression)
            .unwrap_or(0.0);
        let herding = ctx
            .friend_centroid_distance()
            .map(|d| -d * HERDING_PER_HEX * behavior.herd_mentality)
            .unwrap_or(0.0);

        trace.note(|| {
            format!(
                "reward {:.2}, risk {:.2}, closing {:.2}, herding {:.2}",
                reward, risk, closing, herding
            )
        });
        non_negative_utility(reward - risk + closing + herding)
    }
}

/// Head for the home edge
#[derive(Debug, Clone, Copy, Default)]
pub struct FleeConsideration;

impl Consideration for FleeConsideration {
    fn bonus(&self, ctx: &DecisionContext) -> f64 {
        if ctx.wants_withdrawal() {
            return 1.0;
        }
        let armor = ctx.unit.armor.max(0.0);
        if ctx.outcome.expected_damage_taken > armor * OVERWHELMING_RISK {
            1.0 - ctx.behavior.bravery
        } else {
            0.0
        }
    }

    fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64 {
        let board = &ctx.snapshot.board;
        let span = board.width.max(board.height) as f64;
        let to_edge = ctx.home_edge_distance() as f64;
        let taken = ctx.outcome.expected_damage_taken;

        trace.note(|| format!("{} hexes from home edge, {:.2} expected damage", to_edge, taken));
        non_negative_utility((span - to_edge) - taken * ctx.behavior.self_preservation)
    }
}

/// Stay close to the rest of the side
#[derive(Debug, Clone, Copy, Default)]
pub struct HerdConsideration;

impl Consideration for HerdConsideration {
    fn bonus(&self, ctx: &DecisionContext) -> f64 {
        if ctx.known_friends.is_empty() {
            0.0
        } else {
            ctx.behavior.herd_mentality
        }
    }

    fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64 {
        let Some(distance) = ctx.friend_centroid_distance() else {
            return 0.0;
        };
        trace.note(|| format!("{:.1} hexes from friendly centroid", distance));
        (HERD_RANGE - distance).max(0.0)
    }
}

/// Move toward designated objective hexes
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveConsideration;

impl Consideration for ObjectiveConsideration {
    fn bonus(&self, ctx: &DecisionContext) -> f64 {
        if ctx.behavior.strategic_targets.is_empty() || ctx.wants_withdrawal() {
            0.0
        } else {
            1.0
        }
    }

    fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64 {
        let Some(distance) = ctx.nearest_objective_distance() else {
            return 0.0;
        };
        trace.note(|| format!("{} hexes from nearest objective", distance));
        (OBJECTIVE_RANGE - distance as f64).max(0.0)
    }
}

/// The stock decisions, in evaluation order
pub fn stock_decisions(weights: &DecisionWeights) -> Vec<Decision> {
    vec![
        Decision::new("attack", weights.attack, AttackConsideration),
        Decision::new("maneuver", weights.maneuver, ManeuverConsideration),
        Decision::new("flee", weights.flee, FleeConsideration),
        Decision::new("herd", weights.herd, HerdConsideration),
        Decision::new("objective", weights.objective, ObjectiveConsideration),
    ]
}
