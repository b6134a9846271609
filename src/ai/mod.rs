//! Tactical decision engine
//!
//! Scores every (decision, candidate path) pair for a unit, keeps the single
//! best pair, and remembers it per unit.

pub mod behavior;
pub mod considerations;
pub mod context;
pub mod decision;
pub mod engine;
pub mod memory;
pub mod outcome;
pub mod ranked;
pub mod ranking;
pub mod selector;
pub mod trace;

pub use behavior::{load_behavior, BehaviorSettings, DecisionWeights, HonorPolicy};
pub use considerations::{
    stock_decisions, AttackConsideration, FleeConsideration, HerdConsideration, ManeuverConsideration,
    ObjectiveConsideration,
};
pub use context::{DecisionContext, ScratchCache};
pub use decision::{Consideration, Decision};
pub use engine::{RankingPass, TacticalEngine};
pub use memory::DecisionMemory;
pub use outcome::{OutcomeEstimate, OutcomeEstimator, OutcomeReport, RiskMemo, PRIORITY_TARGET_MULTIPLIER};
pub use ranked::{RankedCandidate, RankedSet};
pub use ranking::{PassStats, RankingEngine, BONUS_CUTOFF};
pub use selector::select;
pub use trace::{Trace, TraceSink};
