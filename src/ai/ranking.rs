//! Ranks every (decision, path) pair for one unit
//!
//! The winner is the single best pair across the whole matrix, not the path
//! with the best total over all decisions. A path that is excellent for one
//! reason beats a path that is merely adequate for every reason.
//!
//! Evaluation order is decisions outer, contexts inner. Each pair gets the
//! sequence number `decision_index * contexts.len() + context_index`, and
//! equal scores go to the lower sequence. Large matrices are evaluated on the
//! rayon pool; the sequence is part of the sort key, so the result is the same
//! as the sequential pass.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use serde::Serialize;

use crate::ai::context::DecisionContext;
use crate::ai::decision::Decision;
use crate::ai::ranked::{RankedCandidate, RankedSet};
use crate::ai::trace::{Trace, TraceSink};
use crate::core::config::EngineConfig;

/// A bonus must be strictly above this for a decision to apply
pub const BONUS_CUTOFF: f64 = 0.0;

/// Counts from one ranking pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Pairs whose evaluator ran and produced a score
    pub scored: usize,
    /// Pairs rejected by the applicability gate
    pub gated: usize,
    /// Pairs whose consideration panicked or returned a non-finite score
    pub faulted: usize,
}

impl PassStats {
    fn merge(mut self, other: PassStats) -> PassStats {
        self.scored += other.scored;
        self.gated += other.gated;
        self.faulted += other.faulted;
        self
    }
}

enum PairResult {
    Scored(RankedCandidate),
    Gated,
    Faulted,
}

#[derive(Debug, Clone)]
pub struct RankingEngine {
    parallel_threshold: usize,
    trace: bool,
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl RankingEngine {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            parallel_threshold: config.parallel_threshold.max(1),
            trace: config.trace,
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn rank(&self, decisions: &[Decision], contexts: &[DecisionContext]) -> RankedSet {
        self.rank_with_stats(decisions, contexts).0
    }

    pub fn rank_with_stats(
        &self,
        decisions: &[Decision],
        contexts: &[DecisionContext],
    ) -> (RankedSet, PassStats) {
        let pairs = decisions.len() * contexts.len();
        if pairs == 0 {
            return (RankedSet::new(), PassStats::default());
        }

        let (ranked, stats) = if pairs >= self.parallel_threshold {
            self.rank_parallel(decisions, contexts)
        } else {
            self.rank_sequential(decisions, contexts)
        };

        tracing::debug!(
            pairs,
            scored = stats.scored,
            gated = stats.gated,
            faulted = stats.faulted,
            "ranking pass complete"
        );
        (ranked, stats)
    }

    fn rank_sequential(&self, decisions: &[Decision], contexts: &[DecisionContext]) -> (RankedSet, PassStats) {
        let mut ranked = RankedSet::new();
        let mut stats = PassStats::default();

        for (d_index, decision) in decisions.iter().enumerate() {
            for (c_index, ctx) in contexts.iter().enumerate() {
                let sequence = d_index * contexts.len() + c_index;
                self.tally(self.evaluate_pair(decision, ctx, sequence), &mut ranked, &mut stats);
            }
        }
        (ranked, stats)
    }

    // PARALLEL: one task per context; per-task partial sets merge by key
    fn rank_parallel(&self, decisions: &[Decision], contexts: &[DecisionContext]) -> (RankedSet, PassStats) {
        contexts
            .par_iter()
            .enumerate()
            .map(|(c_index, ctx)| {
                let mut ranked = RankedSet::new();
                let mut stats = PassStats::default();
                for (d_index, decision) in decisions.iter().enumerate() {
                    let sequence = d_index * contexts.len() + c_index;
                    self.tally(self.evaluate_pair(decision, ctx, sequence), &mut ranked, &mut stats);
                }
                (ranked, stats)
            })
            .reduce(
                || (RankedSet::new(), PassStats::default()),
                |(mut ranked, stats), (other, other_stats)| {
                    ranked.merge(other);
                    (ranked, stats.merge(other_stats))
                },
            )
    }

    fn tally(&self, result: PairResult, ranked: &mut RankedSet, stats: &mut PassStats) {
        match result {
            PairResult::Scored(candidate) => {
                stats.scored += 1;
                ranked.insert(candidate);
            }
            PairResult::Gated => stats.gated += 1,
            PairResult::Faulted => stats.faulted += 1,
        }
    }

    fn evaluate_pair(&self, decision: &Decision, ctx: &DecisionContext, sequence: usize) -> PairResult {
        let evaluated = panic::catch_unwind(AssertUnwindSafe(|| {
            let bonus = decision.bonus(ctx);
            // NaN fails this comparison too
            if !(bonus > BONUS_CUTOFF) {
                return None;
            }
            let mut sink = TraceSink::new(self.trace);
            let raw = decision.score(ctx, &mut sink);
            Some((bonus, raw, sink))
        }));

        let (bonus, raw, sink) = match evaluated {
            Ok(Some(parts)) => parts,
            Ok(None) => return PairResult::Gated,
            Err(payload) => {
                tracing::warn!(
                    decision = %decision.name,
                    unit = %ctx.unit.id,
                    path = %ctx.path.describe(),
                    reason = panic_message(payload.as_ref()),
                    "consideration panicked; treating pair as not applicable"
                );
                return PairResult::Faulted;
            }
        };

        let score = raw * decision.weight * bonus;
        if !score.is_finite() {
            tracing::warn!(
                decision = %decision.name,
                unit = %ctx.unit.id,
                raw,
                bonus,
                "non-finite score; treating pair as not applicable"
            );
            return PairResult::Faulted;
        }

        let trace = sink.into_notes().map(|notes| Trace {
            decision: decision.name.clone(),
            raw,
            weight: decision.weight,
            bonus,
            score,
            notes,
        });

        PairResult::Scored(RankedCandidate {
            score,
            decision: decision.name.clone(),
            path: ctx.path.clone(),
            trace,
            outcome: ctx.outcome,
            snapshot_version: ctx.path.snapshot_version,
            sequence,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behavior::BehaviorSettings;
    use crate::ai::outcome::OutcomeEstimate;
    use crate::battle::board::Board;
    use crate::battle::hex::{HexCoord, HexDirection, Position};
    use crate::battle::path::{CandidatePath, StepKind};
    use crate::battle::snapshot::WorldSnapshot;
    use crate::battle::units::{Unit, UnitKind};
    use crate::core::types::{SideId, UnitId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixture {
        snapshot: WorldSnapshot,
        unit: Unit,
        behavior: BehaviorSettings,
        paths: Vec<Arc<CandidatePath>>,
    }

    impl Fixture {
        fn new(path_count: i32) -> Self {
            let unit = Unit::new(UnitId::from_u128(1), "me", SideId(0), UnitKind::Mech)
                .at(Position::new(HexCoord::new(0, 0), HexDirection::East));
            let paths = (0..path_count)
                .map(|i| {
                    let mut path = CandidatePath::new(unit.id, 1, Position::default());
                    if i > 0 {
                        path.push_step(StepKind::Forward, Position::new(HexCoord::new(i, 0), HexDirection::East), 1);
                    }
                    Arc::new(path)
                })
                .collect();
            Self {
                snapshot: WorldSnapshot::new(1, 1, Board::new(40, 5)),
                unit,
                behavior: BehaviorSettings::default(),
                paths,
            }
        }

        fn contexts(&self) -> Vec<DecisionContext<'_>> {
            self.paths
                .iter()
                .map(|path| {
                    DecisionContext::new(
                        &self.unit,
                        Arc::clone(path),
                        OutcomeEstimate::default(),
                        &self.behavior,
                        Vec::new(),
                        Vec::new(),
                        &self.snapshot,
                    )
                })
                .collect()
        }
    }

    fn by_distance(weight: f64) -> Decision {
        Decision::always("distance", weight, |c| c.path.distance_moved() as f64)
    }

    #[test]
    fn test_empty_inputs_rank_nothing() {
        let fixture = Fixture::new(3);
        let engine = RankingEngine::default();
        assert!(engine.rank(&[], &fixture.contexts()).is_empty());
        assert!(engine.rank(&[by_distance(1.0)], &[]).is_empty());
    }

    #[test]
    fn test_score_is_raw_times_weight_times_bonus() {
        let fixture = Fixture::new(3);
        let decision = Decision::from_fns("scaled", 2.0, |_| 0.5, |_| 3.0);
        let ranked = RankingEngine::default().rank(&[decision], &fixture.contexts());
        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|c| (c.score - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_gate_skips_evaluator() {
        let fixture = Fixture::new(4);
        let calls = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&calls);
        let gated = Decision::from_fns(
            "never",
            1.0,
            |_| 0.0,
            move |_| {
                spy.fetch_add(1, Ordering::SeqCst);
                10.0
            },
        );
        let nan_gate = Decision::from_fns("nan", 1.0, |_| f64::NAN, |_| 10.0);

        let (ranked, stats) = RankingEngine::default().rank_with_stats(&[gated, nan_gate], &fixture.contexts());
        assert!(ranked.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(stats.gated, 8);
    }

    #[test]
    fn test_best_single_pair_wins() {
        let fixture = Fixture::new(3);
        // Path 0 is decent for both decisions, path 2 is great for one
        let steady = Decision::always("steady", 1.0, |c| if c.path.distance_moved() == 0 { 4.0 } else { 1.0 });
        let spike = Decision::always("spike", 1.0, |c| if c.path.distance_moved() == 2 { 5.0 } else { 3.9 });
        let best = RankingEngine::default()
            .rank(&[steady, spike], &fixture.contexts())
            .into_best()
            .expect("candidates");
        assert_eq!(best.decision, "spike");
        assert_eq!(best.path.distance_moved(), 2);
    }

    #[test]
    fn test_ties_go_to_earlier_sequence() {
        let fixture = Fixture::new(3);
        let flat_a = Decision::always("a", 1.0, |_| 1.0);
        let flat_b = Decision::always("b", 1.0, |_| 1.0);
        let ranked = RankingEngine::default().rank(&[flat_a, flat_b], &fixture.contexts());
        let order: Vec<(String, usize)> = ranked.iter().map(|c| (c.decision.clone(), c.sequence)).collect();
        assert_eq!(order[0], ("a".to_string(), 0));
        assert_eq!(order[3], ("b".to_string(), 3));
    }

    #[test]
    fn test_panicking_consideration_is_contained() {
        let fixture = Fixture::new(3);
        let faulty = Decision::always("faulty", 1.0, |c| {
            if c.path.distance_moved() == 1 {
                panic!("bad consideration");
            }
            100.0
        });
        let (ranked, stats) =
            RankingEngine::default().rank_with_stats(&[faulty, by_distance(1.0)], &fixture.contexts());
        assert_eq!(stats.faulted, 1);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked.best().map(|c| c.score), Some(100.0));
    }

    #[test]
    fn test_non_finite_scores_are_dropped() {
        let fixture = Fixture::new(2);
        let broken = Decision::always("broken", 1.0, |_| f64::INFINITY);
        let (ranked, stats) = RankingEngine::default().rank_with_stats(&[broken], &fixture.contexts());
        assert!(ranked.is_empty());
        assert_eq!(stats.faulted, 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let fixture = Fixture::new(30);
        let decisions = vec![
            by_distance(1.0),
            Decision::always("flat", 1.0, |_| 15.0),
            Decision::from_fns("odd", 0.7, |c| (c.path.distance_moved() % 2) as f64, |_| 40.0),
        ];
        let contexts = fixture.contexts();

        let sequential = RankingEngine::from_config(&EngineConfig {
            parallel_threshold: usize::MAX,
            ..EngineConfig::default()
        })
        .rank(&decisions, &contexts);
        let parallel = RankingEngine::from_config(&EngineConfig {
            parallel_threshold: 1,
            ..EngineConfig::default()
        })
        .rank(&decisions, &contexts);

        let a: Vec<(usize, f64)> = sequential.iter().map(|c| (c.sequence, c.score)).collect();
        let b: Vec<(usize, f64)> = parallel.iter().map(|c| (c.sequence, c.score)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_only_when_enabled() {
        let fixture = Fixture::new(2);
        let contexts = fixture.contexts();
        let plain = RankingEngine::default().rank(&[by_distance(1.0)], &contexts);
        assert!(plain.iter().all(|c| c.trace.is_none()));

        let traced = RankingEngine::default().with_trace(true).rank(&[by_distance(1.0)], &contexts);
        let trace = traced.best().and_then(|c| c.trace.as_ref()).expect("trace");
        assert_eq!(trace.decision, "distance");
        assert_eq!(trace.score, 1.0);
    }
}
