//! Turn-driver entry point
//!
//! [`TacticalEngine`] owns the collaborators, the behavior handle and the
//! injected [`DecisionMemory`]. One call to [`TacticalEngine::rank_unit`]
//! is one ranking pass for one unit:
//!
//! 1. Check every candidate path belongs to this unit and this snapshot
//! 2. Estimate the outcome of each path and build its context
//! 3. Rank every (decision, context) pair
//! 4. Select the best pair and remember it

use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use rayon::prelude::*;

use crate::ai::behavior::BehaviorSettings;
use crate::ai::context::DecisionContext;
use crate::ai::decision::Decision;
use crate::ai::memory::DecisionMemory;
use crate::ai::outcome::OutcomeEstimator;
use crate::ai::ranked::{RankedCandidate, RankedSet};
use crate::ai::ranking::{PassStats, RankingEngine};
use crate::ai::selector::select;
use crate::battle::fire_control::{FireControl, StandardFireControl};
use crate::battle::hazards::{HazardModel, StandardHazardModel};
use crate::battle::path::CandidatePath;
use crate::battle::snapshot::WorldSnapshot;
use crate::core::config::EngineConfig;
use crate::core::error::{Result, TacticianError};
use crate::core::types::UnitId;

/// Everything one ranking pass produced
#[derive(Debug, Clone)]
pub struct RankingPass {
    pub unit_id: UnitId,
    /// Every candidate that passed its gate, best first
    pub ranked: RankedSet,
    pub selected: Option<RankedCandidate>,
    pub stats: PassStats,
    /// Human-readable score breakdown, when tracing is enabled
    pub report: Option<String>,
}

pub struct TacticalEngine {
    config: EngineConfig,
    ranking: RankingEngine,
    estimator: OutcomeEstimator,
    memory: Arc<DecisionMemory>,
    behavior: RwLock<Arc<BehaviorSettings>>,
}

impl TacticalEngine {
    /// Engine with the reference collaborators and an empty memory
    pub fn new(config: EngineConfig, behavior: BehaviorSettings) -> Result<Self> {
        config.validate()?;
        behavior.validate()?;

        let estimator = OutcomeEstimator::new(Arc::new(StandardFireControl), Arc::new(StandardHazardModel))
            .with_unmoved_envelope(config.unmoved_enemy_envelope);

        Ok(Self {
            ranking: RankingEngine::from_config(&config),
            estimator,
            memory: Arc::new(DecisionMemory::new()),
            behavior: RwLock::new(Arc::new(behavior)),
            config,
        })
    }

    /// Swap in a different to-hit service and hazard model
    pub fn with_collaborators(mut self, fire_control: Arc<dyn FireControl>, hazards: Arc<dyn HazardModel>) -> Self {
        self.estimator =
            OutcomeEstimator::new(fire_control, hazards).with_unmoved_envelope(self.config.unmoved_enemy_envelope);
        self
    }

    /// Share a memory with other engines, or start a test from a known one
    pub fn with_memory(mut self, memory: Arc<DecisionMemory>) -> Self {
        self.memory = memory;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn memory(&self) -> &Arc<DecisionMemory> {
        &self.memory
    }

    /// What the engine chose for this unit last time it was ranked
    pub fn last_choice(&self, unit_id: UnitId) -> Option<RankedCandidate> {
        self.memory.lookup(unit_id)
    }

    /// Current behavior settings; stays fixed for whoever holds it
    pub fn behavior(&self) -> Arc<BehaviorSettings> {
        self.behavior.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Edit the behavior settings between passes
    ///
    /// The edit is validated before it replaces the current settings.
    pub fn update_behavior<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut BehaviorSettings),
    {
        let mut updated = (*self.behavior()).clone();
        edit(&mut updated);
        updated.validate()?;
        *self.behavior.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(updated);
        Ok(())
    }

    /// Apply an operator chat command such as `aggression 8`
    pub fn apply_command(&self, command: &str) -> Result<()> {
        let mut updated = (*self.behavior()).clone();
        updated.apply_command(command)?;
        *self.behavior.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(updated);
        tracing::info!(command, "behavior updated");
        Ok(())
    }

    /// Rank one unit's candidate paths and return the winner
    ///
    /// `Ok(None)` means nothing was selectable: no candidate paths, or every
    /// decision gated out every path.
    pub fn rank_unit(
        &self,
        unit_id: UnitId,
        candidate_paths: Vec<CandidatePath>,
        snapshot: &WorldSnapshot,
        decisions: &[Decision],
    ) -> Result<Option<RankedCandidate>> {
        let pass = self.rank_unit_detailed(unit_id, candidate_paths, snapshot, decisions)?;
        Ok(select(pass.ranked))
    }

    /// Like [`rank_unit`](Self::rank_unit) but keeps the whole ranked set
    pub fn rank_unit_detailed(
        &self,
        unit_id: UnitId,
        candidate_paths: Vec<CandidatePath>,
        snapshot: &WorldSnapshot,
        decisions: &[Decision],
    ) -> Result<RankingPass> {
        let unit = snapshot
            .unit(unit_id)
            .ok_or(TacticianError::UnitNotFound(unit_id))?;
        for path in &candidate_paths {
            check_path(path, unit_id, snapshot)?;
        }

        let behavior = self.behavior();
        let enemies = snapshot.enemies_of(unit);
        let friends = snapshot.friends_of(unit);

        let build = |path: CandidatePath| {
            let outcome = self
                .estimator
                .estimate(&path, unit, &enemies, snapshot, &behavior);
            DecisionContext::new(
                unit,
                Arc::new(path),
                outcome,
                &behavior,
                enemies.clone(),
                friends.clone(),
                snapshot,
            )
        };
        let pairs = candidate_paths.len() * decisions.len();
        let contexts: Vec<DecisionContext> = if pairs >= self.config.parallel_threshold {
            candidate_paths.into_par_iter().map(build).collect()
        } else {
            candidate_paths.into_iter().map(build).collect()
        };

        let (ranked, stats) = self.ranking.rank_with_stats(decisions, &contexts);
        let selected = ranked.best().cloned();
        let report = self.config.trace.then(|| trace_report(&ranked));

        match &selected {
            Some(choice) => {
                tracing::debug!(
                    unit = %unit_id,
                    candidates = contexts.len(),
                    decision = %choice.decision,
                    score = choice.score,
                    path = %choice.path.describe(),
                    "selected path"
                );
                self.memory.record(unit_id, choice.clone());
            }
            None => tracing::debug!(unit = %unit_id, candidates = contexts.len(), "no selectable path"),
        }

        Ok(RankingPass {
            unit_id,
            ranked,
            selected,
            stats,
            report,
        })
    }

    /// Rank several units of one side against the same snapshot
    ///
    /// Results come back in request order.
    pub fn rank_units(
        &self,
        requests: Vec<(UnitId, Vec<CandidatePath>)>,
        snapshot: &WorldSnapshot,
        decisions: &[Decision],
    ) -> Vec<(UnitId, Result<Option<RankedCandidate>>)> {
        requests
            .into_par_iter()
            .map(|(unit_id, paths)| (unit_id, self.rank_unit(unit_id, paths, snapshot, decisions)))
            .collect()
    }
}

fn check_path(path: &CandidatePath, unit_id: UnitId, snapshot: &WorldSnapshot) -> Result<()> {
    if path.unit_id != unit_id {
        tracing::warn!(unit = %unit_id, path_unit = %path.unit_id, "rejecting path built for another unit");
        return Err(TacticianError::ForeignPath {
            path_unit: path.unit_id,
            unit: unit_id,
        });
    }
    if path.snapshot_version != snapshot.version {
        tracing::warn!(
            unit = %unit_id,
            path_version = path.snapshot_version,
            current_version = snapshot.version,
            "rejecting stale path"
        );
        return Err(TacticianError::StalePath {
            path_version: path.snapshot_version,
            current_version: snapshot.version,
        });
    }
    Ok(())
}

fn trace_report(ranked: &RankedSet) -> String {
    let mut report = String::new();
    for (rank, candidate) in ranked.iter().enumerate() {
        let _ = writeln!(report, "#{} {}", rank + 1, candidate.path.describe());
        if let Some(trace) = &candidate.trace {
            let _ = writeln!(report, "  {}", trace.to_string().replace('\n', "\n  "));
        }
    }
    report
}
