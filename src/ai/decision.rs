//! Named, weighted scoring rules
//!
//! A [`Decision`] pairs a name and a weight with a [`Consideration`], the
//! pluggable part that says whether the decision applies to a path (the
//! bonus) and how good the path is for it (the raw score). New tactical
//! ideas are added as new considerations; the ranking engine never changes.

use std::fmt;

use crate::ai::context::DecisionContext;
use crate::ai::trace::TraceSink;

pub trait Consideration: Send + Sync {
    /// Non-negative applicability multiplier; 0 means "does not apply"
    fn bonus(&self, _ctx: &DecisionContext) -> f64 {
        1.0
    }

    /// Raw score for this path, before weight and bonus
    fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64;
}

/// Consideration built from a pair of closures
pub struct FnConsideration<B, S> {
    bonus: B,
    score: S,
}

impl<B, S> Consideration for FnConsideration<B, S>
where
    B: Fn(&DecisionContext) -> f64 + Send + Sync,
    S: Fn(&DecisionContext) -> f64 + Send + Sync,
{
    fn bonus(&self, ctx: &DecisionContext) -> f64 {
        (self.bonus)(ctx)
    }

    fn score(&self, ctx: &DecisionContext, _trace: &mut TraceSink) -> f64 {
        (self.score)(ctx)
    }
}

pub struct Decision {
    pub name: String,
    pub weight: f64,
    pub consideration: Box<dyn Consideration>,
}

impl Decision {
    pub fn new(name: impl Into<String>, weight: f64, consideration: impl Consideration + 'static) -> Self {
        Self {
            name: name.into(),
            weight,
            consideration: Box::new(consideration),
        }
    }

    /// Decision from an applicability closure and a scoring closure
    pub fn from_fns<B, S>(name: impl Into<String>, weight: f64, bonus: B, score: S) -> Self
    where
        B: Fn(&DecisionContext) -> f64 + Send + Sync + 'static,
        S: Fn(&DecisionContext) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, weight, FnConsideration { bonus, score })
    }

    /// Decision that always applies
    pub fn always<S>(name: impl Into<String>, weight: f64, score: S) -> Self
    where
        S: Fn(&DecisionContext) -> f64 + Send + Sync + 'static,
    {
        Self::from_fns(name, weight, |_: &DecisionContext| 1.0, score)
    }

    pub fn bonus(&self, ctx: &DecisionContext) -> f64 {
        self.consideration.bonus(ctx)
    }

    pub fn score(&self, ctx: &DecisionContext, trace: &mut TraceSink) -> f64 {
        self.consideration.score(ctx, trace)
    }
}

impl fmt::Debug for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decision")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}
