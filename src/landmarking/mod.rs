//! Landmarking meta-features.
//!
//! Landmarking estimates dataset characteristics through the cross-validated
//! performance of simple "landmark" classifiers. Every probe in this module
//! consumes one shared [`SplitPlan`] and a caller-supplied scoring function
//! and returns a vector of per-fold scores, one entry per fold in plan order.
//!
//! The split plan is expensive to build relative to the probes, so it is
//! precomputed once per extraction run into a [`PrecomputeContext`] and shared
//! read-only by every probe:
//!
//! ```
//! use metafe::landmarking::{self, PrecomputeContext};
//! use metafe::ml::metrics::accuracy_score;
//!
//! let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i % 4) as f64]).collect();
//! let y: Vec<f64> = (0..20).map(|i| if i < 10 { 0.0 } else { 1.0 }).collect();
//!
//! let mut ctx = PrecomputeContext::new();
//! landmarking::precompute_split_plan(&mut ctx, &y, 5, Some(0)).unwrap();
//! let plan = ctx.split_plan().unwrap();
//!
//! let scores = landmarking::one_nn(&x, &y, plan, accuracy_score).unwrap();
//! assert_eq!(scores.len(), 5);
//! ```

pub mod probes;
pub mod registry;

pub use probes::{
    attribute_importance_order, best_node, elite_nn, linear_discr, naive_bayes, one_nn,
    random_node, worst_node, BestNodeConfig, EliteNnConfig, RandomNodeConfig, WorstNodeConfig,
};
pub use registry::{default_registry, ProbeRegistry, ProbeSpec, ProbeFn, ScoreFn};

use crate::error::{Error, Result};
use crate::ml::model_selection::{SplitPlan, StratifiedKFold};
use std::sync::Arc;

/// Precomputed values shared by every landmarking probe of one extraction run.
///
/// Replaces ad-hoc dictionary merging with an explicit context object: the
/// orchestrator builds one context per dataset, runs the precompute step, and
/// hands the stored plan to each probe. The plan is never mutated once stored.
#[derive(Debug, Clone, Default)]
pub struct PrecomputeContext {
    split_plan: Option<Arc<SplitPlan>>,
}

impl PrecomputeContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with an already-built plan, e.g. one reused
    /// from a previous computation.
    pub fn with_split_plan(plan: SplitPlan) -> Self {
        PrecomputeContext {
            split_plan: Some(Arc::new(plan)),
        }
    }

    /// The stored split plan, if the precompute step has run.
    pub fn split_plan(&self) -> Option<&SplitPlan> {
        self.split_plan.as_deref()
    }

    /// Shared handle to the stored plan, for callers that fan probes out.
    pub fn split_plan_handle(&self) -> Option<Arc<SplitPlan>> {
        self.split_plan.clone()
    }
}

/// Build the stratified k-fold split plan into `ctx` unless one is already
/// present.
///
/// Returns `Ok(true)` when a plan was built and stored, `Ok(false)` when the
/// context already held one (the "empty update" case - an existing plan is
/// never overwritten). Fold count incompatible with the class distribution
/// surfaces as an error from [`StratifiedKFold::split`].
pub fn precompute_split_plan(
    ctx: &mut PrecomputeContext,
    y: &[f64],
    folds: usize,
    random_seed: Option<u64>,
) -> Result<bool> {
    if ctx.split_plan.is_some() {
        return Ok(false);
    }

    let mut kfold = StratifiedKFold::new(folds);
    if let Some(seed) = random_seed {
        kfold = kfold.with_seed(seed);
    }
    let plan = kfold.split(y)?;

    log::debug!(
        "precomputed stratified split plan: {} folds over {} rows",
        plan.len(),
        y.len()
    );

    ctx.split_plan = Some(Arc::new(plan));
    Ok(true)
}

/// Validate that a plan only references rows that exist in `x`.
pub(crate) fn check_plan_bounds(x: &[Vec<f64>], plan: &SplitPlan) -> Result<()> {
    if let Some(max) = plan.max_index() {
        if max >= x.len() {
            return Err(Error::IndexOutOfBounds {
                index: max,
                size: x.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model_selection::Fold;

    fn target(n_per_class: usize) -> Vec<f64> {
        let mut y = vec![0.0; n_per_class];
        y.extend(vec![1.0; n_per_class]);
        y
    }

    #[test]
    fn test_precompute_builds_plan() {
        let y = target(10);
        let mut ctx = PrecomputeContext::new();

        let built = precompute_split_plan(&mut ctx, &y, 5, Some(0)).unwrap();
        assert!(built);
        assert_eq!(ctx.split_plan().unwrap().len(), 5);
    }

    #[test]
    fn test_precompute_is_noop_when_plan_present() {
        let y = target(10);
        let mut ctx = PrecomputeContext::new();
        precompute_split_plan(&mut ctx, &y, 5, Some(0)).unwrap();
        let before = ctx.split_plan_handle().unwrap();

        // Different parameters must not replace the stored plan.
        let built = precompute_split_plan(&mut ctx, &y, 2, Some(99)).unwrap();
        assert!(!built);
        assert!(Arc::ptr_eq(&before, &ctx.split_plan_handle().unwrap()));
    }

    #[test]
    fn test_precompute_accepts_supplied_plan() {
        let plan = StratifiedKFold::new(2).split(&target(4)).unwrap();
        let mut ctx = PrecomputeContext::with_split_plan(plan);

        let built = precompute_split_plan(&mut ctx, &target(4), 2, None).unwrap();
        assert!(!built);
    }

    #[test]
    fn test_precompute_surfaces_bad_fold_count() {
        let y = vec![0.0, 0.0, 0.0, 1.0];
        let mut ctx = PrecomputeContext::new();

        // Smallest class has one member, 3 folds cannot be stratified.
        assert!(precompute_split_plan(&mut ctx, &y, 3, None).is_err());
        assert!(ctx.split_plan().is_none());
    }

    #[test]
    fn test_check_plan_bounds() {
        let x = vec![vec![0.0], vec![1.0]];
        let plan = SplitPlan::from_folds(vec![Fold {
            train: vec![0],
            test: vec![5],
        }])
        .unwrap();

        assert!(check_plan_bounds(&x, &plan).is_err());
    }
}
