//! Explicit probe registry.
//!
//! Maps meta-feature names to probe functions, with the argument metadata
//! declared alongside each entry instead of being inferred from naming
//! conventions. Orchestrators look probes up by name and run them against a
//! shared split plan.

use crate::error::{Error, Result};
use crate::landmarking::probes::{
    best_node, elite_nn, linear_discr, naive_bayes, one_nn, random_node, worst_node,
    BestNodeConfig, EliteNnConfig, RandomNodeConfig, WorstNodeConfig,
};
use crate::ml::model_selection::SplitPlan;
use lazy_static::lazy_static;

/// Scoring function contract: maps (true labels, predicted labels) to a score.
pub type ScoreFn = fn(&[f64], &[f64]) -> Result<f64>;

/// Uniform probe entry point used by the registry.
pub type ProbeFn = fn(&[Vec<f64>], &[f64], &SplitPlan, ScoreFn, Option<u64>) -> Result<Vec<f64>>;

/// One registered probe, with its argument metadata.
#[derive(Clone)]
pub struct ProbeSpec {
    /// Meta-feature name
    pub name: &'static str,
    /// One-line description of what the probe measures
    pub summary: &'static str,
    /// Whether the probe consumes the optional seed argument
    pub uses_seed: bool,
    run: ProbeFn,
}

impl ProbeSpec {
    /// Run the probe against the shared split plan.
    pub fn run(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        plan: &SplitPlan,
        score: ScoreFn,
        random_seed: Option<u64>,
    ) -> Result<Vec<f64>> {
        (self.run)(x, y, plan, score, random_seed)
    }
}

impl std::fmt::Debug for ProbeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeSpec")
            .field("name", &self.name)
            .field("uses_seed", &self.uses_seed)
            .finish()
    }
}

fn run_best_node(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    best_node(x, y, plan, score, &BestNodeConfig { random_seed })
}

fn run_random_node(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    random_node(x, y, plan, score, &RandomNodeConfig { random_seed })
}

fn run_worst_node(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    worst_node(x, y, plan, score, &WorstNodeConfig { random_seed })
}

fn run_linear_discr(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    _random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    linear_discr(x, y, plan, score)
}

fn run_naive_bayes(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    _random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    naive_bayes(x, y, plan, score)
}

fn run_one_nn(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    _random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    one_nn(x, y, plan, score)
}

fn run_elite_nn(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: ScoreFn,
    random_seed: Option<u64>,
) -> Result<Vec<f64>> {
    elite_nn(x, y, plan, score, &EliteNnConfig { random_seed })
}

/// Ordered registry of the landmarking probes.
#[derive(Debug, Clone)]
pub struct ProbeRegistry {
    entries: Vec<ProbeSpec>,
}

impl ProbeRegistry {
    /// Build the registry holding all seven landmarking probes.
    pub fn with_defaults() -> Self {
        ProbeRegistry {
            entries: vec![
                ProbeSpec {
                    name: "best_node",
                    summary: "depth-1 tree on the single best split over all attributes",
                    uses_seed: true,
                    run: run_best_node,
                },
                ProbeSpec {
                    name: "random_node",
                    summary: "depth-1 tree on one uniformly random attribute per fold",
                    uses_seed: true,
                    run: run_random_node,
                },
                ProbeSpec {
                    name: "worst_node",
                    summary: "depth-1 tree on the least important attribute per fold",
                    uses_seed: true,
                    run: run_worst_node,
                },
                ProbeSpec {
                    name: "linear_discr",
                    summary: "linear discriminant classifier over all attributes",
                    uses_seed: false,
                    run: run_linear_discr,
                },
                ProbeSpec {
                    name: "naive_bayes",
                    summary: "Gaussian naive Bayes classifier over all attributes",
                    uses_seed: false,
                    run: run_naive_bayes,
                },
                ProbeSpec {
                    name: "one_nn",
                    summary: "1-nearest-neighbor classifier over all attributes",
                    uses_seed: false,
                    run: run_one_nn,
                },
                ProbeSpec {
                    name: "elite_nn",
                    summary: "1-nearest-neighbor on the most important attribute per fold",
                    uses_seed: true,
                    run: run_elite_nn,
                },
            ],
        }
    }

    /// Look a probe up by meta-feature name.
    pub fn get(&self, name: &str) -> Option<&ProbeSpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    /// Registered meta-feature names, in registry order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|spec| spec.name).collect()
    }

    /// Iterate the registered probes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProbeSpec> {
        self.entries.iter()
    }

    /// Run one probe by name.
    pub fn run(
        &self,
        name: &str,
        x: &[Vec<f64>],
        y: &[f64],
        plan: &SplitPlan,
        score: ScoreFn,
        random_seed: Option<u64>,
    ) -> Result<Vec<f64>> {
        let spec = self
            .get(name)
            .ok_or_else(|| Error::KeyNotFound(name.to_string()))?;
        log::debug!("running landmarking probe '{}'", name);
        spec.run(x, y, plan, score, random_seed)
    }
}

impl Default for ProbeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

lazy_static! {
    static ref DEFAULT_REGISTRY: ProbeRegistry = ProbeRegistry::with_defaults();
}

/// Process-wide registry holding the seven default probes.
pub fn default_registry() -> &'static ProbeRegistry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::metrics::accuracy_score;
    use crate::ml::model_selection::StratifiedKFold;

    fn dataset() -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..16 {
            let class = if i < 8 { 0.0 } else { 1.0 };
            x.push(vec![class * 5.0 + (i % 4) as f64, (i % 3) as f64]);
            y.push(class);
        }
        (x, y)
    }

    #[test]
    fn test_registry_holds_all_probes() {
        let registry = ProbeRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec![
                "best_node",
                "random_node",
                "worst_node",
                "linear_discr",
                "naive_bayes",
                "one_nn",
                "elite_nn"
            ]
        );
    }

    #[test]
    fn test_registry_metadata() {
        let registry = ProbeRegistry::with_defaults();
        assert!(registry.get("random_node").unwrap().uses_seed);
        assert!(!registry.get("one_nn").unwrap().uses_seed);
    }

    #[test]
    fn test_registry_runs_every_probe() {
        let (x, y) = dataset();
        let plan = StratifiedKFold::new(4).with_seed(0).split(&y).unwrap();
        let registry = ProbeRegistry::with_defaults();

        for name in registry.names() {
            let scores = registry
                .run(name, &x, &y, &plan, accuracy_score, Some(0))
                .unwrap();
            assert_eq!(scores.len(), 4, "probe {} returned a short vector", name);
            assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn test_unknown_probe_name() {
        let (x, y) = dataset();
        let plan = StratifiedKFold::new(4).split(&y).unwrap();
        let registry = ProbeRegistry::with_defaults();

        let result = registry.run("no_such_probe", &x, &y, &plan, accuracy_score, None);
        assert!(matches!(result, Err(Error::KeyNotFound(_))));
    }

    #[test]
    fn test_default_registry_is_shared() {
        assert_eq!(default_registry().names().len(), 7);
    }
}
