//! The seven landmarking probe algorithms.
//!
//! Every probe shares the same shape: iterate the split plan's folds in order,
//! gather the probe's training and test rows (and column subset), fit a fresh
//! model, predict on the held-out rows and push `score(y_test, pred)`. Any
//! fold failure fails the whole probe; there is no partial result and no
//! default score. Models never survive a fold iteration.

use crate::error::{Error, Result};
use crate::landmarking::check_plan_bounds;
use crate::ml::model_selection::SplitPlan;
use crate::ml::models::{
    Classifier, DecisionTreeClassifier, DecisionTreeConfig, GaussianNb, KNeighborsClassifier,
    LinearDiscriminantAnalysis,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration for the `best_node` probe.
///
/// `random_seed` seeds the per-fold decision stump; `None` (the default)
/// leaves the stump unseeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestNodeConfig {
    pub random_seed: Option<u64>,
}

/// Configuration for the `random_node` probe.
///
/// `random_seed` seeds both the per-fold column draw and the stump, so one
/// seed determines the probe's whole output vector. `None` (the default)
/// draws columns from OS entropy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomNodeConfig {
    pub random_seed: Option<u64>,
}

/// Configuration for the `worst_node` probe.
///
/// `random_seed` seeds the importance-ranking tree and the stump. Default
/// `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorstNodeConfig {
    pub random_seed: Option<u64>,
}

/// Configuration for the `elite_nn` probe.
///
/// `random_seed` seeds the importance-ranking tree. Default `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EliteNnConfig {
    pub random_seed: Option<u64>,
}

fn check_probe_input(x: &[Vec<f64>], y: &[f64], plan: &SplitPlan) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    if let Some(first) = x.first() {
        if let Some(row) = x.iter().find(|row| row.len() != first.len()) {
            return Err(Error::DimensionMismatch(format!(
                "ragged attribute matrix: expected {} columns, found a row with {}",
                first.len(),
                row.len()
            )));
        }
    }
    check_plan_bounds(x, plan)
}

fn gather_rows(x: &[Vec<f64>], indices: &[usize]) -> Vec<Vec<f64>> {
    indices.iter().map(|&idx| x[idx].clone()).collect()
}

fn gather_labels(y: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&idx| y[idx]).collect()
}

/// Gather rows reduced to a single column.
fn gather_column(x: &[Vec<f64>], indices: &[usize], column: usize) -> Vec<Vec<f64>> {
    indices.iter().map(|&idx| vec![x[idx][column]]).collect()
}

/// Rank the attribute columns of a training subset by decision-tree
/// importance, ascending.
///
/// Fits one unconstrained tree and argsorts its impurity-reduction
/// importances: position 0 is the least important column, the last position
/// the most important. The sort is stable, so equal importances keep their
/// column order and the ranking is deterministic for identical inputs and
/// seed. Internal helper for [`worst_node`] and [`elite_nn`]; the ranking
/// itself is not a meta-feature.
pub fn attribute_importance_order(
    x: &[Vec<f64>],
    y: &[f64],
    random_seed: Option<u64>,
) -> Result<Vec<usize>> {
    let mut tree = DecisionTreeClassifier::new(DecisionTreeConfig {
        random_seed,
        ..Default::default()
    });
    tree.fit(x, y)?;

    let importances = tree
        .feature_importances()
        .ok_or_else(|| Error::InvalidOperation("fitted tree reported no importances".to_string()))?
        .to_vec();

    let mut order: Vec<usize> = (0..importances.len()).collect();
    order.sort_by(|&a, &b| {
        importances[a]
            .partial_cmp(&importances[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(order)
}

/// Performance of a depth-1 decision tree built on the single best split over
/// all attributes, per fold.
pub fn best_node<F>(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: F,
    config: &BestNodeConfig,
) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let mut model = DecisionTreeClassifier::stump(config.random_seed);
        let x_train = gather_rows(x, &fold.train);
        let x_test = gather_rows(x, &fold.test);
        let y_train = gather_labels(y, &fold.train);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

/// Performance of a depth-1 decision tree restricted to one uniformly random
/// attribute per fold.
///
/// The column draw comes from a `StdRng` created once at probe start from
/// `config.random_seed`, so a single seed reproduces the entire output vector.
pub fn random_node<F>(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: F,
    config: &RandomNodeConfig,
) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;
    if x.is_empty() || x[0].is_empty() {
        return Err(Error::EmptyData(
            "attribute matrix has no columns".to_string(),
        ));
    }

    let n_features = x[0].len();
    let mut rng = match config.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let attr = rng.random_range(0..n_features);
        let mut model = DecisionTreeClassifier::stump(config.random_seed);
        let x_train = gather_column(x, &fold.train, attr);
        let x_test = gather_column(x, &fold.test, attr);
        let y_train = gather_labels(y, &fold.train);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

/// Performance of a depth-1 decision tree restricted to the least important
/// attribute, per fold.
///
/// The attribute ranking is recomputed on each fold's training subset.
pub fn worst_node<F>(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: F,
    config: &WorstNodeConfig,
) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let x_train_full = gather_rows(x, &fold.train);
        let y_train = gather_labels(y, &fold.train);
        let ranking = attribute_importance_order(&x_train_full, &y_train, config.random_seed)?;
        let attr = ranking[0];

        let mut model = DecisionTreeClassifier::stump(config.random_seed);
        let x_train = gather_column(x, &fold.train, attr);
        let x_test = gather_column(x, &fold.test, attr);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

/// Performance of the linear discriminant classifier over all attributes, per
/// fold. The discriminant draws a linear, non-axis-parallel split through the
/// data, probing linear separability.
pub fn linear_discr<F>(x: &[Vec<f64>], y: &[f64], plan: &SplitPlan, score: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let mut model = LinearDiscriminantAnalysis::new();
        let x_train = gather_rows(x, &fold.train);
        let x_test = gather_rows(x, &fold.test);
        let y_train = gather_labels(y, &fold.train);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

/// Performance of the Gaussian naive Bayes classifier, per fold.
pub fn naive_bayes<F>(x: &[Vec<f64>], y: &[f64], plan: &SplitPlan, score: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let mut model = GaussianNb::default_config();
        let x_train = gather_rows(x, &fold.train);
        let x_test = gather_rows(x, &fold.test);
        let y_train = gather_labels(y, &fold.train);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

/// Performance of the 1-nearest-neighbor classifier over all attributes, per
/// fold.
pub fn one_nn<F>(x: &[Vec<f64>], y: &[f64], plan: &SplitPlan, score: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let mut model = KNeighborsClassifier::one_nn();
        let x_train = gather_rows(x, &fold.train);
        let x_test = gather_rows(x, &fold.test);
        let y_train = gather_labels(y, &fold.train);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

/// Performance of the 1-nearest-neighbor classifier restricted to the most
/// important attribute, per fold.
///
/// The attribute ranking is recomputed on each fold's training subset.
pub fn elite_nn<F>(
    x: &[Vec<f64>],
    y: &[f64],
    plan: &SplitPlan,
    score: F,
    config: &EliteNnConfig,
) -> Result<Vec<f64>>
where
    F: Fn(&[f64], &[f64]) -> Result<f64>,
{
    check_probe_input(x, y, plan)?;

    let mut result = Vec::with_capacity(plan.len());
    for fold in plan.iter() {
        let x_train_full = gather_rows(x, &fold.train);
        let y_train = gather_labels(y, &fold.train);
        let ranking = attribute_importance_order(&x_train_full, &y_train, config.random_seed)?;
        let attr = *ranking.last().ok_or_else(|| {
            Error::EmptyData("attribute matrix has no columns".to_string())
        })?;

        let mut model = KNeighborsClassifier::one_nn();
        let x_train = gather_column(x, &fold.train, attr);
        let x_test = gather_column(x, &fold.test, attr);
        let y_test = gather_labels(y, &fold.test);

        model.fit(&x_train, &y_train)?;
        let pred = model.predict(&x_test)?;
        result.push(score(&y_test, &pred)?);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::metrics::accuracy_score;
    use crate::ml::model_selection::StratifiedKFold;

    /// Two classes, one informative column and one constant noise column.
    fn informative_and_noise() -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let class = if i < 10 { 0.0 } else { 1.0 };
            x.push(vec![class * 10.0 + (i % 5) as f64 * 0.1, 3.0]);
            y.push(class);
        }
        (x, y)
    }

    #[test]
    fn test_importance_ranks_informative_column_last() {
        let (x, y) = informative_and_noise();
        let order = attribute_importance_order(&x, &y, Some(0)).unwrap();

        assert_eq!(order.len(), 2);
        // Column 0 separates the classes, column 1 is constant.
        assert_eq!(*order.last().unwrap(), 0);
        assert_eq!(order[0], 1);
    }

    #[test]
    fn test_worst_and_elite_pick_different_columns() {
        let (x, y) = informative_and_noise();
        let order = attribute_importance_order(&x, &y, Some(0)).unwrap();
        assert_ne!(order[0], *order.last().unwrap());
    }

    #[test]
    fn test_probe_output_length_matches_fold_count() {
        let (x, y) = informative_and_noise();
        let plan = StratifiedKFold::new(5).with_seed(0).split(&y).unwrap();

        let cfg = BestNodeConfig::default();
        assert_eq!(best_node(&x, &y, &plan, accuracy_score, &cfg).unwrap().len(), 5);
        assert_eq!(one_nn(&x, &y, &plan, accuracy_score).unwrap().len(), 5);
        assert_eq!(naive_bayes(&x, &y, &plan, accuracy_score).unwrap().len(), 5);
    }

    #[test]
    fn test_best_node_separable_data_scores_high() {
        let (x, y) = informative_and_noise();
        let plan = StratifiedKFold::new(5).with_seed(0).split(&y).unwrap();

        let scores =
            best_node(&x, &y, &plan, accuracy_score, &BestNodeConfig::default()).unwrap();
        assert!(scores.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_random_node_deterministic_with_seed() {
        let (x, y) = informative_and_noise();
        let plan = StratifiedKFold::new(4).with_seed(1).split(&y).unwrap();

        let cfg = RandomNodeConfig {
            random_seed: Some(7),
        };
        let a = random_node(&x, &y, &plan, accuracy_score, &cfg).unwrap();
        let b = random_node(&x, &y, &plan, accuracy_score, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_probe_rejects_mismatched_labels() {
        let (x, y) = informative_and_noise();
        let plan = StratifiedKFold::new(4).split(&y).unwrap();

        let short = &y[..y.len() - 1];
        assert!(one_nn(&x, short, &plan, accuracy_score).is_err());
    }

    #[test]
    fn test_probe_rejects_out_of_bounds_plan() {
        let (x, y) = informative_and_noise();
        let plan = StratifiedKFold::new(4).split(&y).unwrap();

        // A plan for 20 rows applied to a 10-row matrix.
        let x_short = &x[..10];
        let y_short = &y[..10];
        assert!(one_nn(x_short, y_short, &plan, accuracy_score).is_err());
    }

    #[test]
    fn test_scoring_error_propagates() {
        let (x, y) = informative_and_noise();
        let plan = StratifiedKFold::new(4).split(&y).unwrap();

        let failing = |_: &[f64], _: &[f64]| -> crate::error::Result<f64> {
            Err(Error::InvalidValue("broken scorer".to_string()))
        };
        assert!(one_nn(&x, &y, &plan, failing).is_err());
    }
}
