//! Decision tree classifier.
//!
//! CART-style classifier over a row-major `f64` attribute matrix. With
//! `max_depth = 1` it degenerates to a decision stump (a single best split),
//! which is exactly the weak learner the node-based landmarking probes need.
//! An unconstrained tree additionally reports per-column impurity-reduction
//! importances, used for attribute ranking.

use crate::error::{Error, Result};
use crate::ml::models::{check_fit_input, class_counts, Classifier};
use serde::{Deserialize, Serialize};

/// Criterion for splitting nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitCriterion {
    /// Gini impurity
    #[default]
    Gini,
    /// Entropy / information gain
    Entropy,
}

/// Configuration for the decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeConfig {
    /// Maximum depth of the tree (None = no limit)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples required at a leaf node
    pub min_samples_leaf: usize,
    /// Splitting criterion
    pub criterion: SplitCriterion,
    /// Reproducibility seed. The exhaustive split search is deterministic on
    /// its own; the seed is carried so randomized callers can thread one
    /// through uniformly.
    pub random_seed: Option<u64>,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        DecisionTreeConfig {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: SplitCriterion::Gini,
            random_seed: None,
        }
    }
}

/// Builder for DecisionTreeConfig
#[derive(Debug, Default)]
pub struct DecisionTreeConfigBuilder {
    config: DecisionTreeConfig,
}

impl DecisionTreeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    pub fn min_samples_split(mut self, samples: usize) -> Self {
        self.config.min_samples_split = samples;
        self
    }

    pub fn min_samples_leaf(mut self, samples: usize) -> Self {
        self.config.min_samples_leaf = samples;
        self
    }

    pub fn criterion(mut self, criterion: SplitCriterion) -> Self {
        self.config.criterion = criterion;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = Some(seed);
        self
    }

    pub fn build(self) -> DecisionTreeConfig {
        self.config
    }
}

/// A node in the flat tree arena
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeNode {
    /// Column index used for splitting (split nodes only)
    feature_index: Option<usize>,
    /// Threshold for the split (split nodes only)
    threshold: Option<f64>,
    /// Majority-class prediction at this node
    prediction: f64,
    /// Class probabilities at this node
    class_probs: Vec<f64>,
    left_child: Option<usize>,
    right_child: Option<usize>,
    n_samples: usize,
    impurity: f64,
    depth: usize,
    is_leaf: bool,
}

/// Decision tree classifier
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier {
    config: DecisionTreeConfig,
    nodes: Vec<TreeNode>,
    classes: Vec<f64>,
    n_features: usize,
    feature_importances_: Option<Vec<f64>>,
    is_fitted: bool,
}

impl DecisionTreeClassifier {
    /// Create a new decision tree classifier
    pub fn new(config: DecisionTreeConfig) -> Self {
        DecisionTreeClassifier {
            config,
            nodes: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
            feature_importances_: None,
            is_fitted: false,
        }
    }

    /// Create with default configuration
    pub fn default_config() -> Self {
        Self::new(DecisionTreeConfig::default())
    }

    /// Create a depth-1 stump, the weak learner used by the node probes
    pub fn stump(random_seed: Option<u64>) -> Self {
        Self::new(DecisionTreeConfig {
            max_depth: Some(1),
            random_seed,
            ..Default::default()
        })
    }

    /// Class labels seen during fit, in first-seen order
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Depth of the fitted tree
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Number of leaf nodes
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf).count()
    }

    /// Normalized impurity-reduction importance per column index
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances_.as_deref()
    }

    fn gini_impurity(counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let total_f = total as f64;
        1.0 - counts
            .iter()
            .map(|&c| (c as f64 / total_f).powi(2))
            .sum::<f64>()
    }

    fn entropy(counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let total_f = total as f64;
        -counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total_f;
                p * p.ln()
            })
            .sum::<f64>()
    }

    fn impurity(&self, counts: &[usize], total: usize) -> f64 {
        match self.config.criterion {
            SplitCriterion::Gini => Self::gini_impurity(counts, total),
            SplitCriterion::Entropy => Self::entropy(counts, total),
        }
    }

    fn count_classes(&self, y: &[f64], indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.classes.len()];
        for &idx in indices {
            if let Some(class_idx) = self.classes.iter().position(|&c| c == y[idx]) {
                counts[class_idx] += 1;
            }
        }
        counts
    }

    /// Exhaustive best-split search over all columns.
    #[allow(clippy::type_complexity)]
    fn find_best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
        if indices.len() < self.config.min_samples_split {
            return None;
        }

        let counts = self.count_classes(y, indices);
        let current_impurity = self.impurity(&counts, indices.len());

        let mut best_gain = 0.0;
        let mut best_split: Option<(usize, f64, Vec<usize>, Vec<usize>)> = None;

        for feature_idx in 0..self.n_features {
            let mut values: Vec<f64> = indices
                .iter()
                .map(|&idx| x[idx][feature_idx])
                .filter(|v| v.is_finite())
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;

                let mut left = Vec::new();
                let mut right = Vec::new();
                let mut left_counts = vec![0usize; self.classes.len()];
                let mut right_counts = vec![0usize; self.classes.len()];

                for &idx in indices {
                    let class_idx = self
                        .classes
                        .iter()
                        .position(|&c| c == y[idx])
                        .unwrap_or(0);
                    if x[idx][feature_idx] <= threshold {
                        left.push(idx);
                        left_counts[class_idx] += 1;
                    } else {
                        right.push(idx);
                        right_counts[class_idx] += 1;
                    }
                }

                if left.len() < self.config.min_samples_leaf
                    || right.len() < self.config.min_samples_leaf
                {
                    continue;
                }

                let n = indices.len() as f64;
                let weighted = (left.len() as f64 * self.impurity(&left_counts, left.len())
                    + right.len() as f64 * self.impurity(&right_counts, right.len()))
                    / n;
                let gain = current_impurity - weighted;

                if gain > best_gain {
                    best_gain = gain;
                    best_split = Some((feature_idx, threshold, left, right));
                }
            }
        }

        best_split
    }

    fn build_tree(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: Vec<usize>,
        depth: usize,
    ) -> usize {
        let counts = self.count_classes(y, &indices);
        let total = indices.len();
        let impurity = self.impurity(&counts, total);

        let max_idx = counts
            .iter()
            .enumerate()
            .max_by_key(|(_, &c)| c)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let prediction = self.classes[max_idx];
        let class_probs: Vec<f64> = counts.iter().map(|&c| c as f64 / total as f64).collect();

        let depth_reached = self.config.max_depth.map(|d| depth >= d).unwrap_or(false);
        let is_pure = counts.iter().filter(|&&c| c > 0).count() <= 1;

        let split = if depth_reached || total < self.config.min_samples_split || is_pure {
            None
        } else {
            self.find_best_split(x, y, &indices)
        };

        let node_idx = self.nodes.len();
        match split {
            Some((feature_idx, threshold, left_indices, right_indices)) => {
                self.nodes.push(TreeNode {
                    feature_index: Some(feature_idx),
                    threshold: Some(threshold),
                    prediction,
                    class_probs,
                    left_child: None,
                    right_child: None,
                    n_samples: total,
                    impurity,
                    depth,
                    is_leaf: false,
                });

                let left = self.build_tree(x, y, left_indices, depth + 1);
                let right = self.build_tree(x, y, right_indices, depth + 1);
                self.nodes[node_idx].left_child = Some(left);
                self.nodes[node_idx].right_child = Some(right);
            }
            None => {
                self.nodes.push(TreeNode {
                    feature_index: None,
                    threshold: None,
                    prediction,
                    class_probs,
                    left_child: None,
                    right_child: None,
                    n_samples: total,
                    impurity,
                    depth,
                    is_leaf: true,
                });
            }
        }

        node_idx
    }

    fn compute_feature_importances(&mut self) {
        let mut importances = vec![0.0f64; self.n_features];
        let total_samples = self.nodes.first().map(|n| n.n_samples).unwrap_or(1) as f64;

        for node in &self.nodes {
            if node.is_leaf {
                continue;
            }
            if let (Some(feature_idx), Some(left_idx), Some(right_idx)) =
                (node.feature_index, node.left_child, node.right_child)
            {
                let left = &self.nodes[left_idx];
                let right = &self.nodes[right_idx];

                let decrease = (node.n_samples as f64 / total_samples)
                    * (node.impurity
                        - (left.n_samples as f64 / node.n_samples as f64) * left.impurity
                        - (right.n_samples as f64 / node.n_samples as f64) * right.impurity);

                importances[feature_idx] += decrease;
            }
        }

        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            for imp in &mut importances {
                *imp /= sum;
            }
        }

        self.feature_importances_ = Some(importances);
    }

    /// Class probabilities for a single row
    fn predict_proba_single(&self, sample: &[f64]) -> Option<&[f64]> {
        let mut node_idx = 0;
        loop {
            let node = self.nodes.get(node_idx)?;
            if node.is_leaf {
                return Some(&node.class_probs);
            }
            let feature_idx = node.feature_index?;
            let threshold = node.threshold?;
            node_idx = if sample[feature_idx] <= threshold {
                node.left_child?
            } else {
                node.right_child?
            };
        }
    }

    /// Class probabilities for every row of `x`
    pub fn predict_proba(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if !self.is_fitted {
            return Err(Error::InvalidOperation("Model not fitted".to_string()));
        }

        x.iter()
            .map(|sample| {
                if sample.len() != self.n_features {
                    return Err(Error::DimensionMismatch(format!(
                        "expected {} columns, got {}",
                        self.n_features,
                        sample.len()
                    )));
                }
                Ok(self
                    .predict_proba_single(sample)
                    .map(|probs| probs.to_vec())
                    .unwrap_or_else(|| {
                        vec![1.0 / self.classes.len() as f64; self.classes.len()]
                    }))
            })
            .collect()
    }
}

impl Classifier for DecisionTreeClassifier {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        let (classes, _) = class_counts(y);
        self.classes = classes;
        self.n_features = x[0].len();

        let indices: Vec<usize> = (0..x.len()).collect();
        self.nodes.clear();
        self.build_tree(x, y, indices, 0);

        self.compute_feature_importances();
        self.is_fitted = true;

        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let probs = self.predict_proba(x)?;

        Ok(probs
            .iter()
            .map(|row| {
                let max_idx = row
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| {
                        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                self.classes.get(max_idx).copied().unwrap_or(0.0)
            })
            .collect())
    }
}
