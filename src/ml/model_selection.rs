//! Cross-validation split plans.
//!
//! A [`SplitPlan`] is the concrete, immutable set of train/test row-index
//! partitions for one extraction run. It is built once by
//! [`StratifiedKFold::split`] and shared read-only by every landmarking probe,
//! so all probes score against exactly the same folds.

use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// One train/test partition of the row indices.
///
/// Both index sets are in ascending order; `train` is always the complement of
/// `test` within the full index range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    /// Row indices used for fitting
    pub train: Vec<usize>,
    /// Row indices held out for scoring
    pub test: Vec<usize>,
}

/// Ordered sequence of folds for one extraction run. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    folds: Vec<Fold>,
}

impl SplitPlan {
    /// Build a plan from caller-supplied folds, e.g. one reused from a
    /// previous computation.
    pub fn from_folds(folds: Vec<Fold>) -> Result<Self> {
        if folds.is_empty() {
            return Err(Error::EmptyData(
                "a split plan needs at least one fold".to_string(),
            ));
        }
        for fold in &folds {
            if fold.train.is_empty() || fold.test.is_empty() {
                return Err(Error::InvalidValue(
                    "every fold needs non-empty train and test index sets".to_string(),
                ));
            }
        }
        Ok(SplitPlan { folds })
    }

    /// Number of folds in the plan.
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    /// Iterate the folds in plan order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fold> {
        self.folds.iter()
    }

    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    /// Largest row index referenced by any fold, if the plan is non-empty.
    pub(crate) fn max_index(&self) -> Option<usize> {
        self.folds
            .iter()
            .flat_map(|f| f.train.iter().chain(f.test.iter()))
            .max()
            .copied()
    }
}

/// Stratified K-Folds cross-validator.
///
/// Partitions row indices into `n_splits` folds such that each test set keeps
/// approximately the class proportions of the full target vector. Given a seed,
/// the produced plan is fully deterministic; without one, class members are
/// kept in dataset order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratifiedKFold {
    n_splits: usize,
    random_seed: Option<u64>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        StratifiedKFold {
            n_splits,
            random_seed: None,
        }
    }

    /// Set the seed used to shuffle class members before dealing them into
    /// folds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Produce the split plan for the given target vector.
    ///
    /// Fails when `n_splits` is below 2 or exceeds the size of the smallest
    /// class, since a class smaller than the fold count cannot appear in every
    /// test set.
    pub fn split(&self, y: &[f64]) -> Result<SplitPlan> {
        if self.n_splits < 2 {
            return Err(Error::InvalidValue(format!(
                "number of splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if y.is_empty() {
            return Err(Error::EmptyData(
                "cannot split an empty target vector".to_string(),
            ));
        }

        // Group row indices per class, preserving dataset order.
        let mut classes: Vec<f64> = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        for (idx, &label) in y.iter().enumerate() {
            match classes.iter().position(|&c| c == label) {
                Some(class_idx) => members[class_idx].push(idx),
                None => {
                    classes.push(label);
                    members.push(vec![idx]);
                }
            }
        }

        let smallest = members.iter().map(|m| m.len()).min().unwrap_or(0);
        if self.n_splits > smallest {
            return Err(Error::InsufficientData(format!(
                "number of splits {} exceeds the smallest class size {}",
                self.n_splits, smallest
            )));
        }

        if let Some(seed) = self.random_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            for class_members in &mut members {
                class_members.shuffle(&mut rng);
            }
        }

        // Deal each class into folds: the first `n % k` folds get one extra.
        let mut test_sets: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];
        for class_members in &members {
            let base = class_members.len() / self.n_splits;
            let extra = class_members.len() % self.n_splits;
            let mut cursor = 0;
            for (fold_idx, test_set) in test_sets.iter_mut().enumerate() {
                let take = base + usize::from(fold_idx < extra);
                test_set.extend_from_slice(&class_members[cursor..cursor + take]);
                cursor += take;
            }
        }

        let n_rows = y.len();
        let mut folds = Vec::with_capacity(self.n_splits);
        for mut test in test_sets {
            test.sort_unstable();
            let mut in_test = vec![false; n_rows];
            for &idx in &test {
                in_test[idx] = true;
            }
            let train: Vec<usize> = (0..n_rows).filter(|&idx| !in_test[idx]).collect();
            folds.push(Fold { train, test });
        }

        SplitPlan::from_folds(folds)
    }
}
