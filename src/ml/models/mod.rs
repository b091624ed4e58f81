//! Probe classifier models.
//!
//! Deliberately small, mostly weak learners: their cross-validated accuracy is
//! the meta-feature, acting as a cheap proxy for the separability and noise
//! characteristics of a dataset. Models are fit on one fold, used for one
//! prediction pass and discarded.

pub mod discriminant;
pub mod naive_bayes;
pub mod neighbors;
pub mod tree;

pub use discriminant::LinearDiscriminantAnalysis;
pub use naive_bayes::{GaussianNb, GaussianNbConfig};
pub use neighbors::KNeighborsClassifier;
pub use tree::{DecisionTreeClassifier, DecisionTreeConfig, DecisionTreeConfigBuilder, SplitCriterion};

use crate::error::{Error, Result};

/// Trait shared by all probe classifiers.
///
/// `x` is a row-major attribute matrix; `y` holds discrete class labels
/// encoded as `f64` and compared exactly.
pub trait Classifier {
    /// Fit the model on training data.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict a class label for every row of `x`.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Validate the shape of a training set before fitting.
pub(crate) fn check_fit_input(x: &[Vec<f64>], y: &[f64]) -> Result<()> {
    if x.is_empty() {
        return Err(Error::EmptyData(
            "cannot fit on an empty attribute matrix".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }

    let n_features = x[0].len();
    if n_features == 0 {
        return Err(Error::EmptyData(
            "attribute matrix has no columns".to_string(),
        ));
    }
    if let Some(row) = x.iter().find(|row| row.len() != n_features) {
        return Err(Error::DimensionMismatch(format!(
            "ragged attribute matrix: expected {} columns, found a row with {}",
            n_features,
            row.len()
        )));
    }

    Ok(())
}

/// Distinct class labels in first-seen order, with the per-class row counts.
pub(crate) fn class_counts(y: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut classes: Vec<f64> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for &label in y {
        match classes.iter().position(|&c| c == label) {
            Some(idx) => counts[idx] += 1,
            None => {
                classes.push(label);
                counts.push(1);
            }
        }
    }
    (classes, counts)
}
