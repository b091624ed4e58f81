//! Gaussian naive Bayes classifier.
//!
//! Assumes conditional independence of the attributes given the class and a
//! Gaussian likelihood per attribute. Fitting a training set with fewer than
//! two classes is an error: a degenerate cross-validation fold must surface to
//! the caller instead of yielding a default score.

use crate::error::{Error, Result};
use crate::ml::models::{check_fit_input, class_counts, Classifier};
use serde::{Deserialize, Serialize};

/// Configuration for Gaussian naive Bayes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianNbConfig {
    /// Portion of the largest feature variance added to every variance for
    /// numerical stability
    pub var_smoothing: f64,
}

impl Default for GaussianNbConfig {
    fn default() -> Self {
        GaussianNbConfig {
            var_smoothing: 1e-9,
        }
    }
}

/// Gaussian naive Bayes classifier
#[derive(Debug, Clone)]
pub struct GaussianNb {
    config: GaussianNbConfig,
    classes: Vec<f64>,
    /// Log prior per class
    log_priors: Vec<f64>,
    /// Per class, per feature mean
    means: Vec<Vec<f64>>,
    /// Per class, per feature variance (smoothed)
    variances: Vec<Vec<f64>>,
    is_fitted: bool,
}

impl GaussianNb {
    pub fn new(config: GaussianNbConfig) -> Self {
        GaussianNb {
            config,
            classes: Vec::new(),
            log_priors: Vec::new(),
            means: Vec::new(),
            variances: Vec::new(),
            is_fitted: false,
        }
    }

    /// Create with default configuration
    pub fn default_config() -> Self {
        Self::new(GaussianNbConfig::default())
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Joint log likelihood of one row under one class
    fn joint_log_likelihood(&self, sample: &[f64], class_idx: usize) -> f64 {
        let mut ll = self.log_priors[class_idx];
        for (feature_idx, &value) in sample.iter().enumerate() {
            let mean = self.means[class_idx][feature_idx];
            let var = self.variances[class_idx][feature_idx];
            ll += -0.5 * (2.0 * std::f64::consts::PI * var).ln()
                - (value - mean).powi(2) / (2.0 * var);
        }
        ll
    }
}

impl Classifier for GaussianNb {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        let (classes, counts) = class_counts(y);
        if classes.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "Gaussian naive Bayes needs at least 2 classes in the training set, got {}",
                classes.len()
            )));
        }

        let n_samples = x.len();
        let n_features = x[0].len();

        // Largest per-feature variance over the whole training set, used to
        // scale the smoothing term.
        let mut global_max_var = 0.0f64;
        for feature_idx in 0..n_features {
            let mean =
                x.iter().map(|row| row[feature_idx]).sum::<f64>() / n_samples as f64;
            let var = x
                .iter()
                .map(|row| (row[feature_idx] - mean).powi(2))
                .sum::<f64>()
                / n_samples as f64;
            global_max_var = global_max_var.max(var);
        }
        let smoothing = (self.config.var_smoothing * global_max_var).max(f64::MIN_POSITIVE);

        let mut means = vec![vec![0.0; n_features]; classes.len()];
        let mut variances = vec![vec![0.0; n_features]; classes.len()];

        for (class_idx, &class) in classes.iter().enumerate() {
            let rows: Vec<&Vec<f64>> = x
                .iter()
                .zip(y.iter())
                .filter(|(_, &label)| label == class)
                .map(|(row, _)| row)
                .collect();
            let count = rows.len() as f64;

            for feature_idx in 0..n_features {
                let mean =
                    rows.iter().map(|row| row[feature_idx]).sum::<f64>() / count;
                let var = rows
                    .iter()
                    .map(|row| (row[feature_idx] - mean).powi(2))
                    .sum::<f64>()
                    / count;
                means[class_idx][feature_idx] = mean;
                variances[class_idx][feature_idx] = var + smoothing;
            }
        }

        self.log_priors = counts
            .iter()
            .map(|&c| (c as f64 / n_samples as f64).ln())
            .collect();
        self.classes = classes;
        self.means = means;
        self.variances = variances;
        self.is_fitted = true;

        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        if !self.is_fitted {
            return Err(Error::InvalidOperation("Model not fitted".to_string()));
        }

        let n_features = self.means[0].len();
        x.iter()
            .map(|sample| {
                if sample.len() != n_features {
                    return Err(Error::DimensionMismatch(format!(
                        "expected {} columns, got {}",
                        n_features,
                        sample.len()
                    )));
                }
                let best = (0..self.classes.len())
                    .map(|class_idx| (class_idx, self.joint_log_likelihood(sample, class_idx)))
                    .max_by(|(_, a), (_, b)| {
                        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .map(|(class_idx, _)| class_idx)
                    .unwrap_or(0);
                Ok(self.classes[best])
            })
            .collect()
    }
}
