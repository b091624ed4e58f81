//! Linear discriminant analysis classifier.
//!
//! Models every class as a Gaussian sharing one pooled within-class covariance
//! matrix, which makes the decision boundaries linear (not axis-parallel, in
//! contrast to the tree stumps). Prediction evaluates the linear discriminant
//! score of each class and takes the argmax.

use crate::error::{Error, Result};
use crate::ml::models::{check_fit_input, class_counts, Classifier};

/// Linear discriminant analysis classifier
#[derive(Debug, Clone)]
pub struct LinearDiscriminantAnalysis {
    classes: Vec<f64>,
    /// Linear term per class: pooled-covariance inverse applied to the class mean
    coef: Vec<Vec<f64>>,
    /// Constant term per class
    intercept: Vec<f64>,
    is_fitted: bool,
}

impl LinearDiscriminantAnalysis {
    pub fn new() -> Self {
        LinearDiscriminantAnalysis {
            classes: Vec::new(),
            coef: Vec::new(),
            intercept: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Solve `mat * w = rhs` by Gaussian elimination with partial pivoting.
    ///
    /// `mat` is consumed as the working copy. A vanishing pivot means the
    /// pooled covariance is singular and the fit cannot proceed.
    fn solve(mut mat: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>> {
        let n = mat.len();

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&a, &b| {
                    mat[a][col]
                        .abs()
                        .partial_cmp(&mat[b][col].abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(col);

            if mat[pivot_row][col].abs() < 1e-12 {
                return Err(Error::ComputationError(
                    "singular pooled covariance matrix".to_string(),
                ));
            }

            mat.swap(col, pivot_row);
            rhs.swap(col, pivot_row);

            for row in (col + 1)..n {
                let factor = mat[row][col] / mat[col][col];
                for k in col..n {
                    mat[row][k] -= factor * mat[col][k];
                }
                rhs[row] -= factor * rhs[col];
            }
        }

        let mut solution = vec![0.0; n];
        for col in (0..n).rev() {
            let mut value = rhs[col];
            for k in (col + 1)..n {
                value -= mat[col][k] * solution[k];
            }
            solution[col] = value / mat[col][col];
        }

        Ok(solution)
    }
}

impl Default for LinearDiscriminantAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for LinearDiscriminantAnalysis {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        let (classes, counts) = class_counts(y);
        if classes.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "linear discriminant analysis needs at least 2 classes, got {}",
                classes.len()
            )));
        }

        let n_samples = x.len();
        let n_features = x[0].len();
        if n_samples <= classes.len() {
            return Err(Error::InsufficientData(format!(
                "need more samples ({}) than classes ({}) for the pooled covariance",
                n_samples,
                classes.len()
            )));
        }

        // Per-class means.
        let mut means = vec![vec![0.0; n_features]; classes.len()];
        for (row, &label) in x.iter().zip(y.iter()) {
            let class_idx = position(&classes, label);
            for (feature_idx, &value) in row.iter().enumerate() {
                means[class_idx][feature_idx] += value;
            }
        }
        for (class_idx, &count) in counts.iter().enumerate() {
            for value in &mut means[class_idx] {
                *value /= count as f64;
            }
        }

        // Pooled within-class covariance.
        let mut cov = vec![vec![0.0; n_features]; n_features];
        for (row, &label) in x.iter().zip(y.iter()) {
            let class_idx = position(&classes, label);
            let centered: Vec<f64> = row
                .iter()
                .zip(means[class_idx].iter())
                .map(|(v, m)| v - m)
                .collect();
            for i in 0..n_features {
                for j in 0..n_features {
                    cov[i][j] += centered[i] * centered[j];
                }
            }
        }
        let dof = (n_samples - classes.len()) as f64;
        for row in &mut cov {
            for value in row.iter_mut() {
                *value /= dof;
            }
        }

        // Discriminant terms per class: w = cov^-1 * mean,
        // b = -0.5 * mean . w + ln(prior).
        let mut coef = Vec::with_capacity(classes.len());
        let mut intercept = Vec::with_capacity(classes.len());
        for (class_idx, class_mean) in means.iter().enumerate() {
            let w = Self::solve(cov.clone(), class_mean.clone())?;
            let prior = counts[class_idx] as f64 / n_samples as f64;
            let b = -0.5
                * class_mean
                    .iter()
                    .zip(w.iter())
                    .map(|(m, w)| m * w)
                    .sum::<f64>()
                + prior.ln();
            coef.push(w);
            intercept.push(b);
        }

        self.classes = classes;
        self.coef = coef;
        self.intercept = intercept;
        self.is_fitted = true;

        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        if !self.is_fitted {
            return Err(Error::InvalidOperation("Model not fitted".to_string()));
        }

        let n_features = self.coef[0].len();
        x.iter()
            .map(|sample| {
                if sample.len() != n_features {
                    return Err(Error::DimensionMismatch(format!(
                        "expected {} columns, got {}",
                        n_features,
                        sample.len()
                    )));
                }
                let best = self
                    .coef
                    .iter()
                    .zip(self.intercept.iter())
                    .enumerate()
                    .map(|(class_idx, (w, b))| {
                        let score: f64 =
                            sample.iter().zip(w.iter()).map(|(v, w)| v * w).sum::<f64>() + b;
                        (class_idx, score)
                    })
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

fn position(classes: &[f64], label: f64) -> usize {
    classes.iter().position(|&c| c == label).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian_blobs() -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        // Two elongated clusters separated along the diagonal.
        for i in 0..12 {
            let t = i as f64 * 0.3;
            x.push(vec![t, t + (i % 3) as f64 * 0.2]);
            y.push(0.0);
        }
        for i in 0..12 {
            let t = i as f64 * 0.3;
            x.push(vec![t + 6.0, t + 6.0 + (i % 3) as f64 * 0.2]);
            y.push(1.0);
        }
        (x, y)
    }

    #[test]
    fn test_lda_separates_blobs() {
        let (x, y) = gaussian_blobs();
        let mut model = LinearDiscriminantAnalysis::new();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| p == t)
            .count();
        assert!(correct as f64 / y.len() as f64 > 0.9);
    }

    #[test]
    fn test_lda_rejects_single_class() {
        let x = vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![3.0, 0.0]];
        let y = vec![0.0, 0.0, 0.0];

        let mut model = LinearDiscriminantAnalysis::new();
        assert!(matches!(
            model.fit(&x, &y),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_lda_singular_covariance() {
        // Second column is constant within both classes, covariance is singular.
        let x = vec![
            vec![0.0, 1.0],
            vec![1.0, 1.0],
            vec![4.0, 1.0],
            vec![5.0, 1.0],
        ];
        let y = vec![0.0, 0.0, 1.0, 1.0];

        let mut model = LinearDiscriminantAnalysis::new();
        assert!(matches!(
            model.fit(&x, &y),
            Err(Error::ComputationError(_))
        ));
    }

    #[test]
    fn test_lda_single_column() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0], vec![8.0], vec![9.0], vec![10.0]];
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = LinearDiscriminantAnalysis::new();
        model.fit(&x, &y).unwrap();
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = LinearDiscriminantAnalysis::new();
        assert!(model.predict(&[vec![0.0, 0.0]]).is_err());
    }
}
