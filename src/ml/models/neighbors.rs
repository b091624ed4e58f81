//! K-nearest-neighbor classifier.
//!
//! Brute-force Euclidean distance over the stored training rows. The
//! landmarking probes use it with `k = 1`, where the cross-validated accuracy
//! measures how noisy the dataset is.

use crate::error::{Error, Result};
use crate::ml::models::{check_fit_input, Classifier};

/// K-nearest-neighbor classifier
#[derive(Debug, Clone)]
pub struct KNeighborsClassifier {
    n_neighbors: usize,
    x_train: Vec<Vec<f64>>,
    y_train: Vec<f64>,
    is_fitted: bool,
}

impl KNeighborsClassifier {
    /// Create a classifier voting over `n_neighbors` neighbors.
    ///
    /// Fails when `n_neighbors` is zero.
    pub fn new(n_neighbors: usize) -> Result<Self> {
        if n_neighbors == 0 {
            return Err(Error::InvalidValue(
                "number of neighbors must be at least 1".to_string(),
            ));
        }
        Ok(KNeighborsClassifier {
            n_neighbors,
            x_train: Vec::new(),
            y_train: Vec::new(),
            is_fitted: false,
        })
    }

    /// The single-neighbor classifier used by the `one_nn` and `elite_nn`
    /// probes.
    pub fn one_nn() -> Self {
        KNeighborsClassifier {
            n_neighbors: 1,
            x_train: Vec::new(),
            y_train: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum()
    }

    /// Majority vote over the k nearest training rows; distance ties and vote
    /// ties resolve to the lowest training index, keeping predictions
    /// deterministic.
    fn vote(&self, sample: &[f64]) -> f64 {
        let mut distances: Vec<(f64, usize)> = self
            .x_train
            .iter()
            .enumerate()
            .map(|(idx, row)| (Self::squared_distance(sample, row), idx))
            .collect();
        distances.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        let neighbors = &distances[..self.n_neighbors];

        let mut labels: Vec<f64> = Vec::new();
        let mut votes: Vec<usize> = Vec::new();
        for &(_, idx) in neighbors {
            let label = self.y_train[idx];
            match labels.iter().position(|&l| l == label) {
                Some(pos) => votes[pos] += 1,
                None => {
                    labels.push(label);
                    votes.push(1);
                }
            }
        }

        let best = votes
            .iter()
            .enumerate()
            .max_by_key(|(_, &count)| count)
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        labels[best]
    }
}

impl Classifier for KNeighborsClassifier {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        check_fit_input(x, y)?;

        if x.len() < self.n_neighbors {
            return Err(Error::InsufficientData(format!(
                "training set has {} rows but {} neighbors are required",
                x.len(),
                self.n_neighbors
            )));
        }

        self.x_train = x.to_vec();
        self.y_train = y.to_vec();
        self.is_fitted = true;

        Ok(())
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        if !self.is_fitted {
            return Err(Error::InvalidOperation("Model not fitted".to_string()));
        }

        let n_features = self.x_train[0].len();
        x.iter()
            .map(|sample| {
                if sample.len() != n_features {
                    return Err(Error::DimensionMismatch(format!(
                        "expected {} columns, got {}",
                        n_features,
                        sample.len()
                    )));
                }
                Ok(self.vote(sample))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_nn_recalls_training_points() {
        let x = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![5.0, 5.0]];
        let y = vec![0.0, 0.0, 1.0];

        let mut model = KNeighborsClassifier::one_nn();
        model.fit(&x, &y).unwrap();

        // Every training point is its own nearest neighbor.
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_one_nn_nearest_wins() {
        let x = vec![vec![0.0], vec![10.0]];
        let y = vec![0.0, 1.0];

        let mut model = KNeighborsClassifier::one_nn();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&[vec![1.0], vec![9.0]]).unwrap();
        assert_eq!(predictions, vec![0.0, 1.0]);
    }

    #[test]
    fn test_three_nn_majority_vote() {
        let x = vec![vec![0.0], vec![0.5], vec![1.0], vec![10.0]];
        let y = vec![0.0, 0.0, 1.0, 1.0];

        let mut model = KNeighborsClassifier::new(3).unwrap();
        model.fit(&x, &y).unwrap();

        // Nearest three to 0.2 are the first three rows, majority class 0.0.
        let predictions = model.predict(&[vec![0.2]]).unwrap();
        assert_eq!(predictions, vec![0.0]);
    }

    #[test]
    fn test_zero_neighbors_rejected() {
        assert!(KNeighborsClassifier::new(0).is_err());
    }

    #[test]
    fn test_fit_needs_enough_rows() {
        let x = vec![vec![0.0], vec![1.0]];
        let y = vec![0.0, 1.0];

        let mut model = KNeighborsClassifier::new(3).unwrap();
        assert!(matches!(
            model.fit(&x, &y),
            Err(Error::InsufficientData(_))
        ));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let model = KNeighborsClassifier::one_nn();
        assert!(model.predict(&[vec![0.0]]).is_err());
    }
}
