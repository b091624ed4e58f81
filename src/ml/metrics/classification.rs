//! Metrics for evaluating classification predictions.
//!
//! All functions take slices of class labels encoded as `f64` and compare them
//! with exact equality, matching the label convention of the probe models.

use crate::error::{Error, Result};

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::DimensionMismatch(format!(
            "true and predicted labels differ in length: {} vs {}",
            y_true.len(),
            y_pred.len()
        )));
    }

    if y_true.is_empty() {
        return Err(Error::EmptyData(
            "cannot score an empty label set".to_string(),
        ));
    }

    Ok(())
}

/// Collect the distinct labels appearing in either slice, in first-seen order.
fn distinct_labels(y_true: &[f64], y_pred: &[f64]) -> Vec<f64> {
    let mut labels: Vec<f64> = Vec::new();
    for &label in y_true.iter().chain(y_pred.iter()) {
        if !labels.iter().any(|&l| l == label) {
            labels.push(label);
        }
    }
    labels
}

/// Fraction of predictions that match the true label.
///
/// # Arguments
/// * `y_true` - true class labels
/// * `y_pred` - predicted class labels
///
/// # Returns
/// * `Result<f64>` - accuracy in [0, 1]
pub fn accuracy_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

/// Mean per-class recall. Insensitive to class imbalance.
///
/// Classes that appear only in `y_pred` contribute nothing to the average.
pub fn balanced_accuracy_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let mut recall_sum = 0.0;
    let mut n_classes = 0usize;

    for &label in &distinct_labels(y_true, y_pred) {
        let support = y_true.iter().filter(|&&t| t == label).count();
        if support == 0 {
            continue;
        }
        let hits = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(&t, &p)| t == label && p == label)
            .count();
        recall_sum += hits as f64 / support as f64;
        n_classes += 1;
    }

    Ok(recall_sum / n_classes as f64)
}

/// Cohen's kappa: agreement between two labelings corrected for chance.
///
/// Returns a value in [-1, 1]; 0 means chance-level agreement. When the
/// expected agreement is exactly 1 (both labelings constant), the kappa is
/// defined as 0.
pub fn cohen_kappa_score(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;

    let n = y_true.len() as f64;
    let observed = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count() as f64
        / n;

    let mut expected = 0.0;
    for &label in &distinct_labels(y_true, y_pred) {
        let p_true = y_true.iter().filter(|&&t| t == label).count() as f64 / n;
        let p_pred = y_pred.iter().filter(|&&p| p == label).count() as f64 / n;
        expected += p_true * p_pred;
    }

    if (1.0 - expected).abs() < f64::EPSILON {
        return Ok(0.0);
    }

    Ok((observed - expected) / (1.0 - expected))
}
