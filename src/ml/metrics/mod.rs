//! Evaluation metrics for the landmarking probes.

pub mod classification;

pub use classification::{accuracy_score, balanced_accuracy_score, cohen_kappa_score};
