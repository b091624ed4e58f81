//! Machine learning building blocks for the landmarking probes.
//!
//! Provides the probe classifiers, the stratified cross-validation split plan
//! and the classification metrics used as scoring functions.

pub mod metrics;
pub mod model_selection;
pub mod models;
