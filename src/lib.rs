//! Landmarking meta-feature extraction.
//!
//! `metafe` characterizes datasets for meta-learning by training small probe
//! classifiers (decision-tree stumps, 1-nearest-neighbor, Gaussian naive Bayes,
//! linear discriminant analysis) inside a stratified k-fold cross-validation
//! loop and reporting the per-fold scores as the meta-feature vector.
//!
//! The split plan is built once per dataset and shared read-only across all
//! probes; see [`landmarking::PrecomputeContext`].

#![allow(clippy::too_many_arguments)]

pub mod error;
pub mod landmarking;
pub mod ml;

// Re-export commonly used types
pub use error::{Error, Result};
pub use landmarking::{PrecomputeContext, ProbeRegistry};
pub use ml::model_selection::{Fold, SplitPlan, StratifiedKFold};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
