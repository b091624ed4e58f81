use thiserror::Error;

/// Error type covering every failure mode of the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Alias for Result with the crate error type.
pub type Result<T> = std::result::Result<T, Error>;
