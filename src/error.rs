//! Error type shared by every unit.

use thiserror::Error;

/// Error type for predictive unit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredyError {
    /// A supplied vector or matrix disagrees with the configured sizes.
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Invalid unit configuration or explicit weights.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PredyError {
    /// Fail with `ShapeMismatch` unless `actual == expected`.
    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> PredyResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ShapeMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}

impl From<serde_json::Error> for PredyError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(format!("malformed unit config: {err}"))
    }
}

pub type PredyResult<T> = Result<T, PredyError>;
