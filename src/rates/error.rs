//! Errors raised by the checked rate computations

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    /// The inverse problem divides by utilization
    #[error("utilization must be non-zero to solve for a borrow rate")]
    ZeroUtilization,

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}
