//! Error types for hydraulic calculations.

use td_core::error::TdError;
use td_solver::SolverError;
use thiserror::Error;

/// Errors that can occur while evaluating the equation library or resolving
/// a flow state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// An equation was evaluated outside its domain (non-positive logarithm
    /// argument, negative radicand, zero Reynolds number in a friction law).
    #[error("Domain error in {what}: {value}")]
    Domain { what: &'static str, value: f64 },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<SolverError> for ComponentError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ConvergenceFailed { what } => ComponentError::ConvergenceFailed {
                what: format!("root finder: {what}"),
            },
            SolverError::InvalidArg { what } => ComponentError::InvalidArg { what },
            SolverError::NonFinite { x } => ComponentError::Domain {
                what: "root finder residual",
                value: x,
            },
        }
    }
}

impl From<TdError> for ComponentError {
    fn from(e: TdError) -> Self {
        match e {
            TdError::NonFinite { what, value } | TdError::NotPositive { what, value } => {
                ComponentError::Domain { what, value }
            }
        }
    }
}
