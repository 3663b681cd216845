//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur while solving a scalar equation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite residual at x = {x}")]
    NonFinite { x: f64 },
}

pub type SolverResult<T> = Result<T, SolverError>;

