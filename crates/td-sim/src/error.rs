//! Error types for drain simulation.

use td_components::ComponentError;
use td_core::error::TdError;
use thiserror::Error;

/// Errors encountered while draining a tank.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("Domain error in {what}: {value}")]
    Domain { what: &'static str, value: f64 },

    #[error("Convergence failure: {what}")]
    ConvergenceFailure { what: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("Step limit of {max_steps} reached at water level {water_level} m")]
    StepLimit { max_steps: usize, water_level: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Reclassify a validation failure as a configuration error, whatever
    /// kind of check produced it.
    pub fn configuration(e: impl std::fmt::Display) -> Self {
        SimError::InvalidConfiguration {
            what: e.to_string(),
        }
    }
}

impl From<ComponentError> for SimError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::Domain { what, value } => SimError::Domain { what, value },
            ComponentError::ConvergenceFailed { what } => SimError::ConvergenceFailure { what },
            ComponentError::InvalidArg { what } => SimError::InvalidConfiguration {
                what: what.to_string(),
            },
        }
    }
}

impl From<TdError> for SimError {
    fn from(e: TdError) -> Self {
        SimError::configuration(e)
    }
}
