//! Error types for the td-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Simulation error: {0}")]
    Simulation(#[from] td_sim::SimError),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for td-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<td_project::ProjectError> for AppError {
    fn from(err: td_project::ProjectError) -> Self {
        match err {
            td_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Config(other.to_string()),
        }
    }
}

impl From<td_project::ValidationError> for AppError {
    fn from(err: td_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<td_components::ComponentError> for AppError {
    fn from(err: td_components::ComponentError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Report(err.to_string())
    }
}
