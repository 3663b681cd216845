//! Application layer for tankdrain.
//!
//! Shared by the command line front end: turns a configuration into drain
//! runs, sweeps pipe lengths and renders the reports.

pub mod compile;
pub mod error;
pub mod report;
pub mod sweep;

// Re-export key types for convenience
pub use compile::DrainSetup;
pub use error::{AppError, AppResult};
pub use report::{
    LengthReport, ReportFormat, RunStatus, SweepReport, render_steps_csv, render_sweep,
};
pub use sweep::{LengthSweep, MAX_SWEEP_POINTS, run_sweep, simulate_length};
