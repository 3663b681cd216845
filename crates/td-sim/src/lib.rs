//! Transient drain simulation for tankdrain.
//!
//! Provides:
//! - tank description and the per-step state carried between steps
//! - the fixed-step drain integrator with per-step diagnostics

pub mod drain;
pub mod error;
pub mod state;

// Re-exports for public API
pub use drain::{DrainOptions, DrainOutcome, StepRecord, Termination, simulate_drain};
pub use error::{SimError, SimResult};
pub use state::{TankSpec, TankState};
