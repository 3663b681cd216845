//! Scalar nonlinear equation solving for tankdrain.
//!
//! The hydraulic model only ever needs one unknown at a time (the Colebrook-White
//! variable `1/sqrt(f)`), so this crate provides a bracketed scalar root finder
//! rather than a general system solver.

pub mod error;
pub mod root;

pub use error::{SolverError, SolverResult};
pub use root::{RootConfig, RootSolution, solve_root};
