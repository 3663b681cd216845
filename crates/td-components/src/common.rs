//! Common utilities for hydraulic calculations.

use crate::error::{ComponentError, ComponentResult};
use td_core::numeric::ensure_finite;

/// Pipe drop per unit pipe length on the drain rig (the pipe falls 1 m per 150 m).
pub const PIPE_DROP_PER_LENGTH: f64 = 1.0 / 150.0;

/// Fitted entrance/exit loss coefficient of the drain rig.
pub const ENTRANCE_EXIT_LOSS: f64 = 0.5;

/// Ensure a value is finite, returning a domain error if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::Domain { what, value })?;
    Ok(())
}

/// Square root that reports a negative radicand instead of returning NaN.
pub fn checked_sqrt(radicand: f64, what: &'static str) -> ComponentResult<f64> {
    check_finite(radicand, what)?;
    if radicand < 0.0 {
        return Err(ComponentError::Domain {
            what,
            value: radicand,
        });
    }
    Ok(radicand.sqrt())
}

/// Driving head above the pipe outlet for a water level above the entrance.
///
/// Not positive means the velocity relations have no real solution.
#[inline]
pub fn available_head(water_level: f64, pipe_length: f64) -> f64 {
    water_level + pipe_length * PIPE_DROP_PER_LENGTH
}
