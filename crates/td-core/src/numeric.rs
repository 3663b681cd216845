use crate::TdError;

/// Floating point type used throughout system
pub type Real = f64;

/// Threshold between laminar and turbulent pipe flow.
pub const CRITICAL_REYNOLDS: Real = 2300.0;

/// Absolute + relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TdError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TdError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, TdError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TdError::NotPositive { what, value: v })
    }
}

/// Cross-sectional area of a circular bore.
#[inline]
pub fn circle_area(diameter: Real) -> Real {
    std::f64::consts::PI * (0.5 * diameter).powi(2)
}
