//! Bracketed scalar root finder.
//!
//! The search first grows a bracket around the initial guess (never stepping
//! onto or below `lower_bound`, so residuals with a restricted domain stay
//! evaluable), then refines it with Illinois false position. A midpoint step
//! replaces any false-position estimate that leaves the bracket.

use crate::error::SolverError;
use tracing::trace;

/// Root finder configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootConfig {
    /// Maximum refinement iterations once a bracket is found
    pub max_iterations: usize,
    /// Maximum bracket expansions around the initial guess
    pub max_expansions: usize,
    /// Absolute tolerance on bracket width
    pub x_abs_tol: f64,
    /// Relative tolerance on bracket width
    pub x_rel_tol: f64,
    /// Absolute tolerance on the residual
    pub residual_tol: f64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_expansions: 60,
            x_abs_tol: 1e-12,
            x_rel_tol: 1e-10,
            residual_tol: 1e-12,
        }
    }
}

/// Converged root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSolution {
    /// Root estimate
    pub x: f64,
    /// Residual at `x`
    pub residual: f64,
    /// Refinement iterations used
    pub iterations: usize,
    /// Total residual evaluations
    pub evaluations: usize,
}

struct Counted<F> {
    f: F,
    evaluations: usize,
}

impl<F, E> Counted<F>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    fn eval(&mut self, x: f64) -> Result<f64, E> {
        self.evaluations += 1;
        let r = (self.f)(x)?;
        if r.is_finite() {
            Ok(r)
        } else {
            Err(SolverError::NonFinite { x }.into())
        }
    }
}

/// Solve `f(x) = 0` starting from `x0`, searching only `x > lower_bound`.
///
/// Pass `f64::NEG_INFINITY` as `lower_bound` for an unrestricted domain.
/// Errors raised by `f` are returned unchanged; failures of the search itself
/// are converted from [`SolverError`].
pub fn solve_root<F, E>(
    f: F,
    x0: f64,
    lower_bound: f64,
    config: &RootConfig,
) -> Result<RootSolution, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    if !x0.is_finite() {
        return Err(SolverError::InvalidArg {
            what: "initial guess must be finite",
        }
        .into());
    }
    if x0 <= lower_bound {
        return Err(SolverError::InvalidArg {
            what: "initial guess must lie above the lower bound",
        }
        .into());
    }

    let mut f = Counted { f, evaluations: 0 };

    let r0 = f.eval(x0)?;
    if r0.abs() <= config.residual_tol {
        return Ok(RootSolution {
            x: x0,
            residual: r0,
            iterations: 0,
            evaluations: f.evaluations,
        });
    }

    let (mut a, mut fa, mut b, mut fb) = bracket(&mut f, x0, r0, lower_bound, config)?;
    trace!(a, b, "root bracketed");

    for (x, r) in [(a, fa), (b, fb)] {
        if r.abs() <= config.residual_tol {
            return Ok(RootSolution {
                x,
                residual: r,
                iterations: 0,
                evaluations: f.evaluations,
            });
        }
    }

    // Illinois: halve the stale endpoint's residual when the same side is kept twice.
    let mut side = 0i8;
    for iter in 1..=config.max_iterations {
        let mut c = (a * fb - b * fa) / (fb - fa);
        if !(c > a.min(b) && c < a.max(b)) {
            c = 0.5 * (a + b);
        }
        let fc = f.eval(c)?;

        if fc.signum() == fb.signum() {
            b = c;
            fb = fc;
            if side == -1 {
                fa *= 0.5;
            }
            side = -1;
        } else {
            a = c;
            fa = fc;
            if side == 1 {
                fb *= 0.5;
            }
            side = 1;
        }

        let width = (b - a).abs();
        if fc.abs() <= config.residual_tol || width <= config.x_abs_tol + config.x_rel_tol * c.abs()
        {
            return Ok(RootSolution {
                x: c,
                residual: fc,
                iterations: iter,
                evaluations: f.evaluations,
            });
        }
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, bracket = [{}, {}]",
            config.max_iterations,
            a.min(b),
            a.max(b)
        ),
    }
    .into())
}

/// Grow a symmetric search interval around `x0` until the residual changes
/// sign. The lower end approaches `lower_bound` geometrically instead of
/// crossing it.
fn bracket<F, E>(
    f: &mut Counted<F>,
    x0: f64,
    r0: f64,
    lower_bound: f64,
    config: &RootConfig,
) -> Result<(f64, f64, f64, f64), E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<SolverError>,
{
    let mut half_width = (0.5 * x0.abs()).max(1e-3);
    let mut lo = x0;
    let mut hi = x0;

    for _ in 0..config.max_expansions {
        let candidate = x0 - half_width;
        lo = if candidate > lower_bound {
            candidate
        } else {
            lower_bound + 0.5 * (lo - lower_bound)
        };
        hi = x0 + half_width;

        let r_lo = f.eval(lo)?;
        if r_lo.signum() != r0.signum() {
            return Ok((lo, r_lo, x0, r0));
        }
        let r_hi = f.eval(hi)?;
        if r_hi.signum() != r0.signum() {
            return Ok((x0, r0, hi, r_hi));
        }

        half_width *= 2.0;
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "No sign change found in [{}, {}] after {} expansions",
            lo, hi, config.max_expansions
        ),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverResult;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let residual = |x: f64| -> SolverResult<f64> { Ok(x * x - 4.0) };
        let sol = solve_root(residual, 3.0, 0.0, &RootConfig::default()).unwrap();

        assert!((sol.x - 2.0).abs() < 1e-9);
        assert!(sol.iterations > 0);
    }

    #[test]
    fn guess_far_from_root_expands_bracket() {
        let residual = |x: f64| -> SolverResult<f64> { Ok(x - 250.0) };
        let sol = solve_root(residual, 1.0, f64::NEG_INFINITY, &RootConfig::default()).unwrap();
        assert!((sol.x - 250.0).abs() < 1e-8);
    }

    #[test]
    fn lower_bound_is_never_evaluated() {
        // ln(x) is undefined at and below zero; root at x = 1.
        let residual = |x: f64| -> SolverResult<f64> {
            assert!(x > 0.0, "evaluated outside domain at {x}");
            Ok(x.ln())
        };
        let sol = solve_root(residual, 40.0, 0.0, &RootConfig::default()).unwrap();
        assert!((sol.x - 1.0).abs() < 1e-8);
    }

    #[test]
    fn exact_guess_returns_immediately() {
        let residual = |x: f64| -> SolverResult<f64> { Ok(x - 2.0) };
        let sol = solve_root(residual, 2.0, 0.0, &RootConfig::default()).unwrap();
        assert_eq!(sol.iterations, 0);
        assert_eq!(sol.evaluations, 1);
        assert_eq!(sol.x, 2.0);
    }

    #[test]
    fn no_root_reports_convergence_failure() {
        let residual = |x: f64| -> SolverResult<f64> { Ok(x * x + 1.0) };
        let err = solve_root(residual, 1.0, f64::NEG_INFINITY, &RootConfig::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::ConvergenceFailed { .. }));
    }

    #[test]
    fn guess_below_lower_bound_is_rejected() {
        let residual = |x: f64| -> SolverResult<f64> { Ok(x) };
        let err = solve_root(residual, -1.0, 0.0, &RootConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::InvalidArg { .. }));
    }

    #[test]
    fn residual_errors_pass_through() {
        let residual = |_x: f64| -> SolverResult<f64> {
            Err(SolverError::InvalidArg { what: "from residual" })
        };
        let err = solve_root(residual, 1.0, 0.0, &RootConfig::default()).unwrap_err();
        assert_eq!(err, SolverError::InvalidArg { what: "from residual" });
    }

    #[test]
    fn nan_residual_is_reported() {
        let residual = |_x: f64| -> SolverResult<f64> { Ok(f64::NAN) };
        let err = solve_root(residual, 1.0, 0.0, &RootConfig::default()).unwrap_err();
        assert!(matches!(err, SolverError::NonFinite { .. }));
    }
}
