//! Pipe-length sweep.
//!
//! Every length is an independent drain run sharing nothing mutable, so the
//! sweep fans them out over rayon's pool. Output order follows the lengths
//! either way.

use rayon::prelude::*;
use serde::Serialize;
use td_project::schema::{SimulationConfig, SweepDef};
use td_sim::{DrainOutcome, simulate_drain};
use tracing::{info, warn};

use crate::compile::DrainSetup;
use crate::error::{AppError, AppResult};
use crate::report::{LengthReport, SweepReport};

pub use td_project::MAX_SWEEP_POINTS;

/// Relative slack when deciding whether the end length is included.
const END_SLACK: f64 = 1e-9;

/// Evenly spaced pipe lengths, `start`, `start + step`, ... up to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthSweep {
    pub start_m: f64,
    pub end_m: f64,
    pub step_m: f64,
}

impl LengthSweep {
    pub fn new(start_m: f64, end_m: f64, step_m: f64) -> AppResult<Self> {
        if !(start_m.is_finite() && start_m > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "sweep start must be positive, got {start_m}"
            )));
        }
        if !(step_m.is_finite() && step_m > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "sweep step must be positive, got {step_m}"
            )));
        }
        if !end_m.is_finite() || end_m < start_m {
            return Err(AppError::InvalidInput(format!(
                "sweep end {end_m} lies before start {start_m}"
            )));
        }
        let span = (end_m - start_m) / step_m;
        if !span.is_finite() || span >= MAX_SWEEP_POINTS as f64 {
            return Err(AppError::InvalidInput(format!(
                "sweep from {start_m} m to {end_m} m in steps of {step_m} m exceeds \
                 {MAX_SWEEP_POINTS} points"
            )));
        }
        Ok(Self {
            start_m,
            end_m,
            step_m,
        })
    }

    pub fn from_def(def: &SweepDef) -> AppResult<Self> {
        Self::new(def.start_m, def.end_m, def.step_m)
    }

    /// Number of points, end included when it lies on the grid.
    pub fn len(&self) -> usize {
        let span = (self.end_m - self.start_m) / self.step_m;
        ((span + END_SLACK * span.max(1.0)).floor() as usize).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lengths computed by index, so no rounding error accumulates.
    pub fn points(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| (self.start_m + i as f64 * self.step_m).min(self.end_m))
            .collect()
    }
}

/// Drain the tank once per swept length.
///
/// A length that fails is reported as failed and the sweep carries on.
/// Only an unusable configuration fails the sweep as a whole.
pub fn run_sweep(config: &SimulationConfig, parallel: bool) -> AppResult<SweepReport> {
    td_project::validate_config(config)?;
    let setup = DrainSetup::from_config(config)?;
    let lengths = LengthSweep::from_def(&config.sweep)?.points();

    info!(
        name = %config.name,
        variant = setup.variant.name(),
        points = lengths.len(),
        parallel,
        "sweep started"
    );

    let run = |length: &f64| run_length(&setup, *length);
    let lengths_report: Vec<LengthReport> = if parallel {
        lengths.par_iter().map(run).collect()
    } else {
        lengths.iter().map(run).collect()
    };

    let failed = lengths_report.iter().filter(|r| r.is_failed()).count();
    info!(
        completed = lengths_report.len() - failed,
        failed, "sweep finished"
    );

    Ok(SweepReport {
        name: config.name.clone(),
        variant: setup.variant.name().to_string(),
        regime: config.solver.regime,
        lengths: lengths_report,
    })
}

fn run_length(setup: &DrainSetup, length: f64) -> LengthReport {
    let geometry = setup.geometry(length);
    match simulate_drain(&setup.fluid, &geometry, &setup.tank, &setup.options) {
        Ok(outcome) => {
            info!(
                length,
                drain_time_s = outcome.drain_time_s,
                steps = outcome.steps,
                "length done"
            );
            LengthReport::completed(length, &outcome)
        }
        Err(e) => {
            warn!(length, error = %e, "length failed");
            LengthReport::failed(length, &e)
        }
    }
}

/// Drain the tank through one pipe length, recording every
/// `record_every`-th step.
pub fn simulate_length(
    config: &SimulationConfig,
    length_m: f64,
    record_every: Option<usize>,
) -> AppResult<DrainOutcome> {
    td_project::validate_config(config)?;
    let setup = DrainSetup::from_config(config)?;
    let options = td_sim::DrainOptions {
        record_every,
        ..setup.options.clone()
    };
    let outcome = simulate_drain(&setup.fluid, &setup.geometry(length_m), &setup.tank, &options)?;
    info!(
        length = length_m,
        drain_time_s = outcome.drain_time_s,
        records = outcome.records.len(),
        "simulation finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn reference_sweep_has_twenty_points() {
        let points = LengthSweep::from_def(&SweepDef::default()).unwrap().points();
        assert_eq!(points.len(), 20);
        assert_eq!(points[0], 0.05);
        assert!((points[19] - 1.0).abs() < 1e-12);
        assert!(points[19] <= 1.0);
    }

    #[test]
    fn centimetre_sweep_reaches_one_metre() {
        let points = LengthSweep::new(0.01, 1.0, 0.01).unwrap().points();
        assert_eq!(points.len(), 100);
        assert!((points[99] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_sweep() {
        assert_eq!(LengthSweep::new(0.3, 0.3, 0.05).unwrap().points(), vec![0.3]);
    }

    #[test]
    fn end_off_grid_is_excluded() {
        let points = LengthSweep::new(0.1, 0.25, 0.1).unwrap().points();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn invalid_sweeps() {
        assert!(LengthSweep::new(0.0, 1.0, 0.1).is_err());
        assert!(LengthSweep::new(0.1, 1.0, 0.0).is_err());
        assert!(LengthSweep::new(0.5, 0.1, 0.1).is_err());
        assert!(LengthSweep::new(0.1, 1e6, 1e-3).is_err());
    }

    #[test]
    fn subnormal_step_is_rejected_without_overflow() {
        let def = SweepDef {
            step_m: 1e-320,
            ..SweepDef::default()
        };
        assert!(matches!(
            LengthSweep::from_def(&def),
            Err(AppError::InvalidInput(_))
        ));

        let mut config = SimulationConfig::default();
        config.sweep = def;
        assert!(matches!(
            run_sweep(&config, false),
            Err(AppError::Validation(_))
        ));
    }

    proptest! {
        #[test]
        fn points_are_increasing_and_bounded(
            start in 0.001_f64..1.0,
            extra in 0.0_f64..2.0,
            step in 0.001_f64..0.5,
        ) {
            let sweep = LengthSweep::new(start, start + extra, step).unwrap();
            let points = sweep.points();
            prop_assert!(!points.is_empty());
            prop_assert_eq!(points[0], start);
            for pair in points.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
            let last = points[points.len() - 1];
            prop_assert!(last <= sweep.end_m);
            prop_assert!(sweep.end_m - last < step * (1.0 + 1e-6));
        }
    }
}
