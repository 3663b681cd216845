//! Tank description and the state carried from one time step to the next.

use crate::error::{SimError, SimResult};
use td_components::{FrictionSeed, Regime, RegimePolicy, ResolvedFlow};
use td_core::numeric::ensure_positive;
use td_core::units::{Area, Length, m, m2};

/// Tank cross-section and the levels a run starts and stops at.
///
/// Levels are measured from the pipe entrance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankSpec {
    /// Horizontal cross-section of the tank
    pub area: Area,
    /// Water level at t = 0
    pub initial_level: Length,
    /// Level at which the tank counts as drained
    pub floor: Length,
}

impl TankSpec {
    /// The 0.32 m × 0.26 m tank of the drain rig, filled to 10 cm and
    /// drained down to 2 cm.
    pub fn rig() -> Self {
        Self {
            area: m2(0.32 * 0.26),
            initial_level: m(0.1),
            floor: m(0.02),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.area.value, "tank area")?;
        ensure_positive(self.initial_level.value, "initial water level")?;
        ensure_positive(self.floor.value, "drain floor (must lie above the pipe entrance)")?;
        if self.initial_level.value <= self.floor.value {
            return Err(SimError::InvalidConfiguration {
                what: format!(
                    "initial water level {} m must lie above the drain floor {} m",
                    self.initial_level.value, self.floor.value
                ),
            });
        }
        Ok(())
    }
}

/// Mutable state of one drain run.
#[derive(Debug, Clone, PartialEq)]
pub struct TankState {
    /// Water level above the pipe entrance (m)
    pub water_level: f64,
    /// Completed time steps
    pub steps: usize,
    /// Simulated time (s)
    pub elapsed_s: f64,
    /// Pipe Reynolds number at the end of the previous step
    pub last_reynolds: Option<f64>,
    /// Friction factors to start the next resolve from
    pub seed: FrictionSeed,
}

impl TankState {
    pub fn new(water_level: f64, seed: FrictionSeed) -> Self {
        Self {
            water_level,
            steps: 0,
            elapsed_s: 0.0,
            last_reynolds: None,
            seed,
        }
    }

    /// Regime for the coming step.
    pub fn regime(&self, policy: RegimePolicy) -> Regime {
        policy.select(self.last_reynolds)
    }

    /// Commit one forward-Euler step.
    ///
    /// The water level may only fall; a rise means the flow model produced
    /// inflow and is reported rather than accepted.
    pub fn advance(&mut self, next_level: f64, dt: f64, flow: &ResolvedFlow) -> SimResult<()> {
        if !next_level.is_finite() || next_level > self.water_level {
            return Err(SimError::Invariant {
                what: format!(
                    "water level rose from {} m to {} m at step {}",
                    self.water_level,
                    next_level,
                    self.steps + 1
                ),
            });
        }

        self.water_level = next_level;
        self.steps += 1;
        // Multiplying avoids the drift of repeated `t += dt`.
        self.elapsed_s = self.steps as f64 * dt;
        self.last_reynolds = Some(flow.pipe.reynolds);
        self.seed = FrictionSeed::from_flow(flow);
        Ok(())
    }
}
