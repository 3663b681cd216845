//! Drain integrator: forward-Euler mass balance on the tank with a
//! quasi-steady pipe flow resolved every step.

use crate::error::{SimError, SimResult};
use crate::state::{TankSpec, TankState};
use std::fmt;
use td_components::common::available_head;
use td_components::{
    FlowState, FluidProperties, FrictionResolver, FrictionSeed, PipeGeometry, Regime,
    RegimePolicy, ResolverConfig,
};
use tracing::{debug, warn};

/// Options for drain runs.
#[derive(Clone, Debug)]
pub struct DrainOptions {
    /// Fixed time step (seconds)
    pub dt: f64,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step; `None` records nothing
    pub record_every: Option<usize>,
    /// Regime selection rule
    pub regime_policy: RegimePolicy,
    /// Friction factor guesses for the first step
    pub initial_seed: FrictionSeed,
    /// Friction resolver settings
    pub resolver: ResolverConfig,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            dt: 0.005,
            max_steps: 10_000_000,
            record_every: None,
            regime_policy: RegimePolicy::default(),
            initial_seed: FrictionSeed::new(0.019),
            resolver: ResolverConfig::default(),
        }
    }
}

impl DrainOptions {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SimError::InvalidConfiguration {
                what: format!("time step must be positive, got {}", self.dt),
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidConfiguration {
                what: "max_steps must be positive".to_string(),
            });
        }
        if self.record_every == Some(0) {
            return Err(SimError::InvalidConfiguration {
                what: "record_every must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Water level reached the drain floor.
    ReachedFloor,
    /// No driving head left for the velocity relation.
    HeadExhausted,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReachedFloor => write!(f, "reached-floor"),
            Self::HeadExhausted => write!(f, "head-exhausted"),
        }
    }
}

/// Diagnostics for one completed time step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepRecord {
    /// Step number, starting at 1
    pub step: usize,
    /// Time at the end of the step (s)
    pub t: f64,
    /// Water level at the end of the step (m)
    pub water_level: f64,
    /// Regime used during the step
    pub regime: Regime,
    /// Pipe flow during the step
    pub pipe: FlowState,
    /// T-joint flow during the step, if tracked
    pub joint: Option<FlowState>,
    /// Volumetric flow rate out of the tank (m³/s)
    pub flow_rate: f64,
    /// Fixed-point iterations used
    pub iterations: usize,
}

/// Result of a drain run.
#[derive(Clone, Debug)]
pub struct DrainOutcome {
    /// Simulated time until the run stopped (s)
    pub drain_time_s: f64,
    /// Number of time steps taken
    pub steps: usize,
    /// Water level when the run stopped (m)
    pub final_level: f64,
    pub termination: Termination,
    /// Resolver iterations summed over all steps
    pub resolver_iterations: usize,
    /// Recorded step diagnostics
    pub records: Vec<StepRecord>,
}

/// Drain the tank through the given pipe and report the time taken.
pub fn simulate_drain(
    fluid: &FluidProperties,
    geometry: &PipeGeometry,
    tank: &TankSpec,
    opts: &DrainOptions,
) -> SimResult<DrainOutcome> {
    opts.validate()?;
    tank.validate()?;
    let resolver =
        FrictionResolver::new(*fluid, *geometry, opts.resolver).map_err(SimError::configuration)?;

    let dt = opts.dt;
    let tank_area = tank.area.value;
    let floor = tank.floor.value;
    let pipe_area = geometry.flow_area();
    let length = geometry.length.value;

    let mut state = TankState::new(
        tank.initial_level.value,
        resolver.complete_seed(opts.initial_seed),
    );
    let mut records = Vec::new();
    let mut last: Option<StepRecord> = None;
    let mut resolver_iterations = 0;

    debug!(
        length,
        variant = geometry.variant.name(),
        initial_level = state.water_level,
        floor,
        dt,
        "drain started"
    );

    let termination = loop {
        if let Some(termination) = stop_reason(state.water_level, floor, length) {
            break termination;
        }
        if state.steps >= opts.max_steps {
            return Err(SimError::StepLimit {
                max_steps: opts.max_steps,
                water_level: state.water_level,
            });
        }

        let regime = state.regime(opts.regime_policy);
        let flow = resolver.resolve(state.water_level, regime, state.seed)?;
        resolver_iterations += flow.iterations;

        let flow_rate = flow.pipe.velocity * pipe_area;
        let next_level = state.water_level - flow_rate * dt / tank_area;
        state.advance(next_level, dt, &flow)?;

        if let Some(every) = opts.record_every {
            let record = StepRecord {
                step: state.steps,
                t: state.elapsed_s,
                water_level: state.water_level,
                regime,
                pipe: flow.pipe,
                joint: flow.joint,
                flow_rate,
                iterations: flow.iterations,
            };
            if state.steps % every == 0 {
                records.push(record);
            }
            last = Some(record);
        }
    };

    // Always record final step
    if let Some(record) = last {
        if records.last().map(|r| r.step) != Some(record.step) {
            records.push(record);
        }
    }

    debug!(
        length,
        drain_time_s = state.elapsed_s,
        steps = state.steps,
        %termination,
        "drain finished"
    );

    Ok(DrainOutcome {
        drain_time_s: state.elapsed_s,
        steps: state.steps,
        final_level: state.water_level,
        termination,
        resolver_iterations,
        records,
    })
}

/// Termination at this water level, if the run has to stop.
fn stop_reason(water_level: f64, floor: f64, length: f64) -> Option<Termination> {
    if water_level <= floor {
        return Some(Termination::ReachedFloor);
    }
    // Guard: a validated tank keeps the level above a positive floor, which
    // leaves positive head. Only a tank that skipped validation gets here.
    if available_head(water_level, length) <= 0.0 {
        warn!(length, water_level, "no driving head left, stopping");
        return Some(Termination::HeadExhausted);
    }
    None
}
