//! Friction resolver: joint fixed point of velocity and friction factor at a
//! fixed water level.
//!
//! Each iteration computes velocity from the current friction factor(s),
//! Reynolds number(s) from velocity, and new friction factor(s) from the
//! friction law of the requested [`Regime`]. The regime itself is chosen by
//! the caller and does not change during the iteration.

use crate::equations::{
    ColebrookLog, colebrook_friction_factor, joint_velocity, laminar_friction_factor, reynolds,
    velocity_plain_pipe, velocity_tjoint_pipe, velocity_weighted_pipe, weighted_diameter,
};
use crate::error::{ComponentError, ComponentResult};
use crate::fluid::FluidProperties;
use crate::geometry::{GeometryVariant, PipeGeometry};
use crate::regime::Regime;
use td_solver::RootConfig;
use tracing::trace;

/// Instantaneous quasi-steady flow in one conduit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowState {
    /// Mean velocity (m/s)
    pub velocity: f64,
    /// Darcy friction factor
    pub friction_factor: f64,
    /// Reynolds number
    pub reynolds: f64,
}

/// Converged flow for one water level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedFlow {
    /// Flow in the pipe
    pub pipe: FlowState,
    /// Flow in the T-joint outlet, when its friction is tracked separately
    pub joint: Option<FlowState>,
    /// Fixed-point iterations used
    pub iterations: usize,
}

/// Starting friction factors for the fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionSeed {
    pub pipe: f64,
    pub joint: Option<f64>,
}

impl FrictionSeed {
    pub fn new(pipe: f64) -> Self {
        Self { pipe, joint: None }
    }

    pub fn with_joint(pipe: f64, joint: f64) -> Self {
        Self {
            pipe,
            joint: Some(joint),
        }
    }

    /// Warm start from a converged flow.
    pub fn from_flow(flow: &ResolvedFlow) -> Self {
        Self {
            pipe: flow.pipe.friction_factor,
            joint: flow.joint.map(|j| j.friction_factor),
        }
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverConfig {
    /// Convergence tolerance on friction factor change; `None` uses the
    /// geometry's default.
    pub tolerance: Option<f64>,
    /// Maximum fixed-point iterations
    pub max_iterations: usize,
    /// Logarithm in the Colebrook-White relation
    pub colebrook_log: ColebrookLog,
    /// Root finder settings for the turbulent friction law
    pub root: RootConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tolerance: None,
            max_iterations: 300,
            colebrook_log: ColebrookLog::default(),
            root: RootConfig::default(),
        }
    }
}

/// Resolver bound to one fluid and one pipe geometry.
#[derive(Debug, Clone)]
pub struct FrictionResolver {
    fluid: FluidProperties,
    geometry: PipeGeometry,
    config: ResolverConfig,
    tolerance: f64,
}

impl FrictionResolver {
    pub fn new(
        fluid: FluidProperties,
        geometry: PipeGeometry,
        config: ResolverConfig,
    ) -> ComponentResult<Self> {
        fluid.validate()?;
        geometry.validate()?;
        if config.max_iterations == 0 {
            return Err(ComponentError::InvalidArg {
                what: "max_iterations must be positive",
            });
        }
        let tolerance = config
            .tolerance
            .unwrap_or_else(|| geometry.default_tolerance());
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(ComponentError::InvalidArg {
                what: "friction tolerance must be positive",
            });
        }

        Ok(Self {
            fluid,
            geometry,
            config,
            tolerance,
        })
    }

    pub fn fluid(&self) -> &FluidProperties {
        &self.fluid
    }

    pub fn geometry(&self) -> &PipeGeometry {
        &self.geometry
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Seed with the joint guess filled in when the geometry needs one.
    pub fn complete_seed(&self, seed: FrictionSeed) -> FrictionSeed {
        if self.geometry.variant.tracks_joint_friction() {
            FrictionSeed {
                pipe: seed.pipe,
                joint: Some(seed.joint.unwrap_or(seed.pipe)),
            }
        } else {
            FrictionSeed::new(seed.pipe)
        }
    }

    /// Iterate velocity and friction factor to a joint fixed point.
    ///
    /// Converged once every tracked friction factor moves by less than the
    /// tolerance in one iteration. The returned velocity and Reynolds number
    /// are those that produced the returned friction factor.
    pub fn resolve(
        &self,
        water_level: f64,
        regime: Regime,
        seed: FrictionSeed,
    ) -> ComponentResult<ResolvedFlow> {
        let mut guess = self.complete_seed(seed);
        check_seed(guess.pipe)?;
        if let Some(j) = guess.joint {
            check_seed(j)?;
        }

        for iteration in 1..=self.config.max_iterations {
            let (pipe, joint) = self.iterate(water_level, regime, &guess)?;

            let pipe_change = (pipe.friction_factor - guess.pipe).abs();
            let joint_change = match (joint, guess.joint) {
                (Some(j), Some(prev)) => (j.friction_factor - prev).abs(),
                _ => 0.0,
            };
            trace!(
                iteration,
                velocity = pipe.velocity,
                friction_factor = pipe.friction_factor,
                reynolds = pipe.reynolds,
                pipe_change,
                joint_change,
                "friction iteration"
            );

            if pipe_change < self.tolerance && joint_change < self.tolerance {
                return Ok(ResolvedFlow {
                    pipe,
                    joint,
                    iterations: iteration,
                });
            }

            guess = FrictionSeed {
                pipe: pipe.friction_factor,
                joint: joint.map(|j| j.friction_factor),
            };
        }

        Err(ComponentError::ConvergenceFailed {
            what: format!(
                "friction factor did not converge in {} iterations ({} regime, water level {:.4} m, last f = {:.6})",
                self.config.max_iterations, regime, water_level, guess.pipe
            ),
        })
    }

    fn iterate(
        &self,
        water_level: f64,
        regime: Regime,
        guess: &FrictionSeed,
    ) -> ComponentResult<(FlowState, Option<FlowState>)> {
        let length = self.geometry.length.value;
        let diameter = self.geometry.diameter.value;

        match &self.geometry.variant {
            GeometryVariant::Plain => {
                let v = velocity_plain_pipe(&self.fluid, length, diameter, guess.pipe, water_level)?;
                let pipe = self.flow_state(regime, v, diameter, guess.pipe)?;
                Ok((pipe, None))
            }
            GeometryVariant::TJoint(joint) => {
                let f_joint = guess.joint.unwrap_or(guess.pipe);
                let v = velocity_tjoint_pipe(
                    &self.fluid,
                    length,
                    diameter,
                    joint,
                    guess.pipe,
                    f_joint,
                    water_level,
                )?;
                let pipe = self.flow_state(regime, v, diameter, guess.pipe)?;
                let vj = joint_velocity(joint, diameter, v);
                let joint_state = self.flow_state(regime, vj, joint.diameter.value, f_joint)?;
                Ok((pipe, Some(joint_state)))
            }
            GeometryVariant::TJointWeighted(joint) => {
                let d_w = weighted_diameter(length, diameter, joint);
                let v = velocity_weighted_pipe(
                    &self.fluid,
                    length,
                    diameter,
                    joint,
                    guess.pipe,
                    water_level,
                )?;
                let pipe = self.flow_state(regime, v, d_w, guess.pipe)?;
                Ok((pipe, None))
            }
        }
    }

    fn flow_state(
        &self,
        regime: Regime,
        velocity: f64,
        diameter: f64,
        f_current: f64,
    ) -> ComponentResult<FlowState> {
        let re = reynolds(&self.fluid, velocity, diameter);
        let friction_factor = match regime {
            Regime::Laminar => laminar_friction_factor(re)?,
            Regime::Turbulent => colebrook_friction_factor(
                re,
                self.geometry.roughness.value,
                diameter,
                self.config.colebrook_log,
                f_current,
                &self.config.root,
            )?,
        };
        Ok(FlowState {
            velocity,
            friction_factor,
            reynolds: re,
        })
    }
}

fn check_seed(f: f64) -> ComponentResult<()> {
    if f > 0.0 && f.is_finite() {
        Ok(())
    } else {
        Err(ComponentError::InvalidArg {
            what: "friction factor seed must be positive and finite",
        })
    }
}
