//! Translation of a configuration file into simulation inputs.

use td_components::{
    ColebrookLog, FluidProperties, FrictionSeed, GeometryVariant, PipeGeometry, RegimePolicy,
    ResolverConfig, TJoint,
};
use td_core::units::{kg_per_m3, m, m2, mps2, pa_s};
use td_project::schema::{ColebrookLogDef, RegimeDef, SimulationConfig, TJointDef};
use td_sim::{DrainOptions, TankSpec};

use crate::error::AppResult;

/// Everything needed to drain the tank at any pipe length.
#[derive(Debug, Clone)]
pub struct DrainSetup {
    pub fluid: FluidProperties,
    pub diameter_m: f64,
    pub roughness_m: f64,
    pub variant: GeometryVariant,
    pub tank: TankSpec,
    pub options: DrainOptions,
}

impl DrainSetup {
    pub fn from_config(config: &SimulationConfig) -> AppResult<Self> {
        let fluid = FluidProperties::new(
            kg_per_m3(config.fluid.density_kg_m3),
            pa_s(config.fluid.viscosity_pa_s),
            mps2(config.fluid.gravity_m_s2),
        )?;

        Ok(Self {
            fluid,
            diameter_m: config.pipe.diameter_m,
            roughness_m: config.pipe.roughness_m,
            variant: compile_variant(config.tjoint.as_ref()),
            tank: TankSpec {
                area: m2(config.tank.area_m2),
                initial_level: m(config.tank.initial_level_m),
                floor: m(config.tank.floor_m),
            },
            options: compile_options(config),
        })
    }

    /// Pipe of the given length. Not validated here; the drain run rejects
    /// an unusable geometry as a configuration error.
    pub fn geometry(&self, length_m: f64) -> PipeGeometry {
        PipeGeometry {
            length: m(length_m),
            diameter: m(self.diameter_m),
            roughness: m(self.roughness_m),
            variant: self.variant,
        }
    }
}

fn compile_variant(tjoint: Option<&TJointDef>) -> GeometryVariant {
    match tjoint {
        None => GeometryVariant::Plain,
        Some(def) => {
            let joint = TJoint {
                diameter: m(def.diameter_m),
                length: m(def.length_m),
                branch_fraction: def.branch_fraction,
                loss_coefficient: def.loss_coefficient,
            };
            if def.weighted {
                GeometryVariant::TJointWeighted(joint)
            } else {
                GeometryVariant::TJoint(joint)
            }
        }
    }
}

fn compile_options(config: &SimulationConfig) -> DrainOptions {
    let solver = &config.solver;
    let initial_seed = match solver.initial_joint_friction {
        Some(joint) => FrictionSeed::with_joint(solver.initial_friction, joint),
        None => FrictionSeed::new(solver.initial_friction),
    };

    DrainOptions {
        dt: config.time.dt_s,
        max_steps: config.time.max_steps,
        record_every: None,
        regime_policy: match solver.regime {
            RegimeDef::Lagged => RegimePolicy::Lagged,
            RegimeDef::Laminar => RegimePolicy::Laminar,
            RegimeDef::Turbulent => RegimePolicy::Turbulent,
        },
        initial_seed,
        resolver: ResolverConfig {
            tolerance: solver.tolerance,
            max_iterations: solver.max_iterations,
            colebrook_log: match solver.colebrook_log {
                ColebrookLogDef::Base10 => ColebrookLog::Base10,
                ColebrookLogDef::Natural => ColebrookLog::Natural,
            },
            ..ResolverConfig::default()
        },
    }
}
