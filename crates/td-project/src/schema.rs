//! Configuration file schema.
//!
//! Every section and field has a default, and the defaults describe the
//! reference drain rig: a 0.32 m × 0.26 m tank filled to 10 cm, drained to
//! 2 cm through a 7.94 mm bore pipe.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    pub pipe: PipeDef,
    pub tjoint: Option<TJointDef>,
    pub tank: TankDef,
    pub time: TimeDef,
    pub solver: SolverDef,
    pub sweep: SweepDef,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: "reference rig".to_string(),
            fluid: FluidDef::default(),
            pipe: PipeDef::default(),
            tjoint: None,
            tank: TankDef::default(),
            time: TimeDef::default(),
            solver: SolverDef::default(),
            sweep: SweepDef::default(),
        }
    }
}

impl SimulationConfig {
    /// Reference rig with the T-joint outlet fitted. Both friction factors
    /// are seeded at 0.03, the rig's tee starting guess.
    pub fn tjoint_rig() -> Self {
        Self {
            name: "t-joint rig".to_string(),
            tjoint: Some(TJointDef::default()),
            solver: SolverDef {
                initial_friction: 0.03,
                initial_joint_friction: Some(0.03),
                ..SolverDef::default()
            },
            ..Self::default()
        }
    }

    /// Laminar-only model of the rig: colder water, Hagen-Poiseuille every
    /// step, swept in 1 cm increments.
    pub fn laminar_rig() -> Self {
        Self {
            name: "laminar rig".to_string(),
            fluid: FluidDef {
                viscosity_pa_s: 0.0008891,
                ..FluidDef::default()
            },
            solver: SolverDef {
                regime: RegimeDef::Laminar,
                ..SolverDef::default()
            },
            sweep: SweepDef {
                start_m: 0.01,
                end_m: 1.0,
                step_m: 0.01,
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FluidDef {
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
    pub gravity_m_s2: f64,
}

impl Default for FluidDef {
    fn default() -> Self {
        Self {
            density_kg_m3: 997.0,
            viscosity_pa_s: 0.001,
            gravity_m_s2: 9.81,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipeDef {
    pub diameter_m: f64,
    pub roughness_m: f64,
}

impl Default for PipeDef {
    fn default() -> Self {
        Self {
            diameter_m: 0.00794,
            roughness_m: 0.0024,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TJointDef {
    pub diameter_m: f64,
    pub length_m: f64,
    /// Share of the pipe flow leaving through one outlet
    pub branch_fraction: f64,
    /// Minor loss of the tee itself
    pub loss_coefficient: f64,
    /// Model pipe and joint as one conduit of length-weighted diameter
    pub weighted: bool,
}

impl Default for TJointDef {
    fn default() -> Self {
        Self {
            diameter_m: 0.0111125,
            length_m: 0.04,
            branch_fraction: 0.5,
            loss_coefficient: 1.0,
            weighted: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TankDef {
    pub area_m2: f64,
    /// Measured from the pipe entrance
    pub initial_level_m: f64,
    pub floor_m: f64,
}

impl Default for TankDef {
    fn default() -> Self {
        Self {
            area_m2: 0.0832,
            initial_level_m: 0.1,
            floor_m: 0.02,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeDef {
    pub dt_s: f64,
    pub max_steps: usize,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            dt_s: 0.005,
            max_steps: 10_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverDef {
    pub initial_friction: f64,
    /// Falls back to `initial_friction` when absent
    pub initial_joint_friction: Option<f64>,
    /// Falls back to the geometry's default when absent
    pub tolerance: Option<f64>,
    pub max_iterations: usize,
    pub colebrook_log: ColebrookLogDef,
    pub regime: RegimeDef,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            initial_friction: 0.019,
            initial_joint_friction: None,
            tolerance: None,
            max_iterations: 300,
            colebrook_log: ColebrookLogDef::default(),
            regime: RegimeDef::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColebrookLogDef {
    Base10,
    #[default]
    Natural,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegimeDef {
    #[default]
    Lagged,
    Laminar,
    Turbulent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepDef {
    pub start_m: f64,
    pub end_m: f64,
    pub step_m: f64,
}

impl Default for SweepDef {
    fn default() -> Self {
        Self {
            start_m: 0.05,
            end_m: 1.0,
            step_m: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_reference_rig() {
        let config: SimulationConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert!(config.tjoint.is_none());
        assert_eq!(config.solver.regime, RegimeDef::Lagged);
        assert_eq!(config.solver.colebrook_log, ColebrookLogDef::Natural);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let yaml = "fluid:\n  viscosity_pa_s: 0.002\nsolver:\n  colebrook_log: base10\n";
        let config: SimulationConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.fluid.viscosity_pa_s, 0.002);
        assert_eq!(config.fluid.density_kg_m3, 997.0);
        assert_eq!(config.solver.colebrook_log, ColebrookLogDef::Base10);
        assert_eq!(config.solver.max_iterations, 300);
    }

    #[test]
    fn enums_use_snake_case() {
        let yaml = serde_yaml::to_string(&SimulationConfig::laminar_rig()).unwrap();
        assert!(yaml.contains("regime: laminar"));
        assert!(yaml.contains("colebrook_log: natural"));
    }
}
