//! Configuration validation.

use crate::schema::{SimulationConfig, SweepDef, TJointDef, TankDef};

/// Upper bound on points in one length sweep.
pub const MAX_SWEEP_POINTS: usize = 100_000;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive and finite"))
    }
}

pub fn validate_config(config: &SimulationConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    positive("fluid.density_kg_m3", config.fluid.density_kg_m3)?;
    positive("fluid.viscosity_pa_s", config.fluid.viscosity_pa_s)?;
    positive("fluid.gravity_m_s2", config.fluid.gravity_m_s2)?;

    positive("pipe.diameter_m", config.pipe.diameter_m)?;
    if !config.pipe.roughness_m.is_finite() || config.pipe.roughness_m < 0.0 {
        return Err(invalid(
            "pipe.roughness_m",
            config.pipe.roughness_m,
            "must be non-negative and finite",
        ));
    }
    check_relative_roughness("pipe.roughness_m", config.pipe.roughness_m, config.pipe.diameter_m)?;

    if let Some(tjoint) = &config.tjoint {
        validate_tjoint(tjoint, config.pipe.roughness_m)?;
    }

    validate_tank(&config.tank)?;

    positive("time.dt_s", config.time.dt_s)?;
    if config.time.max_steps == 0 {
        return Err(invalid("time.max_steps", 0, "must be positive"));
    }

    let solver = &config.solver;
    positive("solver.initial_friction", solver.initial_friction)?;
    if let Some(f) = solver.initial_joint_friction {
        positive("solver.initial_joint_friction", f)?;
    }
    if let Some(tol) = solver.tolerance {
        positive("solver.tolerance", tol)?;
    }
    if solver.max_iterations == 0 {
        return Err(invalid("solver.max_iterations", 0, "must be positive"));
    }

    validate_sweep(&config.sweep)
}

/// Colebrook-White has no root once ε/d/3.7 reaches one.
fn check_relative_roughness(field: &str, roughness: f64, diameter: f64) -> Result<(), ValidationError> {
    let term = roughness / diameter / 3.7;
    if term >= 1.0 {
        return Err(invalid(
            field,
            roughness,
            "relative roughness too large for Colebrook-White (ε/d/3.7 must stay below 1)",
        ));
    }
    Ok(())
}

fn validate_tjoint(tjoint: &TJointDef, roughness: f64) -> Result<(), ValidationError> {
    positive("tjoint.diameter_m", tjoint.diameter_m)?;
    positive("tjoint.length_m", tjoint.length_m)?;
    positive("tjoint.branch_fraction", tjoint.branch_fraction)?;
    if tjoint.branch_fraction > 1.0 {
        return Err(invalid(
            "tjoint.branch_fraction",
            tjoint.branch_fraction,
            "cannot exceed 1",
        ));
    }
    if !tjoint.loss_coefficient.is_finite() || tjoint.loss_coefficient < 0.0 {
        return Err(invalid(
            "tjoint.loss_coefficient",
            tjoint.loss_coefficient,
            "must be non-negative and finite",
        ));
    }
    check_relative_roughness("pipe.roughness_m", roughness, tjoint.diameter_m)
}

fn validate_tank(tank: &TankDef) -> Result<(), ValidationError> {
    positive("tank.area_m2", tank.area_m2)?;
    positive("tank.initial_level_m", tank.initial_level_m)?;
    positive("tank.floor_m", tank.floor_m)?;
    if tank.floor_m >= tank.initial_level_m {
        return Err(invalid(
            "tank.floor_m",
            tank.floor_m,
            "must lie below the initial water level",
        ));
    }
    Ok(())
}

fn validate_sweep(sweep: &SweepDef) -> Result<(), ValidationError> {
    positive("sweep.start_m", sweep.start_m)?;
    positive("sweep.step_m", sweep.step_m)?;
    if !sweep.end_m.is_finite() || sweep.end_m < sweep.start_m {
        return Err(invalid(
            "sweep.end_m",
            sweep.end_m,
            "must be finite and not below sweep.start_m",
        ));
    }
    let span = (sweep.end_m - sweep.start_m) / sweep.step_m;
    if !span.is_finite() || span >= MAX_SWEEP_POINTS as f64 {
        return Err(invalid(
            "sweep.step_m",
            sweep.step_m,
            "too small for the sweep range (too many points)",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        validate_config(&SimulationConfig::default()).unwrap();
        validate_config(&SimulationConfig::tjoint_rig()).unwrap();
        validate_config(&SimulationConfig::laminar_rig()).unwrap();
    }

    #[test]
    fn future_version_is_rejected() {
        let config = SimulationConfig {
            version: crate::LATEST_VERSION + 1,
            ..SimulationConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion {
                version: crate::LATEST_VERSION + 1
            })
        );
    }

    #[test]
    fn floor_must_be_below_initial_level() {
        let mut config = SimulationConfig::default();
        config.tank.floor_m = 0.1;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("tank.floor_m"));
    }

    #[test]
    fn floor_at_pipe_entrance_is_rejected() {
        let mut config = SimulationConfig::default();
        config.tank.floor_m = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn excessive_roughness_is_rejected() {
        let mut config = SimulationConfig::default();
        config.pipe.roughness_m = 0.03;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("Colebrook"));
    }

    #[test]
    fn nan_viscosity_is_rejected() {
        let mut config = SimulationConfig::default();
        config.fluid.viscosity_pa_s = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn sweep_bounds() {
        let mut config = SimulationConfig::default();
        config.sweep.end_m = 0.01;
        assert!(validate_config(&config).is_err());

        let mut config = SimulationConfig::default();
        config.sweep.step_m = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = SimulationConfig::default();
        config.sweep.end_m = config.sweep.start_m;
        validate_config(&config).unwrap();
    }

    #[test]
    fn subnormal_sweep_step_is_rejected() {
        let mut config = SimulationConfig::default();
        config.sweep.step_m = 1e-320;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("sweep.step_m"));

        let mut config = SimulationConfig::default();
        config.sweep.step_m = 1e-6;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn branch_fraction_above_one_is_rejected() {
        let mut config = SimulationConfig::tjoint_rig();
        if let Some(tjoint) = config.tjoint.as_mut() {
            tjoint.branch_fraction = 1.5;
        }
        assert!(validate_config(&config).is_err());
    }
}
