//! Equation library: Reynolds number, friction laws and the head-loss
//! balances that give pipe velocity for a friction factor.
//!
//! All functions take SI values as plain `f64` and are free of state. The
//! head-loss balances run from the tank surface to the outlet(s):
//!
//! ```text
//! plain:     2g·H = v²·[K₀ + f·L/d]
//! T-joint:   2g·H = v²·[K₀ + K_tee + f_p·L/d + r²·(1 + f_t·L_t/d_t)]
//! weighted:  2g·H = v²·[K₀ + K_tee + f·(L + L_t)/D_w + r²]
//! ```
//!
//! with `H = WL + L/150`, `K₀ = 0.5` the fitted entrance/exit loss, `r` the
//! outlet-to-pipe velocity ratio of the tee and `D_w` the length-weighted
//! diameter. Velocities are pipe velocities.

use crate::common::{ENTRANCE_EXIT_LOSS, available_head, check_finite, checked_sqrt};
use crate::error::{ComponentError, ComponentResult};
use crate::fluid::FluidProperties;
use crate::geometry::TJoint;
use td_solver::{RootConfig, solve_root};

/// Logarithm used in the Colebrook-White relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColebrookLog {
    /// Textbook Colebrook-White.
    Base10,
    /// Natural logarithm, the form the drain rig is calibrated against.
    #[default]
    Natural,
}

impl ColebrookLog {
    #[inline]
    fn apply(self, v: f64) -> f64 {
        match self {
            Self::Base10 => v.log10(),
            Self::Natural => v.ln(),
        }
    }
}

/// Reynolds number `ρ·v·d/μ`. Zero velocity gives zero.
#[inline]
pub fn reynolds(fluid: &FluidProperties, velocity: f64, diameter: f64) -> f64 {
    fluid.density.value * velocity * diameter / fluid.viscosity.value
}

/// Hagen-Poiseuille friction factor `64/Re`.
pub fn laminar_friction_factor(reynolds: f64) -> ComponentResult<f64> {
    if !(reynolds > 0.0) || !reynolds.is_finite() {
        return Err(ComponentError::Domain {
            what: "laminar Reynolds number",
            value: reynolds,
        });
    }
    Ok(64.0 / reynolds)
}

/// Colebrook-White residual in `x = 1/sqrt(f)`:
/// `x + 2·log(ε/d/3.7 + 2.51/Re·x)`.
pub fn colebrook_residual(
    x: f64,
    reynolds: f64,
    roughness: f64,
    diameter: f64,
    log: ColebrookLog,
) -> ComponentResult<f64> {
    let arg = roughness / diameter / 3.7 + 2.51 / reynolds * x;
    if !(arg > 0.0) || !arg.is_finite() {
        return Err(ComponentError::Domain {
            what: "Colebrook logarithm argument",
            value: arg,
        });
    }
    Ok(x + 2.0 * log.apply(arg))
}

/// Turbulent friction factor from Colebrook-White, searched from `f_guess`.
pub fn colebrook_friction_factor(
    reynolds: f64,
    roughness: f64,
    diameter: f64,
    log: ColebrookLog,
    f_guess: f64,
    root: &RootConfig,
) -> ComponentResult<f64> {
    if !(reynolds > 0.0) || !reynolds.is_finite() {
        return Err(ComponentError::Domain {
            what: "turbulent Reynolds number",
            value: reynolds,
        });
    }
    if !(f_guess > 0.0) || !f_guess.is_finite() {
        return Err(ComponentError::InvalidArg {
            what: "friction factor guess must be positive",
        });
    }

    let x0 = 1.0 / f_guess.sqrt();
    let sol = solve_root(
        |x| colebrook_residual(x, reynolds, roughness, diameter, log),
        x0,
        0.0,
        root,
    )?;
    let f = 1.0 / (sol.x * sol.x);
    check_finite(f, "turbulent friction factor")?;
    Ok(f)
}

/// Pipe velocity for a straight pipe.
pub fn velocity_plain_pipe(
    fluid: &FluidProperties,
    length: f64,
    diameter: f64,
    friction_factor: f64,
    water_level: f64,
) -> ComponentResult<f64> {
    let resistance = ENTRANCE_EXIT_LOSS + length * friction_factor / diameter;
    velocity_from_balance(fluid, available_head(water_level, length), resistance)
}

/// Pipe velocity for a pipe discharging through a T-joint, with separate
/// friction factors for pipe and joint.
pub fn velocity_tjoint_pipe(
    fluid: &FluidProperties,
    length: f64,
    diameter: f64,
    joint: &TJoint,
    f_pipe: f64,
    f_joint: f64,
    water_level: f64,
) -> ComponentResult<f64> {
    let r = joint.velocity_ratio(diameter);
    let joint_loss = 1.0 + f_joint * joint.length.value / joint.diameter.value;
    let resistance = ENTRANCE_EXIT_LOSS
        + joint.loss_coefficient
        + f_pipe * length / diameter
        + r * r * joint_loss;
    velocity_from_balance(fluid, available_head(water_level, length), resistance)
}

/// Velocity in the T-joint outlet for a given pipe velocity.
#[inline]
pub fn joint_velocity(joint: &TJoint, pipe_diameter: f64, pipe_velocity: f64) -> f64 {
    joint.velocity_ratio(pipe_diameter) * pipe_velocity
}

/// Length-weighted mean of pipe and joint bores.
#[inline]
pub fn weighted_diameter(length: f64, diameter: f64, joint: &TJoint) -> f64 {
    let lt = joint.length.value;
    (length * diameter + lt * joint.diameter.value) / (length + lt)
}

/// Pipe velocity for pipe and T-joint lumped into one conduit of
/// length-weighted diameter.
pub fn velocity_weighted_pipe(
    fluid: &FluidProperties,
    length: f64,
    diameter: f64,
    joint: &TJoint,
    friction_factor: f64,
    water_level: f64,
) -> ComponentResult<f64> {
    let r = joint.velocity_ratio(diameter);
    let d_w = weighted_diameter(length, diameter, joint);
    let resistance = ENTRANCE_EXIT_LOSS
        + joint.loss_coefficient
        + friction_factor * (length + joint.length.value) / d_w
        + r * r;
    velocity_from_balance(fluid, available_head(water_level, length), resistance)
}

fn velocity_from_balance(
    fluid: &FluidProperties,
    head: f64,
    resistance: f64,
) -> ComponentResult<f64> {
    if !(resistance > 0.0) {
        return Err(ComponentError::Domain {
            what: "head-loss resistance",
            value: resistance,
        });
    }
    let v = checked_sqrt(2.0 * fluid.gravity.value * head / resistance, "velocity radicand")?;
    check_finite(v, "velocity")?;
    Ok(v)
}
