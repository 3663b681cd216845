//! Constant fluid properties for one simulation run.

use crate::error::ComponentResult;
use td_core::numeric::ensure_positive;
use td_core::units::{Accel, Density, DynVisc, constants, kg_per_m3, pa_s};

/// Density, viscosity and gravity, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidProperties {
    /// Fluid density
    pub density: Density,
    /// Dynamic viscosity
    pub viscosity: DynVisc,
    /// Gravitational acceleration
    pub gravity: Accel,
}

impl FluidProperties {
    /// Create validated fluid properties.
    pub fn new(density: Density, viscosity: DynVisc, gravity: Accel) -> ComponentResult<Self> {
        let fluid = Self {
            density,
            viscosity,
            gravity,
        };
        fluid.validate()?;
        Ok(fluid)
    }

    /// Water as characterised on the drain rig.
    pub fn water() -> Self {
        Self {
            density: kg_per_m3(constants::WATER_DENSITY_KG_M3),
            viscosity: pa_s(constants::WATER_VISCOSITY_PA_S),
            gravity: constants::g_rig(),
        }
    }

    /// All properties must be finite and positive.
    pub fn validate(&self) -> ComponentResult<()> {
        ensure_positive(self.density.value, "fluid density")?;
        ensure_positive(self.viscosity.value, "fluid viscosity")?;
        ensure_positive(self.gravity.value, "gravitational acceleration")?;
        Ok(())
    }

    /// Kinematic viscosity in m²/s.
    #[inline]
    pub fn kinematic_viscosity(&self) -> f64 {
        self.viscosity.value / self.density.value
    }
}
