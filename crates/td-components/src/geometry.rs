//! Drain pipe geometry, with an optional T-joint at the outlet.

use crate::error::{ComponentError, ComponentResult};
use td_core::numeric::{circle_area, ensure_finite, ensure_positive};
use td_core::units::{Length, m};

/// Tolerance on friction factor change for a straight pipe.
pub const PLAIN_TOLERANCE: f64 = 1e-4;

/// Tolerance on friction factor change when a T-joint is fitted.
pub const TJOINT_TOLERANCE: f64 = 1e-3;

/// T fitting at the pipe outlet. The flow splits between its outlets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TJoint {
    /// Bore of the T fitting
    pub diameter: Length,
    /// Flow length through the T fitting
    pub length: Length,
    /// Share of the pipe flow leaving through one outlet
    pub branch_fraction: f64,
    /// Loss coefficient of the tee, referred to pipe velocity
    pub loss_coefficient: f64,
}

impl TJoint {
    /// The 7/16" tee fitted on the drain rig.
    pub fn rig() -> Self {
        Self {
            diameter: m(0.0111125),
            length: m(0.04),
            branch_fraction: 0.5,
            loss_coefficient: 1.0,
        }
    }

    /// Outlet velocity divided by pipe velocity.
    #[inline]
    pub fn velocity_ratio(&self, pipe_diameter: f64) -> f64 {
        self.branch_fraction * (pipe_diameter / self.diameter.value).powi(2)
    }

    fn validate(&self) -> ComponentResult<()> {
        ensure_positive(self.diameter.value, "T-joint diameter")?;
        ensure_positive(self.length.value, "T-joint length")?;
        let fraction = ensure_finite(self.branch_fraction, "T-joint branch fraction")?;
        if fraction <= 0.0 || fraction > 1.0 {
            return Err(ComponentError::InvalidArg {
                what: "T-joint branch fraction must lie in (0, 1]",
            });
        }
        let k = ensure_finite(self.loss_coefficient, "T-joint loss coefficient")?;
        if k < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "T-joint loss coefficient must be non-negative",
            });
        }
        Ok(())
    }
}

/// How the pipe outlet is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GeometryVariant {
    /// Straight pipe discharging to atmosphere.
    #[default]
    Plain,
    /// Pipe and T-joint with separate friction factors.
    TJoint(TJoint),
    /// Pipe and T-joint lumped into one conduit of length-weighted diameter.
    TJointWeighted(TJoint),
}

impl GeometryVariant {
    pub fn joint(&self) -> Option<&TJoint> {
        match self {
            Self::Plain => None,
            Self::TJoint(j) | Self::TJointWeighted(j) => Some(j),
        }
    }

    /// Whether a separate joint friction factor is tracked.
    pub fn tracks_joint_friction(&self) -> bool {
        matches!(self, Self::TJoint(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::TJoint(_) => "tjoint",
            Self::TJointWeighted(_) => "tjoint-weighted",
        }
    }
}

/// Pipe between the tank and the outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeGeometry {
    /// Pipe length
    pub length: Length,
    /// Pipe inner diameter
    pub diameter: Length,
    /// Surface roughness (absolute)
    pub roughness: Length,
    /// Outlet fitting
    pub variant: GeometryVariant,
}

impl PipeGeometry {
    /// Create a validated pipe geometry.
    pub fn new(
        length: Length,
        diameter: Length,
        roughness: Length,
        variant: GeometryVariant,
    ) -> ComponentResult<Self> {
        let geometry = Self {
            length,
            diameter,
            roughness,
            variant,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// The same pipe cut to a different length.
    pub fn with_length(&self, length: Length) -> ComponentResult<Self> {
        Self::new(length, self.diameter, self.roughness, self.variant)
    }

    pub fn validate(&self) -> ComponentResult<()> {
        ensure_positive(self.length.value, "pipe length")?;
        ensure_positive(self.diameter.value, "pipe diameter")?;
        let roughness = ensure_finite(self.roughness.value, "pipe roughness")?;
        if roughness < 0.0 {
            return Err(ComponentError::InvalidArg {
                what: "pipe roughness must be non-negative",
            });
        }

        // Colebrook-White has no root once ε/d/3.7 reaches 1. The weighted
        // diameter never drops below the smaller bore.
        let mut smallest_bore = self.diameter.value;
        if let Some(joint) = self.variant.joint() {
            joint.validate()?;
            if matches!(self.variant, GeometryVariant::TJointWeighted(_)) {
                smallest_bore = smallest_bore.min(joint.diameter.value);
            }
        }
        if roughness / smallest_bore / 3.7 >= 1.0 {
            return Err(ComponentError::InvalidArg {
                what: "relative roughness too large for Colebrook-White",
            });
        }
        Ok(())
    }

    /// Flow cross-section of the pipe.
    #[inline]
    pub fn flow_area(&self) -> f64 {
        circle_area(self.diameter.value)
    }

    /// Friction factor convergence tolerance suited to this variant.
    pub fn default_tolerance(&self) -> f64 {
        match self.variant {
            GeometryVariant::Plain => PLAIN_TOLERANCE,
            GeometryVariant::TJoint(_) | GeometryVariant::TJointWeighted(_) => TJOINT_TOLERANCE,
        }
    }
}
