//! Laminar/turbulent regime selection.

use std::fmt;
use td_core::numeric::CRITICAL_REYNOLDS;

/// Friction law applied during one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Hagen-Poiseuille, `f = 64/Re`
    Laminar,
    /// Colebrook-White
    Turbulent,
}

impl Regime {
    /// Regime implied by a Reynolds number.
    #[inline]
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds > CRITICAL_REYNOLDS {
            Self::Turbulent
        } else {
            Self::Laminar
        }
    }

    /// Regime for the next step given the Reynolds number the previous step
    /// ended with. Before the first step the flow is assumed turbulent.
    #[inline]
    pub fn from_previous(last_reynolds: Option<f64>) -> Self {
        last_reynolds.map_or(Self::Turbulent, Self::from_reynolds)
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laminar => write!(f, "laminar"),
            Self::Turbulent => write!(f, "turbulent"),
        }
    }
}

/// How the drain loop picks a regime each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegimePolicy {
    /// Follow the previous step's Reynolds number (one step behind).
    #[default]
    Lagged,
    /// Hagen-Poiseuille throughout.
    Laminar,
    /// Colebrook-White throughout.
    Turbulent,
}

impl RegimePolicy {
    pub fn select(self, last_reynolds: Option<f64>) -> Regime {
        match self {
            Self::Lagged => Regime::from_previous(last_reynolds),
            Self::Laminar => Regime::Laminar,
            Self::Turbulent => Regime::Turbulent,
        }
    }
}
