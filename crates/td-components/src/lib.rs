//! td-components: hydraulic model of a tank draining through a pipe.
//!
//! Provides:
//! - the equation library (Reynolds number, Hagen-Poiseuille and
//!   Colebrook-White friction laws, head-loss balances)
//! - pipe geometry with an optional T-joint outlet
//! - regime selection
//! - the friction resolver, which finds the velocity/friction factor fixed
//!   point for a given water level
//!
//! # Example
//!
//! ```no_run
//! use td_components::{
//!     FluidProperties, FrictionResolver, FrictionSeed, GeometryVariant, PipeGeometry,
//!     Regime, ResolverConfig,
//! };
//! use td_core::units::m;
//!
//! let geometry = PipeGeometry::new(m(0.05), m(0.00794), m(0.0024), GeometryVariant::Plain)
//!     .unwrap();
//! let resolver =
//!     FrictionResolver::new(FluidProperties::water(), geometry, ResolverConfig::default())
//!         .unwrap();
//!
//! let flow = resolver
//!     .resolve(0.1, Regime::Turbulent, FrictionSeed::new(0.019))
//!     .unwrap();
//! println!("v = {} m/s, f = {}", flow.pipe.velocity, flow.pipe.friction_factor);
//! ```

pub mod common;
pub mod equations;
pub mod error;
pub mod fluid;
pub mod geometry;
pub mod regime;
pub mod resolver;

// Re-exports
pub use equations::ColebrookLog;
pub use error::{ComponentError, ComponentResult};
pub use fluid::FluidProperties;
pub use geometry::{GeometryVariant, PipeGeometry, TJoint};
pub use regime::{Regime, RegimePolicy};
pub use resolver::{FlowState, FrictionResolver, FrictionSeed, ResolvedFlow, ResolverConfig};
