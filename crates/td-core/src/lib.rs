//! td-core: shared foundation for tankdrain.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::TdError;
pub use numeric::*;
pub use units::*;
