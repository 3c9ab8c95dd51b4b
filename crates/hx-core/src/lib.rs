//! hx-core: shared foundation for the heatrix insulation solver.
//!
//! Contains:
//! - units (uom SI types + constructors for the quantities used in insulation work)
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
