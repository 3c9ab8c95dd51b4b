//! Insulation materials: sampled conductivity curves, interpolation and
//! material storage.
//!
//! A [`Material`] carries an optional constant conductivity and a validated
//! [`KtCurve`] of `(temperature, conductivity)` samples. The curve is the
//! only way to build sample data, so unsorted or duplicate temperatures never
//! reach the interpolator.

pub mod curve;
pub mod error;
pub mod interp;
pub mod material;
pub mod store;

pub use curve::{KtCurve, KtPoint};
pub use error::{MaterialError, MaterialResult};
pub use interp::{InterpError, InterpolationMode, interpolate};
pub use material::{Material, MaterialId};
pub use store::{InMemoryMaterialStore, JsonMaterialStore, MaterialStore};
