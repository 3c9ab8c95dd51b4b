//! Error types for material definitions and stores.

use crate::material::MaterialId;
use hx_core::CoreError;
use thiserror::Error;

pub type MaterialResult<T> = Result<T, MaterialError>;

#[derive(Error, Debug)]
pub enum MaterialError {
    #[error("Invalid value: {0}")]
    InvalidValue(#[from] CoreError),

    #[error("Conductivity sample at {t_c} °C must be positive, got {k}")]
    NonPositiveConductivity { t_c: f64, k: f64 },

    #[error("Duplicate temperature sample at {t_c} °C")]
    DuplicateTemperature { t_c: f64 },

    #[error("Temperature samples must be increasing: {next} °C follows {prev} °C")]
    UnsortedTemperatures { prev: f64, next: f64 },

    #[error("Material '{material}' has neither conductivity samples nor a constant conductivity")]
    NoConductivityData { material: String },

    #[error("Material '{material}' defines no constant conductivity")]
    MissingConstant { material: String },

    #[error(
        "Temperature {t} °C is outside the sampled range [{min}, {max}] °C of material '{material}'"
    )]
    OutOfRange {
        material: String,
        t: f64,
        min: f64,
        max: f64,
    },

    #[error("Material not found: {id}")]
    NotFound { id: MaterialId },

    #[error("Material already exists: {id}")]
    DuplicateId { id: MaterialId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
