//! Error types for solver operations.

use hx_core::CoreError;
use hx_materials::MaterialError;
use thiserror::Error;

/// Errors that can occur while solving an insulation stack.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Validation error: {what}")]
    Validation { what: String },

    #[error("Resolution error in layer {}: {}", .layer + 1, .what)]
    Resolution { layer: usize, what: String },

    #[error(
        "Range error in layer {}: {} °C is outside the sampled range [{}, {}] °C of material '{}'",
        .layer + 1, .t, .min, .max, .material
    )]
    Range {
        layer: usize,
        material: String,
        t: f64,
        min: f64,
        max: f64,
    },

    #[error(
        "Convergence failed after {iterations} iterations: max change {max_delta:.3e} °C exceeds tolerance {tol:.1e} °C"
    )]
    ConvergenceFailed {
        iterations: usize,
        max_delta: f64,
        tol: f64,
    },
}

pub type SolverResult<T> = Result<T, SolverError>;

/// Coarse error classification for callers that branch on the failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Resolution,
    Range,
    Convergence,
}

impl SolverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolverError::Validation { .. } => ErrorKind::Validation,
            SolverError::Resolution { .. } => ErrorKind::Resolution,
            SolverError::Range { .. } => ErrorKind::Range,
            SolverError::ConvergenceFailed { .. } => ErrorKind::Convergence,
        }
    }

    pub(crate) fn validation(what: impl Into<String>) -> Self {
        SolverError::Validation { what: what.into() }
    }

    /// Attach a layer index to a material failure.
    pub fn from_material(layer: usize, err: MaterialError) -> Self {
        match err {
            MaterialError::OutOfRange {
                material,
                t,
                min,
                max,
            } => SolverError::Range {
                layer,
                material,
                t,
                min,
                max,
            },
            MaterialError::NotFound { .. }
            | MaterialError::NoConductivityData { .. }
            | MaterialError::MissingConstant { .. } => SolverError::Resolution {
                layer,
                what: err.to_string(),
            },
            other => SolverError::Validation {
                what: format!("layer {}: {other}", layer + 1),
            },
        }
    }
}

impl From<CoreError> for SolverError {
    fn from(e: CoreError) -> Self {
        SolverError::Validation {
            what: e.to_string(),
        }
    }
}
