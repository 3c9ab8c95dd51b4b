//! Piecewise-linear conductivity interpolation.

use crate::curve::KtPoint;
use hx_core::Real;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boundary handling for queries outside the sampled temperature domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMode {
    /// Return the nearest endpoint's conductivity.
    #[default]
    Clamp,
    /// Fail with [`InterpError::OutOfRange`].
    Strict,
}

impl InterpolationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpolationMode::Clamp => "clamp",
            InterpolationMode::Strict => "strict",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InterpError {
    #[error("no samples to interpolate")]
    Empty,

    #[error("temperature {t} °C outside sampled range [{min}, {max}] °C")]
    OutOfRange { t: Real, min: Real, max: Real },

    #[error("non-finite query temperature {t}")]
    NonFinite { t: Real },
}

/// Linear interpolation over temperature-sorted, duplicate-free samples.
///
/// A single sample is returned for any query temperature.
pub fn interpolate(points: &[KtPoint], t: Real, mode: InterpolationMode) -> Result<Real, InterpError> {
    if !t.is_finite() {
        return Err(InterpError::NonFinite { t });
    }
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(InterpError::Empty),
    };
    if points.len() == 1 {
        return Ok(first.k);
    }

    if t < first.t_c || t > last.t_c {
        return match mode {
            InterpolationMode::Clamp if t < first.t_c => Ok(first.k),
            InterpolationMode::Clamp => Ok(last.k),
            InterpolationMode::Strict => Err(InterpError::OutOfRange {
                t,
                min: first.t_c,
                max: last.t_c,
            }),
        };
    }

    // First sample with t_c >= t; at least 1 so the bracket has a lower end.
    let upper = points.partition_point(|p| p.t_c < t).max(1);
    let (p0, p1) = (points[upper - 1], points[upper]);
    if p1.t_c == p0.t_c {
        return Ok(p1.k);
    }
    Ok(p0.k + (t - p0.t_c) / (p1.t_c - p0.t_c) * (p1.k - p0.k))
}
