//! Material definitions.

use crate::curve::{KtCurve, KtPoint};
use crate::error::{MaterialError, MaterialResult};
use crate::interp::{InterpError, InterpolationMode};
use core::fmt;
use hx_core::{Real, ensure_positive};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Stable material identity, serialized as a UUID string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(Uuid);

impl MaterialId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterialId({})", self.0)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MaterialId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// An insulation material with an optional constant conductivity and an
/// optional sampled conductivity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Constant thermal conductivity (W/m·K)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_const: Option<Real>,
    /// Temperature-dependent conductivity samples
    #[serde(default)]
    pub points: KtCurve,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Material {
    /// Create a material with a fresh id.
    pub fn new(
        name: impl Into<String>,
        k_const: Option<Real>,
        points: Vec<KtPoint>,
    ) -> MaterialResult<Self> {
        let material = Self {
            id: MaterialId::new(),
            name: name.into(),
            k_const,
            points: KtCurve::new(points)?,
            description: None,
        };
        material.validate()?;
        Ok(material)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the constant conductivity; the curve is valid by construction.
    pub fn validate(&self) -> MaterialResult<()> {
        if let Some(k) = self.k_const {
            ensure_positive(k, "constant conductivity")?;
        }
        Ok(())
    }

    pub fn has_conductivity_data(&self) -> bool {
        self.k_const.is_some() || !self.points.is_empty()
    }

    /// The constant conductivity, for layers that do not request interpolation.
    pub fn constant_conductivity(&self) -> MaterialResult<Real> {
        self.k_const.ok_or_else(|| MaterialError::MissingConstant {
            material: self.name.clone(),
        })
    }

    /// Conductivity at `t_c` (°C).
    ///
    /// Uses the sampled curve when present, otherwise falls back to the
    /// constant value. The fallback is the same in clamp and strict mode.
    pub fn conductivity_at(&self, t_c: Real, mode: InterpolationMode) -> MaterialResult<Real> {
        if self.points.is_empty() {
            return self
                .k_const
                .ok_or_else(|| MaterialError::NoConductivityData {
                    material: self.name.clone(),
                });
        }
        self.points.evaluate(t_c, mode).map_err(|e| match e {
            InterpError::OutOfRange { t, min, max } => MaterialError::OutOfRange {
                material: self.name.clone(),
                t,
                min,
                max,
            },
            InterpError::NonFinite { t } => MaterialError::InvalidValue(
                hx_core::CoreError::NonFinite {
                    what: "query temperature",
                    value: t,
                },
            ),
            InterpError::Empty => MaterialError::NoConductivityData {
                material: self.name.clone(),
            },
        })
    }
}
