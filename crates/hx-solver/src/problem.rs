//! Problem definition for a multilayer insulation stack.

use crate::error::{SolverError, SolverResult};
use hx_core::units::{self, HeatTransferCoeff, Length, Temperature};
use hx_core::{Real, ensure_finite, ensure_positive, mm_to_m};
use hx_materials::MaterialId;

/// How a layer obtains its conductivity.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// Backed by a stored material. `use_kt` selects the sampled curve over the
    /// material's constant value.
    Material { material: MaterialId, use_kt: bool },
    /// Directly supplied constant conductivity (W/m·K).
    Custom { k: Real },
}

/// One plane layer of the stack, ordered from the fixed-temperature surface
/// outwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Optional display name
    pub name: Option<String>,
    /// Thickness (mm)
    pub thickness_mm: Real,
    pub kind: LayerKind,
}

impl Layer {
    pub fn custom(thickness_mm: Real, k: Real) -> Self {
        Self {
            name: None,
            thickness_mm,
            kind: LayerKind::Custom { k },
        }
    }

    pub fn material(thickness_mm: Real, material: MaterialId, use_kt: bool) -> Self {
        Self {
            name: None,
            thickness_mm,
            kind: LayerKind::Material { material, use_kt },
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn thickness(&self) -> Length {
        units::mm(self.thickness_mm)
    }

    pub fn thickness_m(&self) -> Real {
        mm_to_m(self.thickness_mm)
    }
}

/// Fixed left surface temperature and convective exchange on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryConditions {
    /// Left surface temperature (°C)
    pub t_left_c: Real,
    /// Ambient fluid temperature (°C)
    pub t_inf_c: Real,
    /// Convective heat transfer coefficient (W/m²K)
    pub h: Real,
}

impl BoundaryConditions {
    pub fn new(t_left_c: Real, t_inf_c: Real, h: Real) -> Self {
        Self {
            t_left_c,
            t_inf_c,
            h,
        }
    }

    pub fn from_quantities(t_left: Temperature, t_inf: Temperature, h: HeatTransferCoeff) -> Self {
        Self::new(
            units::get::celsius(t_left),
            units::get::celsius(t_inf),
            units::get::w_per_m2k(h),
        )
    }

    pub fn validate(&self) -> SolverResult<()> {
        ensure_finite(self.t_left_c, "left surface temperature")?;
        ensure_finite(self.t_inf_c, "ambient temperature")?;
        ensure_positive(self.h, "convective coefficient h")?;
        Ok(())
    }

    /// Convective resistance 1/h (m²K/W).
    pub fn r_conv(&self) -> Real {
        1.0 / self.h
    }

    pub fn delta_t(&self) -> Real {
        self.t_left_c - self.t_inf_c
    }

    /// Arithmetic mean of the two boundary temperatures.
    pub fn midpoint(&self) -> Real {
        0.5 * (self.t_left_c + self.t_inf_c)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsulationProblem {
    pub layers: Vec<Layer>,
    pub boundary: BoundaryConditions,
}

impl InsulationProblem {
    pub fn new(layers: Vec<Layer>, boundary: BoundaryConditions) -> Self {
        Self { layers, boundary }
    }

    /// Validate geometry, custom conductivities and boundary conditions.
    /// Material references are checked later, during resolution.
    pub fn validate(&self) -> SolverResult<()> {
        if self.layers.is_empty() {
            return Err(SolverError::validation("at least one layer is required"));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if !layer.thickness_mm.is_finite() || layer.thickness_mm <= 0.0 {
                return Err(SolverError::validation(format!(
                    "layer {}: thickness must be positive and finite, got {} mm",
                    i + 1,
                    layer.thickness_mm
                )));
            }
            if let LayerKind::Custom { k } = layer.kind
                && (!k.is_finite() || k <= 0.0)
            {
                return Err(SolverError::validation(format!(
                    "layer {}: conductivity must be positive and finite, got {} W/m·K",
                    i + 1,
                    k
                )));
            }
        }
        self.boundary.validate()
    }
}
