//! Closed-form series resistance solution for constant conductivities.

use crate::error::{SolverError, SolverResult};
use crate::problem::BoundaryConditions;
use hx_core::{Real, mm_to_m};

#[derive(Debug, Clone, PartialEq)]
pub struct LinearSolution {
    /// Heat flux density (W/m²), positive from the left surface to ambient
    pub q: Real,
    /// Conduction resistance per layer (m²K/W)
    pub resistances: Vec<Real>,
    /// Convective resistance 1/h (m²K/W)
    pub r_conv: Real,
    /// Total resistance (m²K/W)
    pub r_total: Real,
    /// Left surface, each interface, outer surface (°C)
    pub temperatures: Vec<Real>,
    /// Cumulative positions matching `temperatures` (mm)
    pub positions_mm: Vec<Real>,
}

/// Solve a stack of constant-conductivity layers with a convective boundary.
///
/// ```text
/// R_i = (d_i / 1000) / k_i,  R_total = ΣR_i + 1/h
/// q   = (T_left - T_inf) / R_total
/// T_0 = T_left,  T_i = T_{i-1} - q R_i
/// ```
pub fn solve_linear(
    thicknesses_mm: &[Real],
    conductivities: &[Real],
    boundary: &BoundaryConditions,
) -> SolverResult<LinearSolution> {
    if thicknesses_mm.is_empty() {
        return Err(SolverError::validation("at least one layer is required"));
    }
    if thicknesses_mm.len() != conductivities.len() {
        return Err(SolverError::validation(format!(
            "thickness/conductivity length mismatch: {} != {}",
            thicknesses_mm.len(),
            conductivities.len()
        )));
    }
    boundary.validate()?;

    let mut resistances = Vec::with_capacity(thicknesses_mm.len());
    for (i, (&d, &k)) in thicknesses_mm.iter().zip(conductivities).enumerate() {
        if !d.is_finite() || d <= 0.0 {
            return Err(SolverError::validation(format!(
                "layer {}: thickness must be positive and finite, got {d} mm",
                i + 1
            )));
        }
        if !k.is_finite() || k <= 0.0 {
            return Err(SolverError::validation(format!(
                "layer {}: conductivity must be positive and finite, got {k} W/m·K",
                i + 1
            )));
        }
        resistances.push(mm_to_m(d) / k);
    }

    let r_conv = boundary.r_conv();
    let r_total = resistances.iter().sum::<Real>() + r_conv;
    let q = boundary.delta_t() / r_total;

    let mut temperatures = Vec::with_capacity(resistances.len() + 1);
    let mut t = boundary.t_left_c;
    temperatures.push(t);
    for r in &resistances {
        t -= q * r;
        temperatures.push(t);
    }

    Ok(LinearSolution {
        q,
        resistances,
        r_conv,
        r_total,
        temperatures,
        positions_mm: cumulative_positions(thicknesses_mm),
    })
}

/// Running sum of thicknesses starting at 0.
pub(crate) fn cumulative_positions(thicknesses_mm: &[Real]) -> Vec<Real> {
    let mut positions = Vec::with_capacity(thicknesses_mm.len() + 1);
    let mut x = 0.0;
    positions.push(x);
    for d in thicknesses_mm {
        x += d;
        positions.push(x);
    }
    positions
}
