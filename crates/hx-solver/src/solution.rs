//! Solver result record.

use crate::linear::LinearSolution;
use hx_core::Real;
use hx_core::units::{self, HeatFlux};
use serde::{Deserialize, Serialize};

/// Which path produced a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveMethod {
    /// Closed-form series resistances, all conductivities constant
    Linear,
    /// Cell discretization with Picard relaxation
    Picard,
}

/// Full-resolution temperature profile over all cell boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub positions_mm: Vec<Real>,
    pub temperatures: Vec<Real>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub method: SolveMethod,
    /// Heat flux density (W/m²), positive from the left surface to ambient
    pub q: Real,
    /// Total resistance including convection (m²K/W)
    pub r_total: Real,
    /// Left surface, each layer interface, outer surface (°C)
    pub interface_temperatures: Vec<Real>,
    /// Cumulative positions matching `interface_temperatures` (mm)
    pub positions_mm: Vec<Real>,
    /// Effective conductivity per layer (W/m·K)
    pub layer_conductivities: Vec<Real>,
    /// Ambient temperature (°C)
    pub t_inf_c: Real,
    /// Relaxation sweeps, 0 on the linear path
    pub iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl Solution {
    pub fn from_linear(linear: &LinearSolution, conductivities: &[Real], t_inf_c: Real) -> Self {
        Self {
            method: SolveMethod::Linear,
            q: linear.q,
            r_total: linear.r_total,
            interface_temperatures: linear.temperatures.clone(),
            positions_mm: linear.positions_mm.clone(),
            layer_conductivities: conductivities.to_vec(),
            t_inf_c,
            iterations: 0,
            profile: None,
        }
    }

    pub fn flux(&self) -> HeatFlux {
        units::w_per_m2(self.q)
    }

    /// Overall heat transfer coefficient 1/R_total (W/m²K).
    pub fn u_value(&self) -> Real {
        1.0 / self.r_total
    }

    pub fn layer_count(&self) -> usize {
        self.interface_temperatures.len().saturating_sub(1)
    }

    pub fn outer_surface_temperature(&self) -> Option<Real> {
        self.interface_temperatures.last().copied()
    }

    /// Labels for each interface temperature followed by the ambient point.
    pub fn labels(&self) -> Vec<String> {
        let layers = self.layer_count();
        let mut labels = Vec::with_capacity(layers + 2);
        labels.push("Inner surface".to_string());
        labels.extend((1..layers).map(|i| format!("Interface {i}")));
        labels.push("Outer surface".to_string());
        labels.push("Ambient".to_string());
        labels
    }

    /// `(label, position, temperature)` rows including the ambient point,
    /// which is drawn at the outer surface position.
    pub fn table(&self) -> Vec<(String, Real, Real)> {
        let outer = self.positions_mm.last().copied().unwrap_or(0.0);
        self.labels()
            .into_iter()
            .zip(
                self.positions_mm
                    .iter()
                    .copied()
                    .zip(self.interface_temperatures.iter().copied())
                    .chain(std::iter::once((outer, self.t_inf_c))),
            )
            .map(|(label, (x, t))| (label, x, t))
            .collect()
    }
}
