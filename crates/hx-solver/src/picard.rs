//! Picard relaxation for temperature-dependent conductivities.

use crate::discretize::Cell;
use crate::error::{SolverError, SolverResult};
use crate::linear::solve_linear;
use crate::problem::BoundaryConditions;
use crate::resolve::ResolvedLayer;
use hx_core::Real;
use hx_materials::InterpolationMode;
use nalgebra::DVector;
use tracing::{debug, info, warn};

/// Relaxation solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PicardConfig {
    /// Maximum number of relaxation sweeps
    pub max_iter: usize,
    /// Convergence tolerance on the largest boundary temperature change (°C)
    pub tol: Real,
    /// Interpolation boundary policy for temperature-dependent cells
    pub mode: InterpolationMode,
}

impl Default for PicardConfig {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tol: 1e-3,
            mode: InterpolationMode::Clamp,
        }
    }
}

impl PicardConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iter == 0 {
            return Err(SolverError::validation("max_iter must be at least 1"));
        }
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(SolverError::validation(format!(
                "tolerance must be positive and finite, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Per-iteration progress report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationEvent {
    pub iteration: usize,
    pub q: Real,
    pub max_delta: Real,
}

/// Converged relaxation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxed {
    /// Heat flux density (W/m²)
    pub q: Real,
    /// Cell-boundary temperatures, `cells + 1` entries (°C)
    pub profile: DVector<Real>,
    /// Cell resistances of the last sweep (m²K/W)
    pub resistances: Vec<Real>,
    /// Total resistance including convection (m²K/W)
    pub r_total: Real,
    pub iterations: usize,
    /// Largest temperature change of the last sweep (°C)
    pub max_delta: Real,
}

/// Initial cell-boundary profile from the linear solution.
///
/// Temperature-dependent layers are evaluated once at the mean of the two
/// boundary temperatures (clamped to the sampled range, this is only a
/// starting guess). Each layer's temperature drop is spread evenly over its
/// cells.
pub fn initial_profile(
    layers: &[ResolvedLayer],
    cells_per_layer: usize,
    boundary: &BoundaryConditions,
) -> SolverResult<DVector<Real>> {
    if cells_per_layer == 0 {
        return Err(SolverError::validation("cells_per_layer must be at least 1"));
    }
    let t_mid = boundary.midpoint();
    let thicknesses: Vec<Real> = layers.iter().map(|l| l.thickness_mm).collect();
    let conductivities = layers
        .iter()
        .map(|l| {
            l.source
                .conductivity(t_mid, InterpolationMode::Clamp)
                .map_err(|e| SolverError::from_material(l.index, e))
        })
        .collect::<SolverResult<Vec<Real>>>()?;

    let linear = solve_linear(&thicknesses, &conductivities, boundary)?;

    let n = layers.len() * cells_per_layer;
    let mut profile = DVector::zeros(n + 1);
    profile[0] = boundary.t_left_c;
    for (j, pair) in linear.temperatures.windows(2).enumerate() {
        let step = (pair[1] - pair[0]) / cells_per_layer as Real;
        for c in 1..=cells_per_layer {
            profile[j * cells_per_layer + c] = pair[0] + step * c as Real;
        }
    }
    Ok(profile)
}

/// Iterate cell conductivities and the series network to a fixed point.
///
/// `initial` holds one temperature per cell boundary. Entry 0 is pinned to
/// `T_left` on every sweep. Fails with [`SolverError::ConvergenceFailed`]
/// if the largest change is still above `tol` after `max_iter` sweeps.
pub fn relax(
    cells: &[Cell<'_>],
    boundary: &BoundaryConditions,
    initial: DVector<Real>,
    config: &PicardConfig,
    mut observer: Option<&mut dyn FnMut(RelaxationEvent)>,
) -> SolverResult<Relaxed> {
    config.validate()?;
    boundary.validate()?;
    if cells.is_empty() {
        return Err(SolverError::validation("no cells to relax"));
    }
    if initial.len() != cells.len() + 1 {
        return Err(SolverError::validation(format!(
            "initial profile has {} entries, expected {}",
            initial.len(),
            cells.len() + 1
        )));
    }

    let r_conv = boundary.r_conv();
    let mut profile = initial;
    let mut resistances = vec![0.0; cells.len()];
    let mut max_delta = Real::INFINITY;

    for iteration in 1..=config.max_iter {
        for (i, cell) in cells.iter().enumerate() {
            let t_cell = 0.5 * (profile[i] + profile[i + 1]);
            let k = cell
                .conductivity(t_cell, config.mode)
                .map_err(|e| SolverError::from_material(cell.layer, e))?;
            resistances[i] = cell.dx_m / k;
        }

        let r_total = resistances.iter().sum::<Real>() + r_conv;
        let q = boundary.delta_t() / r_total;

        let mut next = DVector::zeros(profile.len());
        next[0] = boundary.t_left_c;
        for (i, r) in resistances.iter().enumerate() {
            next[i + 1] = next[i] - q * r;
        }

        max_delta = (&next - &profile).amax();
        profile = next;

        debug!(iteration, q, max_delta, "picard sweep");
        if let Some(obs) = observer.as_deref_mut() {
            obs(RelaxationEvent {
                iteration,
                q,
                max_delta,
            });
        }

        if max_delta < config.tol {
            info!(iterations = iteration, q, "picard relaxation converged");
            return Ok(Relaxed {
                q,
                profile,
                resistances,
                r_total,
                iterations: iteration,
                max_delta,
            });
        }
    }

    warn!(
        max_iter = config.max_iter,
        max_delta,
        tol = config.tol,
        "picard relaxation did not converge"
    );
    Err(SolverError::ConvergenceFailed {
        iterations: config.max_iter,
        max_delta,
        tol: config.tol,
    })
}
