//! High-level solver interface.

use crate::discretize::{DEFAULT_CELLS_PER_LAYER, discretize};
use crate::error::{SolverError, SolverResult};
use crate::linear::solve_linear;
use crate::picard::{PicardConfig, RelaxationEvent, initial_profile, relax};
use crate::problem::{BoundaryConditions, InsulationProblem};
use crate::projection::project;
use crate::resolve::{ResolvedLayer, resolve_layers};
use crate::solution::Solution;
use hx_core::Real;
use hx_materials::{InterpolationMode, MaterialStore};
use tracing::{debug, info};

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveConfig {
    /// Cells per layer on the relaxation path
    pub cells_per_layer: usize,
    pub picard: PicardConfig,
    /// Take the relaxation path even when every conductivity is constant
    pub force_relaxation: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            cells_per_layer: DEFAULT_CELLS_PER_LAYER,
            picard: PicardConfig::default(),
            force_relaxation: false,
        }
    }
}

impl SolveConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.cells_per_layer == 0 {
            return Err(SolverError::validation("cells_per_layer must be at least 1"));
        }
        self.picard.validate()
    }
}

/// Solve an insulation stack.
///
/// This function:
/// 1. Validates the problem and configuration
/// 2. Resolves every material-backed layer against `materials`
/// 3. Solves in closed form if no conductivity depends on temperature,
///    otherwise discretizes, relaxes to a fixed point and projects the
///    profile back to the layer interfaces
pub fn solve(
    problem: &InsulationProblem,
    materials: &dyn MaterialStore,
    config: &SolveConfig,
) -> SolverResult<Solution> {
    solve_with_progress(problem, materials, config, None)
}

pub fn solve_with_progress(
    problem: &InsulationProblem,
    materials: &dyn MaterialStore,
    config: &SolveConfig,
    observer: Option<&mut dyn FnMut(RelaxationEvent)>,
) -> SolverResult<Solution> {
    problem.validate()?;
    config.validate()?;
    let layers = resolve_layers(problem, materials)?;
    solve_resolved(&layers, &problem.boundary, config, observer)
}

/// Solve an already resolved stack.
pub fn solve_resolved(
    layers: &[ResolvedLayer],
    boundary: &BoundaryConditions,
    config: &SolveConfig,
    observer: Option<&mut dyn FnMut(RelaxationEvent)>,
) -> SolverResult<Solution> {
    config.validate()?;
    let nonlinear = layers.iter().any(|l| l.source.is_temperature_dependent());

    if !nonlinear && !config.force_relaxation {
        let thicknesses: Vec<Real> = layers.iter().map(|l| l.thickness_mm).collect();
        // Temperature is irrelevant for constant sources.
        let conductivities = layers
            .iter()
            .map(|l| {
                l.source
                    .conductivity(boundary.midpoint(), InterpolationMode::Clamp)
                    .map_err(|e| SolverError::from_material(l.index, e))
            })
            .collect::<SolverResult<Vec<Real>>>()?;
        let linear = solve_linear(&thicknesses, &conductivities, boundary)?;
        info!(q = linear.q, r_total = linear.r_total, "linear solve complete");
        return Ok(Solution::from_linear(
            &linear,
            &conductivities,
            boundary.t_inf_c,
        ));
    }

    let cells = discretize(layers, config.cells_per_layer)?;
    debug!(
        layers = layers.len(),
        cells = cells.len(),
        mode = config.picard.mode.as_str(),
        "starting picard relaxation"
    );
    let initial = initial_profile(layers, config.cells_per_layer, boundary)?;
    let relaxed = relax(&cells, boundary, initial, &config.picard, observer)?;
    project(&relaxed, layers, config.cells_per_layer, boundary.t_inf_c)
}
