//! Reduction of the fine cell profile to layer interfaces.

use crate::error::{SolverError, SolverResult};
use crate::linear::cumulative_positions;
use crate::picard::Relaxed;
use crate::resolve::ResolvedLayer;
use crate::solution::{Profile, SolveMethod, Solution};
use hx_core::{Real, mm_to_m};

/// Pick every `cells_per_layer`-th boundary temperature as a layer interface
/// and keep the full profile for plotting.
pub fn project(
    relaxed: &Relaxed,
    layers: &[ResolvedLayer],
    cells_per_layer: usize,
    t_inf_c: Real,
) -> SolverResult<Solution> {
    let n = layers.len() * cells_per_layer;
    if cells_per_layer == 0 || relaxed.profile.len() != n + 1 || relaxed.resistances.len() != n {
        return Err(SolverError::validation(format!(
            "profile of {} boundaries does not match {} layers x {} cells",
            relaxed.profile.len(),
            layers.len(),
            cells_per_layer
        )));
    }

    let interface_temperatures = (0..=layers.len())
        .map(|j| relaxed.profile[j * cells_per_layer])
        .collect();

    let thicknesses: Vec<Real> = layers.iter().map(|l| l.thickness_mm).collect();
    let positions_mm = cumulative_positions(&thicknesses);

    let mut fine_positions = Vec::with_capacity(n + 1);
    fine_positions.push(0.0);
    for (layer, start) in layers.iter().zip(&positions_mm) {
        fine_positions.extend(
            (1..=cells_per_layer)
                .map(|c| start + layer.thickness_mm * c as Real / cells_per_layer as Real),
        );
    }

    let layer_conductivities = layers
        .iter()
        .zip(relaxed.resistances.chunks(cells_per_layer))
        .map(|(layer, cells)| mm_to_m(layer.thickness_mm) / cells.iter().sum::<Real>())
        .collect();

    Ok(Solution {
        method: SolveMethod::Picard,
        q: relaxed.q,
        r_total: relaxed.r_total,
        interface_temperatures,
        positions_mm,
        layer_conductivities,
        t_inf_c,
        iterations: relaxed.iterations,
        profile: Some(Profile {
            positions_mm: fine_positions,
            temperatures: relaxed.profile.iter().copied().collect(),
        }),
    })
}
