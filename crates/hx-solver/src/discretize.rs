//! Subdivision of layers into equal-width cells.

use crate::error::{SolverError, SolverResult};
use crate::resolve::{ConductivitySource, ResolvedLayer};
use hx_core::Real;
use hx_materials::{InterpolationMode, MaterialResult};

pub const DEFAULT_CELLS_PER_LAYER: usize = 25;

/// A sub-cell of one layer. Borrows the layer's conductivity source; cells
/// never outlive the solve that created them.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a> {
    /// Index of the owning layer
    pub layer: usize,
    /// Cell thickness (m)
    pub dx_m: Real,
    pub source: &'a ConductivitySource,
}

impl Cell<'_> {
    pub fn conductivity(&self, t_c: Real, mode: InterpolationMode) -> MaterialResult<Real> {
        self.source.conductivity(t_c, mode)
    }
}

/// Split every layer into `cells_per_layer` cells of equal thickness.
pub fn discretize(layers: &[ResolvedLayer], cells_per_layer: usize) -> SolverResult<Vec<Cell<'_>>> {
    if cells_per_layer == 0 {
        return Err(SolverError::validation("cells_per_layer must be at least 1"));
    }
    let mut cells = Vec::with_capacity(layers.len() * cells_per_layer);
    for layer in layers {
        let dx_m = layer.thickness_m() / cells_per_layer as Real;
        cells.extend((0..cells_per_layer).map(|_| Cell {
            layer: layer.index,
            dx_m,
            source: &layer.source,
        }));
    }
    Ok(cells)
}
