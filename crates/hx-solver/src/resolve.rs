//! Binding layers to their conductivity sources.

use crate::error::{SolverError, SolverResult};
use crate::problem::{InsulationProblem, LayerKind};
use hx_core::{Real, mm_to_m};
use hx_materials::{InterpolationMode, Material, MaterialResult, MaterialStore};
use tracing::debug;

/// Where a layer (and each of its cells) gets its conductivity from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConductivitySource {
    /// Constant conductivity (W/m·K)
    Fixed(Real),
    /// Stored material, interpolated when `use_kt` is set.
    Material { material: Material, use_kt: bool },
}

impl ConductivitySource {
    /// True when the conductivity actually varies with temperature. A
    /// `use_kt` material without samples falls back to its constant value.
    pub fn is_temperature_dependent(&self) -> bool {
        match self {
            ConductivitySource::Fixed(_) => false,
            ConductivitySource::Material { material, use_kt } => {
                *use_kt && !material.points.is_empty()
            }
        }
    }

    pub fn conductivity(&self, t_c: Real, mode: InterpolationMode) -> MaterialResult<Real> {
        match self {
            ConductivitySource::Fixed(k) => Ok(*k),
            ConductivitySource::Material {
                material,
                use_kt: true,
            } => material.conductivity_at(t_c, mode),
            ConductivitySource::Material {
                material,
                use_kt: false,
            } => material.constant_conductivity(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ConductivitySource::Fixed(k) => format!("k = {k} W/m·K"),
            ConductivitySource::Material { material, use_kt } => {
                if *use_kt {
                    format!("{} (k(T))", material.name)
                } else {
                    material.name.clone()
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayer {
    /// Index in the problem's layer list
    pub index: usize,
    pub thickness_mm: Real,
    pub source: ConductivitySource,
}

impl ResolvedLayer {
    pub fn thickness_m(&self) -> Real {
        mm_to_m(self.thickness_mm)
    }
}

/// Look up every referenced material and check that it can serve the layer.
pub fn resolve_layers(
    problem: &InsulationProblem,
    materials: &dyn MaterialStore,
) -> SolverResult<Vec<ResolvedLayer>> {
    problem
        .layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            let source = match &layer.kind {
                LayerKind::Custom { k } => ConductivitySource::Fixed(*k),
                LayerKind::Material { material, use_kt } => {
                    let material = materials
                        .get(*material)
                        .map_err(|e| SolverError::from_material(index, e))?;
                    if *use_kt && !material.has_conductivity_data() {
                        return Err(SolverError::Resolution {
                            layer: index,
                            what: format!(
                                "material '{}' has neither conductivity samples nor a constant value",
                                material.name
                            ),
                        });
                    }
                    if !*use_kt && material.k_const.is_none() {
                        return Err(SolverError::Resolution {
                            layer: index,
                            what: format!(
                                "constant conductivity requested but material '{}' defines none",
                                material.name
                            ),
                        });
                    }
                    ConductivitySource::Material {
                        material,
                        use_kt: *use_kt,
                    }
                }
            };
            debug!(layer = index, source = %source.label(), "resolved layer");
            Ok(ResolvedLayer {
                index,
                thickness_mm: layer.thickness_mm,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::problem::{BoundaryConditions, Layer};
    use hx_materials::{InMemoryMaterialStore, KtPoint, MaterialId};

    fn bc() -> BoundaryConditions {
        BoundaryConditions::new(200.0, 20.0, 10.0)
    }

    #[test]
    fn missing_material_is_a_resolution_error() {
        let store = InMemoryMaterialStore::new();
        let problem = InsulationProblem::new(vec![Layer::material(50.0, MaterialId::new(), true)], bc());
        let err = resolve_layers(&problem, &store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }

    #[test]
    fn constant_requested_but_undefined() {
        let m = Material::new("Curve only", None, vec![KtPoint::new(0.0, 0.03)]).unwrap();
        let store: InMemoryMaterialStore = [m.clone()].into_iter().collect();
        let problem = InsulationProblem::new(vec![Layer::material(50.0, m.id, false)], bc());
        let err = resolve_layers(&problem, &store).unwrap_err();
        assert!(matches!(err, SolverError::Resolution { layer: 0, .. }));
    }

    #[test]
    fn kt_requested_without_any_data() {
        let m = Material::new("Nothing", None, vec![]).unwrap();
        let store: InMemoryMaterialStore = [m.clone()].into_iter().collect();
        let problem = InsulationProblem::new(
            vec![Layer::custom(10.0, 1.0), Layer::material(50.0, m.id, true)],
            bc(),
        );
        let err = resolve_layers(&problem, &store).unwrap_err();
        assert!(matches!(err, SolverError::Resolution { layer: 1, .. }));
    }

    #[test]
    fn kt_layer_without_samples_is_not_temperature_dependent() {
        let m = Material::new("Constant only", Some(0.04), vec![]).unwrap();
        let store: InMemoryMaterialStore = [m.clone()].into_iter().collect();
        let problem = InsulationProblem::new(vec![Layer::material(50.0, m.id, true)], bc());
        let layers = resolve_layers(&problem, &store).unwrap();
        assert!(!layers[0].source.is_temperature_dependent());
        assert_eq!(
            layers[0].source.conductivity(500.0, InterpolationMode::Strict).unwrap(),
            0.04
        );
    }

    #[test]
    fn material_constant_ignores_curve_when_kt_is_off() {
        let m = Material::new(
            "Both",
            Some(0.05),
            vec![KtPoint::new(0.0, 0.03), KtPoint::new(100.0, 0.07)],
        )
        .unwrap();
        let source = ConductivitySource::Material {
            material: m,
            use_kt: false,
        };
        assert!(!source.is_temperature_dependent());
        assert_eq!(source.conductivity(50.0, InterpolationMode::Clamp).unwrap(), 0.05);
    }
}
