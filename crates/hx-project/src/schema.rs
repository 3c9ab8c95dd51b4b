//! Serialized project schema.

use crate::hash::{compute_input_hash, compute_materials_hash};
use hx_core::Real;
use hx_materials::{InterpolationMode, MaterialId, MaterialStore};
use hx_solver::{
    BoundaryConditions, InsulationProblem, Layer, PicardConfig, SolveConfig, Solution,
};
use serde::{Deserialize, Serialize};

/// Newest project file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub version: u32,
    pub name: String,
    /// Ordered from the fixed-temperature surface outwards
    pub layers: Vec<LayerDef>,
    pub boundary: BoundaryDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SettingsDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<StoredResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerDef {
    Material {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        thickness_mm: Real,
        material_id: MaterialId,
        #[serde(default)]
        use_kt: bool,
    },
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        thickness_mm: Real,
        k_w_mk: Real,
    },
}

impl LayerDef {
    pub fn thickness_mm(&self) -> Real {
        match self {
            LayerDef::Material { thickness_mm, .. } | LayerDef::Custom { thickness_mm, .. } => {
                *thickness_mm
            }
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            LayerDef::Material { name, .. } | LayerDef::Custom { name, .. } => name.as_deref(),
        }
    }

    pub fn to_layer(&self) -> Layer {
        let layer = match self {
            LayerDef::Material {
                thickness_mm,
                material_id,
                use_kt,
                ..
            } => Layer::material(*thickness_mm, *material_id, *use_kt),
            LayerDef::Custom {
                thickness_mm,
                k_w_mk,
                ..
            } => Layer::custom(*thickness_mm, *k_w_mk),
        };
        match self.name() {
            Some(name) => layer.named(name),
            None => layer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryDef {
    /// Fixed left surface temperature (°C)
    pub t_left_c: Real,
    /// Ambient temperature (°C)
    pub t_inf_c: Real,
    /// Outer convective coefficient (W/m²K)
    pub h_w_m2k: Real,
}

impl BoundaryDef {
    pub fn to_conditions(&self) -> BoundaryConditions {
        BoundaryConditions::new(self.t_left_c, self.t_inf_c, self.h_w_m2k)
    }
}

/// Optional solver settings stored with a project. Missing keys take the
/// solver defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDef {
    pub cells_per_layer: usize,
    pub max_iter: usize,
    pub tol_c: Real,
    pub interpolation: InterpolationMode,
}

impl Default for SettingsDef {
    fn default() -> Self {
        SettingsDef::from_config(&SolveConfig::default())
    }
}

impl SettingsDef {
    pub fn from_config(config: &SolveConfig) -> Self {
        Self {
            cells_per_layer: config.cells_per_layer,
            max_iter: config.picard.max_iter,
            tol_c: config.picard.tol,
            interpolation: config.picard.mode,
        }
    }

    pub fn to_config(&self) -> SolveConfig {
        SolveConfig {
            cells_per_layer: self.cells_per_layer,
            picard: PicardConfig {
                max_iter: self.max_iter,
                tol: self.tol_c,
                mode: self.interpolation,
            },
            force_relaxation: false,
        }
    }
}

/// Last solution saved with the project, fingerprinted by its inputs and by
/// the conductivity data of the materials it used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub input_hash: String,
    #[serde(default)]
    pub materials_hash: String,
    /// RFC 3339 timestamp
    pub saved_at: String,
    pub solution: Solution,
}

impl Project {
    pub fn new(name: impl Into<String>, layers: Vec<LayerDef>, boundary: BoundaryDef) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            layers,
            boundary,
            settings: None,
            result: None,
        }
    }

    pub fn to_problem(&self) -> InsulationProblem {
        InsulationProblem::new(
            self.layers.iter().map(LayerDef::to_layer).collect(),
            self.boundary.to_conditions(),
        )
    }

    pub fn solve_config(&self) -> SolveConfig {
        self.settings.unwrap_or_default().to_config()
    }

    pub fn material_ids(&self) -> Vec<MaterialId> {
        let mut ids: Vec<MaterialId> = self
            .layers
            .iter()
            .filter_map(|l| match l {
                LayerDef::Material { material_id, .. } => Some(*material_id),
                LayerDef::Custom { .. } => None,
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// The stored solution, if it was computed from the current inputs and
    /// the current state of the referenced materials.
    pub fn current_result(&self, materials: &dyn MaterialStore) -> Option<&Solution> {
        self.result
            .as_ref()
            .filter(|r| {
                r.input_hash == compute_input_hash(self)
                    && r.materials_hash == compute_materials_hash(self, materials)
            })
            .map(|r| &r.solution)
    }

    pub fn record_result(&mut self, solution: Solution, materials: &dyn MaterialStore) {
        self.result = Some(StoredResult {
            input_hash: compute_input_hash(self),
            materials_hash: compute_materials_hash(self, materials),
            saved_at: chrono::Utc::now().to_rfc3339(),
            solution,
        });
    }
}
