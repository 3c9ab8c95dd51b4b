//! Project validation logic.

use crate::schema::{BoundaryDef, LATEST_VERSION, LayerDef, Project, SettingsDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Project name must not be empty")]
    EmptyName,

    #[error("Project has no layers")]
    NoLayers,

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if project.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if project.layers.is_empty() {
        return Err(ValidationError::NoLayers);
    }

    for (i, layer) in project.layers.iter().enumerate() {
        validate_layer(i, layer)?;
    }
    validate_boundary(&project.boundary)?;
    if let Some(settings) = &project.settings {
        validate_settings(settings)?;
    }
    Ok(())
}

fn validate_layer(index: usize, layer: &LayerDef) -> Result<(), ValidationError> {
    positive(&format!("layers[{index}].thickness_mm"), layer.thickness_mm())?;
    if let LayerDef::Custom { k_w_mk, .. } = layer {
        positive(&format!("layers[{index}].k_w_mk"), *k_w_mk)?;
    }
    Ok(())
}

fn validate_boundary(boundary: &BoundaryDef) -> Result<(), ValidationError> {
    finite("boundary.t_left_c", boundary.t_left_c)?;
    finite("boundary.t_inf_c", boundary.t_inf_c)?;
    positive("boundary.h_w_m2k", boundary.h_w_m2k)
}

fn validate_settings(settings: &SettingsDef) -> Result<(), ValidationError> {
    if settings.cells_per_layer == 0 {
        return Err(invalid("settings.cells_per_layer", "0", "must be at least 1"));
    }
    if settings.max_iter == 0 {
        return Err(invalid("settings.max_iter", "0", "must be at least 1"));
    }
    positive("settings.tol_c", settings.tol_c)
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &value.to_string(), "must be finite"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &value.to_string(), "must be positive"))
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
