//! hx-project: project file format, validation and the on-disk project store.

pub mod hash;
pub mod schema;
pub mod store;
pub mod validate;

pub use hash::{compute_input_hash, compute_materials_hash, name_key};
pub use schema::*;
pub use store::ProjectStore;
pub use validate::{ValidationError, validate_project};

use hx_materials::MaterialStore;
use hx_solver::{SolverError, Solution};
use tracing::info;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Project not found: {name}")]
    ProjectNotFound { name: String },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &std::path::Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a project by extension: `.json` as JSON, anything else as YAML.
pub fn load_any(path: &std::path::Path) -> ProjectResult<Project> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}

/// Solve a project with its effective settings and record the result on it.
pub fn solve_project(
    project: &mut Project,
    materials: &dyn MaterialStore,
) -> ProjectResult<Solution> {
    validate_project(project)?;
    let config = project.solve_config();
    let solution = hx_solver::solve(&project.to_problem(), materials, &config)?;
    info!(
        project = %project.name,
        q = solution.q,
        method = ?solution.method,
        "project solved"
    );
    project.record_result(solution.clone(), materials);
    Ok(solution)
}
