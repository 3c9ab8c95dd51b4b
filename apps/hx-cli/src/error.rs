//! Error type for the command-line front end.

use hx_materials::MaterialError;
use hx_project::{ProjectError, ValidationError};
use hx_solver::SolverError;

/// Every failure a command can report. Printed through `Display`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Material(#[from] MaterialError),

    #[error("{0}")]
    Solver(#[from] SolverError),

    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
