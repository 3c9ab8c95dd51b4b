//! Steady one-dimensional conduction through a stack of insulation layers.
//!
//! The stack is bounded by a fixed surface temperature on the left and
//! convective exchange with an ambient fluid on the right. Layers with
//! constant conductivity are solved in closed form as a series resistance
//! network. As soon as one layer uses a temperature-dependent conductivity
//! curve the layers are split into cells and a Picard iteration re-evaluates
//! every cell conductivity from the current temperature estimate until the
//! profile stops changing.

pub mod discretize;
pub mod error;
pub mod linear;
pub mod picard;
pub mod problem;
pub mod projection;
pub mod resolve;
pub mod solution;
pub mod solve;

pub use discretize::{Cell, DEFAULT_CELLS_PER_LAYER, discretize};
pub use error::{ErrorKind, SolverError, SolverResult};
pub use linear::{LinearSolution, solve_linear};
pub use picard::{PicardConfig, Relaxed, RelaxationEvent, initial_profile, relax};
pub use problem::{BoundaryConditions, InsulationProblem, Layer, LayerKind};
pub use projection::project;
pub use resolve::{ConductivitySource, ResolvedLayer, resolve_layers};
pub use solution::{Profile, SolveMethod, Solution};
pub use solve::{SolveConfig, solve, solve_resolved, solve_with_progress};
