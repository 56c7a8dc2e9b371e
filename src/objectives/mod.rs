//! Layout scoring: objective weights, terrain inputs, and the evaluator.
//!
//! A full layout (a [`PlacementSolution`](crate::ga::PlacementSolution)) is
//! scored on five normalized 0–100 sub-objectives combined by configurable
//! weights. Any constraint violation short-circuits scoring and applies an
//! exponential penalty, so every infeasible layout ranks strictly below
//! every feasible one.
//!
//! # Submodules
//!
//! - [`weights`]: the validated five-weight vector
//! - [`terrain`]: optional elevation/slope grids with an affine transform
//! - [`evaluator`]: violation counting and sub-objective formulas

pub mod evaluator;
pub mod terrain;
pub mod weights;

pub use evaluator::{ObjectiveEvaluator, ObjectiveScores};
pub use terrain::TerrainGrid;
pub use weights::ObjectiveWeights;
