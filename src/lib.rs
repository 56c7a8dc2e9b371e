//! Spatial placement optimization engine for bounded site parcels.
//!
//! Automates placement of discrete site assets (buildings, yards, parking,
//! tanks) on a bounded parcel while respecting geometric constraints and
//! optimizing several competing objectives:
//!
//! - **Collision & constraint detection** over 2D polygonal footprints:
//!   a lazily rebuilt R-tree index, a two-phase bounding-box → precise
//!   polygon filter, and type-aware minimum spacing rules.
//! - **Buildable-area derivation**: site boundary minus setback, minus
//!   exclusion and regulatory geometry, intersected with declared
//!   buildable zones, all via boolean polygon operations.
//! - **Multi-objective fitness evaluation**: five normalized 0–100
//!   sub-objectives combined by configurable weights, with an exponential
//!   penalty that keeps every infeasible layout strictly below every
//!   feasible one.
//! - **Genetic optimization**: population-based stochastic search with
//!   positional crossover, move/rotate/swap mutation, elitism, tournament
//!   selection, convergence- and time-bounded termination, and
//!   diversity-aware alternative selection.
//!
//! # Determinism
//!
//! Every stochastic decision is drawn from one seeded [`rand::rngs::StdRng`]
//! threaded explicitly through the run. Identical seed + config + input
//! assets produce identical convergence history and best fitness.
//!
//! # Key Types
//!
//! - [`Asset`] / [`AssetKind`]: positioned, rotatable rectangular footprints
//! - [`CollisionDetector`] / [`SpatialIndex`]: typed violation detection
//! - [`SiteConstraints`]: boundary, zones, setback, spacing, coverage
//! - [`ObjectiveEvaluator`] / [`ObjectiveWeights`]: layout scoring
//! - [`GeneticOptimizer`] / [`GaConfig`]: the evolutionary loop
//! - [`OptimizationResult`]: best solution, alternatives, convergence history

pub mod asset;
pub mod constraints;
pub mod error;
pub mod ga;
pub mod geometry;
pub mod objectives;
pub mod random;
pub mod spatial;

pub use asset::{Asset, AssetKind};
pub use constraints::{ConstraintSummary, RegulatoryConstraint, SiteConstraints};
pub use error::{Error, Result};
pub use ga::{
    GaConfig, GeneticOptimizer, InitStrategy, OptimizationResult, PlacementSolution, Termination,
};
pub use objectives::{ObjectiveEvaluator, ObjectiveScores, ObjectiveWeights, TerrainGrid};
pub use spatial::{
    CollisionDetector, Severity, SpatialIndex, ValidationResult, Violation, ViolationKind,
};
