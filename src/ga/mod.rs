//! Genetic optimization of placement layouts.
//!
//! A population-based stochastic search over [`PlacementSolution`]s:
//! seeded initialization (random, grid, or heuristic), tournament parent
//! selection, positional crossover, move/rotate/swap mutation, elitism,
//! and convergence- or time-bounded termination. The final population is
//! distilled into a best solution plus a set of mutually diverse
//! alternatives.
//!
//! # Key Types
//!
//! - [`GaConfig`]: algorithm parameters, presets, validation
//! - [`PlacementSolution`]: one individual, a full layout with fitness
//! - [`GeneticOptimizer`]: executes the evolutionary loop
//! - [`OptimizationResult`] / [`Termination`]: run outcome and statistics
//!
//! # Submodules
//!
//! - [`operators`]: initialization strategies, crossover, mutations
//! - [`selection`]: tournament parent selection

mod config;
pub mod operators;
mod result;
mod runner;
mod selection;
mod solution;

pub use config::GaConfig;
pub use operators::InitStrategy;
pub use result::{AssetPlacementReport, OptimizationResult, SolutionReport, Termination};
pub use runner::GeneticOptimizer;
pub use solution::PlacementSolution;
