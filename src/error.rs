//! Error types for site-layout.
//!
//! Only configuration and construction-time validation can fail. Constraint
//! violations discovered during optimization are never errors; they become
//! numeric penalties that bias the search back toward feasibility.

use thiserror::Error;

/// Result type alias for site-layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when constructing engine inputs.
#[derive(Debug, Error)]
pub enum Error {
    /// Objective weights are negative or do not sum to 1.0 ± 0.01.
    #[error("Invalid objective weights: {0}")]
    InvalidWeights(String),

    /// Genetic algorithm configuration is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Site boundary is not a valid simple polygon.
    #[error("Invalid site boundary: {0}")]
    InvalidBoundary(String),

    /// A constraint parameter is out of its documented range.
    #[error("Invalid constraint: {0}")]
    InvalidConstraint(String),
}
