//! Spatial indexing and collision detection.
//!
//! The [`SpatialIndex`] is an R-tree over current asset footprints with an
//! explicit dirty flag and lazy rebuild; it is privately owned by one
//! [`CollisionDetector`] and never mutated reactively from elsewhere.
//!
//! The [`CollisionDetector`] layers a two-phase filter on top of the index:
//! a cheap axis-aligned bounding-box pre-check, then an exact polygon
//! intersection test, plus type-aware minimum-spacing checks and placement
//! validation against boundary, buildable area, and exclusion zones.
//!
//! # Submodules
//!
//! - [`violation`]: typed violation records and validation results
//! - [`index`]: the rebuildable R-tree range-query structure
//! - [`collision`]: pairwise checks and placement validation

pub mod collision;
pub mod index;
pub mod violation;

pub use collision::CollisionDetector;
pub use index::SpatialIndex;
pub use violation::{Severity, ValidationResult, Violation, ViolationKind};
