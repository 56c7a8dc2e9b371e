//! Typed constraint violation records.
//!
//! Every failed geometric check produces a [`Violation`] naming the asset,
//! the rule, and, for pairwise checks, the conflicting asset and the
//! measured vs. required distances. Violations are data, never errors: the
//! optimizer turns them into fitness penalties.

use serde::{Deserialize, Serialize};

/// Category of a placement violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Two asset footprints overlap.
    Collision,
    /// Two assets are closer than their required spacing.
    SpacingViolation,
    /// An asset lies fully or substantially outside the site boundary.
    OutOfBounds,
    /// An asset intersects an exclusion zone.
    ExclusionZone,
    /// An asset sits on terrain steeper than allowed (external hook).
    SlopeViolation,
    /// An asset leaves the buildable area derived from the setback.
    SetbackViolation,
}

/// Whether a violation invalidates the placement or merely flags it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Blocking,
    Warning,
}

/// A single placement violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub asset_id: String,
    /// The other asset involved, for pairwise checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_asset_id: Option<String>,
    pub description: String,
    pub severity: Severity,
    /// Measured separation, for spacing checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    /// Required separation, for spacing checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_distance_m: Option<f64>,
}

impl Violation {
    /// A blocking violation with no distance data.
    pub fn blocking(kind: ViolationKind, asset_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            asset_id: asset_id.into(),
            conflicting_asset_id: None,
            description: description.into(),
            severity: Severity::Blocking,
            distance_m: None,
            required_distance_m: None,
        }
    }

    /// A non-blocking warning with no distance data.
    pub fn warning(kind: ViolationKind, asset_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::blocking(kind, asset_id, description)
        }
    }

    /// Attaches the conflicting asset id (builder form).
    pub fn against(mut self, other_id: impl Into<String>) -> Self {
        self.conflicting_asset_id = Some(other_id.into());
        self
    }

    /// Attaches measured and required distances (builder form).
    pub fn with_distances(mut self, actual_m: f64, required_m: f64) -> Self {
        self.distance_m = Some(actual_m);
        self.required_distance_m = Some(required_m);
        self
    }
}

/// Outcome of validating a single placement.
///
/// `is_valid` holds exactly when `violations` is empty; warnings never
/// invalidate a placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

impl ValidationResult {
    /// Builds the result, deriving `is_valid` from the violation list.
    pub fn new(violations: Vec<Violation>, warnings: Vec<Violation>) -> Self {
        Self {
            is_valid: violations.is_empty(),
            violations,
            warnings,
        }
    }
}
