//! Site assets: positioned, rotatable rectangular footprints.
//!
//! An [`Asset`] carries a stable identity, a rectangular footprint, a center
//! position in project meters, and a rotation from the discrete set used by
//! the mutation operators. Assets are mutated in place by the optimizer
//! during search and never destroyed mid-run.

use geo::Polygon;
use serde::{Deserialize, Serialize};

use crate::geometry::{expanded_rect, oriented_rect};

/// Rotations (degrees) an asset may take. The rotate mutation draws from
/// this set and never assigns intermediate angles.
pub const ALLOWED_ROTATIONS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Category of a site asset.
///
/// The category drives the pairwise minimum-spacing rules: tanks demand the
/// widest separations, parking the narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Building,
    Yard,
    Parking,
    Tank,
}

impl AssetKind {
    /// Human-readable label used in violation descriptions and reports.
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Building => "building",
            AssetKind::Yard => "yard",
            AssetKind::Parking => "parking",
            AssetKind::Tank => "tank",
        }
    }

    /// Minimum required separation (meters) between two asset categories.
    ///
    /// Symmetric: `a.spacing_to(b) == b.spacing_to(a)`.
    pub fn spacing_to(self, other: AssetKind) -> f64 {
        use AssetKind::*;
        match (self, other) {
            (Building, Building) => 10.0,
            (Building, Tank) | (Tank, Building) => 20.0,
            (Tank, Tank) => 15.0,
            (Yard, Tank) | (Tank, Yard) => 15.0,
            (Parking, Tank) | (Tank, Parking) => 15.0,
            (Building, Yard) | (Yard, Building) => 5.0,
            (Building, Parking) | (Parking, Building) => 5.0,
            (Yard, Yard) => 5.0,
            (Yard, Parking) | (Parking, Yard) => 0.0,
            (Parking, Parking) => 0.0,
        }
    }
}

/// A positioned, rotatable rectangular footprint with a stable identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique, stable identifier. Never changes during a run.
    pub id: String,
    /// Display name for reports.
    pub name: String,
    /// Asset category.
    pub kind: AssetKind,
    /// Footprint width in meters (local x axis at rotation 0).
    pub width_m: f64,
    /// Footprint length in meters (local y axis at rotation 0).
    pub length_m: f64,
    /// Center x in project meters.
    pub x: f64,
    /// Center y in project meters.
    pub y: f64,
    /// Rotation in degrees, one of [`ALLOWED_ROTATIONS`].
    pub rotation_deg: f64,
    /// Asset-specific minimum spacing to any neighbor, meters.
    pub min_spacing_m: f64,
    /// Asset-specific setback from the site boundary, meters.
    pub setback_m: f64,
}

impl Asset {
    /// Creates an asset at the origin with rotation 0 and no extra spacing.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: AssetKind,
        width_m: f64,
        length_m: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            width_m,
            length_m,
            x: 0.0,
            y: 0.0,
            rotation_deg: 0.0,
            min_spacing_m: 0.0,
            setback_m: 0.0,
        }
    }

    /// Moves the asset to `(x, y)` (builder form).
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    /// Sets the rotation (builder form). Snaps to the nearest allowed value.
    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = snap_rotation(rotation_deg);
        self
    }

    /// Sets the asset-specific minimum spacing (builder form).
    pub fn with_min_spacing(mut self, spacing_m: f64) -> Self {
        self.min_spacing_m = spacing_m.max(0.0);
        self
    }

    /// Sets the asset-specific boundary setback (builder form).
    pub fn with_setback(mut self, setback_m: f64) -> Self {
        self.setback_m = setback_m.max(0.0);
        self
    }

    /// Footprint area in square meters.
    pub fn area(&self) -> f64 {
        self.width_m * self.length_m
    }

    /// Current center position.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Relocates the asset center.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// The footprint polygon at the current position and rotation.
    pub fn geometry(&self) -> Polygon {
        oriented_rect(self.x, self.y, self.width_m, self.length_m, self.rotation_deg)
    }

    /// The footprint expanded by `distance` on every side (mitered).
    pub fn buffered_geometry(&self, distance: f64) -> Polygon {
        expanded_rect(
            self.x,
            self.y,
            self.width_m,
            self.length_m,
            self.rotation_deg,
            distance.max(0.0),
        )
    }

    /// The footprint expanded by the asset's own boundary setback.
    pub fn setback_geometry(&self) -> Polygon {
        self.buffered_geometry(self.setback_m)
    }

    /// Axis-aligned bounds `(min_x, min_y, max_x, max_y)` of the footprint.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        // The bbox of a rotated rectangle, without building the polygon.
        let rot = self.rotation_deg.to_radians();
        let (sin_r, cos_r) = rot.sin_cos();
        let ext_x = (self.width_m / 2.0 * cos_r).abs() + (self.length_m / 2.0 * sin_r).abs();
        let ext_y = (self.width_m / 2.0 * sin_r).abs() + (self.length_m / 2.0 * cos_r).abs();
        (
            self.x - ext_x,
            self.y - ext_y,
            self.x + ext_x,
            self.y + ext_y,
        )
    }
}

/// Minimum required separation between two concrete assets.
///
/// The pairwise category rule combined with each asset's own floor:
/// `max(kind rule, a.min_spacing_m, b.min_spacing_m)`.
pub fn required_spacing(a: &Asset, b: &Asset) -> f64 {
    a.kind
        .spacing_to(b.kind)
        .max(a.min_spacing_m)
        .max(b.min_spacing_m)
}

/// Snaps an arbitrary angle to the nearest allowed rotation.
pub fn snap_rotation(rotation_deg: f64) -> f64 {
    let normalized = rotation_deg.rem_euclid(360.0);
    let mut nearest = ALLOWED_ROTATIONS[0];
    let mut best = f64::INFINITY;
    for &r in &ALLOWED_ROTATIONS {
        let d = (normalized - r).abs().min((normalized - r - 360.0).abs());
        if d < best {
            best = d;
            nearest = r;
        }
    }
    nearest
}
