//! Collision and spacing detection over asset footprints.
//!
//! [`CollisionDetector`] owns the [`SpatialIndex`] and layers exact checks
//! on top of its candidate queries:
//!
//! 1. **Bounding-box pre-check**: half-open axis-aligned overlap test;
//!    footprints touching along an edge or corner are not a collision.
//! 2. **Precise check**: true polygon intersection with positive overlap
//!    area, only run on pairs that pass the pre-check.
//! 3. **Spacing check**: exact polygon-to-polygon distance against the
//!    category rule combined with each asset's own minimum spacing.
//!
//! A given pair produces at most one violation: `COLLISION` when the base
//! footprints overlap, otherwise `SPACING_VIOLATION` when the separation is
//! short. Placement validation against boundary, buildable area, and
//! exclusion zones lives here too.

use geo::{Contains, Distance, Euclidean, Intersects, Polygon};

use crate::asset::{required_spacing, Asset};
use crate::geometry::{overlap_area, polygons_overlap};
use crate::objectives::TerrainGrid;

use super::index::SpatialIndex;
use super::violation::{ValidationResult, Violation, ViolationKind};

/// Fraction of an asset's area that must lie inside the boundary before a
/// partial overhang is downgraded from a blocking violation to a warning.
pub const BOUNDARY_OVERLAP_WARNING_THRESHOLD: f64 = 0.9;

/// Detects collisions, spacing violations, and placement problems.
///
/// One detector owns one [`SpatialIndex`]; concurrent optimization runs use
/// separate detector instances.
#[derive(Debug, Default)]
pub struct CollisionDetector {
    index: SpatialIndex,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset to the index (replacing any same-id entry).
    pub fn add_asset(&mut self, asset: Asset) {
        self.index.add_asset(asset);
    }

    /// Removes an asset from the index.
    pub fn remove_asset(&mut self, id: &str) -> Option<Asset> {
        self.index.remove_asset(id)
    }

    /// Removes all assets from the index.
    pub fn clear(&mut self) {
        self.index.clear();
    }

    /// The currently indexed assets, in insertion order.
    pub fn assets(&self) -> &[Asset] {
        self.index.assets()
    }

    /// Axis-aligned bounding-box overlap pre-check.
    ///
    /// Half-open comparison: boxes that share only an edge or a corner do
    /// not collide.
    pub fn check_bounding_box_collision(&self, a: &Asset, b: &Asset) -> bool {
        let (a_min_x, a_min_y, a_max_x, a_max_y) = a.bounds();
        let (b_min_x, b_min_y, b_max_x, b_max_y) = b.bounds();
        !(a_max_x <= b_min_x || b_max_x <= a_min_x || a_max_y <= b_min_y || b_max_y <= a_min_y)
    }

    /// True polygon intersection test.
    ///
    /// Only meaningful after the bounding-box pre-check has passed; callers
    /// use the two checks as a two-phase filter.
    pub fn check_precise_collision(&self, a: &Asset, b: &Asset) -> bool {
        polygons_overlap(&a.geometry(), &b.geometry())
    }

    /// Checks the minimum-spacing rule for a pair.
    ///
    /// Required distance is `max(category rule, a.min_spacing_m,
    /// b.min_spacing_m)`. Returns `(is_valid, actual_m, required_m)`. When
    /// the required distance is zero the geometric distance is skipped
    /// entirely and `(true, 0.0, 0.0)` is returned.
    pub fn check_spacing(&self, a: &Asset, b: &Asset) -> (bool, f64, f64) {
        let required = required_spacing(a, b);
        if required <= 0.0 {
            return (true, 0.0, 0.0);
        }
        let actual = Euclidean.distance(&a.geometry(), &b.geometry());
        (actual >= required, actual, required)
    }

    /// Produces the violation (if any) for one asset pair.
    ///
    /// At most one violation per pair: `COLLISION` when the footprints
    /// overlap, otherwise `SPACING_VIOLATION` when the spacing check fails.
    /// Symmetric in `a` and `b` apart from which id is listed first.
    pub fn check_collision_with_asset(&self, a: &Asset, b: &Asset) -> Vec<Violation> {
        if self.check_bounding_box_collision(a, b) && self.check_precise_collision(a, b) {
            return vec![Violation::blocking(
                ViolationKind::Collision,
                &a.id,
                format!("{} '{}' overlaps {} '{}'", a.kind.label(), a.name, b.kind.label(), b.name),
            )
            .against(&b.id)];
        }

        let (ok, actual, required) = self.check_spacing(a, b);
        if !ok {
            return vec![Violation::blocking(
                ViolationKind::SpacingViolation,
                &a.id,
                format!(
                    "'{}' is {actual:.2} m from '{}', {required:.2} m required",
                    a.name, b.name
                ),
            )
            .against(&b.id)
            .with_distances(actual, required)];
        }

        vec![]
    }

    /// Queries the index for assets that could possibly conflict.
    ///
    /// The asset's envelope is grown by `buffer` on every side; the result
    /// is a superset of the true violators (exact filtering happens in
    /// [`check_collision_with_asset`](Self::check_collision_with_asset)).
    /// The queried asset itself is excluded.
    pub fn find_potential_collisions(&mut self, asset: &Asset, buffer: f64) -> Vec<Asset> {
        let (min_x, min_y, max_x, max_y) = asset.bounds();
        let buffer = buffer.max(0.0);
        self.index
            .query(
                [min_x - buffer, min_y - buffer],
                [max_x + buffer, max_y + buffer],
            )
            .into_iter()
            .filter(|candidate| candidate.id != asset.id)
            .cloned()
            .collect()
    }

    /// All collision and spacing violations for `asset` against the index.
    ///
    /// The candidate buffer is the largest spacing any indexed pair could
    /// require of this asset, so no true violator escapes the range query.
    pub fn check_collisions(&mut self, asset: &Asset, exclude_ids: &[&str]) -> Vec<Violation> {
        let buffer = self
            .index
            .assets()
            .iter()
            .filter(|other| other.id != asset.id)
            .map(|other| required_spacing(asset, other))
            .fold(asset.min_spacing_m, f64::max);

        let candidates = self.find_potential_collisions(asset, buffer);
        let mut violations = Vec::new();
        for candidate in &candidates {
            if exclude_ids.contains(&candidate.id.as_str()) {
                continue;
            }
            violations.extend(self.check_collision_with_asset(asset, candidate));
        }
        violations
    }

    /// Validates a single placement against site geometry.
    ///
    /// - Boundary: entirely outside, or less than 90% inside, is a blocking
    ///   `OUT_OF_BOUNDS`; at least 90% but not fully inside is a warning.
    /// - Buildable area: non-containment is a blocking `SETBACK_VIOLATION`.
    /// - Exclusion zones: any intersection is a blocking `EXCLUSION_ZONE`.
    /// - Slope: an external hook; when a maximum slope is requested this
    ///   emits a warning placeholder and computes nothing; actual slope
    ///   sampling belongs to the terrain subsystem.
    pub fn validate_placement(
        &self,
        asset: &Asset,
        boundary: Option<&Polygon>,
        exclusion_zones: &[Polygon],
        buildable_area: Option<&Polygon>,
        max_slope_percent: Option<f64>,
        slope_grid: Option<&TerrainGrid>,
    ) -> ValidationResult {
        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        let footprint = asset.geometry();

        if let Some(boundary) = boundary {
            if !boundary.intersects(&footprint) {
                violations.push(Violation::blocking(
                    ViolationKind::OutOfBounds,
                    &asset.id,
                    format!("'{}' lies entirely outside the site boundary", asset.name),
                ));
            } else if !boundary.contains(&footprint) {
                let inside_fraction = overlap_area(&footprint, boundary) / asset.area();
                if inside_fraction < BOUNDARY_OVERLAP_WARNING_THRESHOLD {
                    violations.push(Violation::blocking(
                        ViolationKind::OutOfBounds,
                        &asset.id,
                        format!(
                            "'{}' is only {:.0}% inside the site boundary",
                            asset.name,
                            inside_fraction * 100.0
                        ),
                    ));
                } else {
                    warnings.push(Violation::warning(
                        ViolationKind::OutOfBounds,
                        &asset.id,
                        format!(
                            "'{}' overhangs the site boundary ({:.0}% inside)",
                            asset.name,
                            inside_fraction * 100.0
                        ),
                    ));
                }
            }
        }

        if let Some(buildable) = buildable_area {
            if !buildable.contains(&footprint) {
                violations.push(Violation::blocking(
                    ViolationKind::SetbackViolation,
                    &asset.id,
                    format!("'{}' leaves the buildable area", asset.name),
                ));
            }
        }

        for (i, zone) in exclusion_zones.iter().enumerate() {
            if zone.intersects(&footprint) {
                violations.push(Violation::blocking(
                    ViolationKind::ExclusionZone,
                    &asset.id,
                    format!("'{}' intersects exclusion zone {i}", asset.name),
                ));
            }
        }

        if let Some(max_slope) = max_slope_percent {
            let raster = if slope_grid.is_some() {
                "slope raster supplied"
            } else {
                "no slope raster supplied"
            };
            warnings.push(Violation::warning(
                ViolationKind::SlopeViolation,
                &asset.id,
                format!(
                    "slope check (max {max_slope:.1}%) deferred to the terrain subsystem; {raster}"
                ),
            ));
        }

        ValidationResult::new(violations, warnings)
    }

    /// Exhaustive O(n²) spacing audit over every indexed asset pair.
    ///
    /// Independent of any single query; overlapping pairs are reported by
    /// [`check_collisions`](Self::check_collisions), so this audit only
    /// emits spacing violations.
    pub fn check_minimum_spacing_violations(&self) -> Vec<Violation> {
        let assets = self.index.assets();
        let mut violations = Vec::new();
        for i in 0..assets.len() {
            for j in (i + 1)..assets.len() {
                let (ok, actual, required) = self.check_spacing(&assets[i], &assets[j]);
                if !ok {
                    violations.push(
                        Violation::blocking(
                            ViolationKind::SpacingViolation,
                            &assets[i].id,
                            format!(
                                "'{}' is {actual:.2} m from '{}', {required:.2} m required",
                                assets[i].name, assets[j].name
                            ),
                        )
                        .against(&assets[j].id)
                        .with_distances(actual, required),
                    );
                }
            }
        }
        violations
    }
}
