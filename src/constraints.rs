//! Site constraints and buildable-area derivation.
//!
//! [`SiteConstraints`] bundles the site boundary, buildable and exclusion
//! zones, regulatory geometries, and the numeric limits (setback, spacing,
//! coverage) that govern placement. Construction-time invariants are
//! enforced immediately: an invalid boundary, a negative setback, or a
//! coverage bound outside (0, 100] is a fatal error, never a penalty.
//!
//! Geometric degenerate cases are not errors: a setback that collapses the
//! boundary simply yields an empty buildable area, which flags every
//! placement infeasible through the normal penalty path.

use geo::{Area, BooleanOps, Contains, Intersects, MultiPolygon, Polygon, Validation};
use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::{Error, Result};
use crate::geometry::{empty_polygon, offset_inward, to_multi, union_all, AREA_EPS};

/// A named regulatory geometry (easement, right-of-way, flood zone, …).
///
/// Only the geometry participates in placement checks; the name is carried
/// for reporting.
#[derive(Debug, Clone)]
pub struct RegulatoryConstraint {
    pub name: String,
    pub geometry: Polygon,
}

impl RegulatoryConstraint {
    pub fn new(name: impl Into<String>, geometry: Polygon) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }
}

/// Geometric and regulatory constraints for one optimization run.
#[derive(Debug, Clone)]
pub struct SiteConstraints {
    /// The parcel outline. Always a valid simple polygon.
    pub site_boundary: Polygon,
    /// Zones placements must fall inside (when any are declared).
    pub buildable_zones: Vec<Polygon>,
    /// Zones placements must never intersect.
    pub exclusion_zones: Vec<Polygon>,
    /// Regulatory geometries placements must never intersect.
    pub regulatory_constraints: Vec<RegulatoryConstraint>,
    /// Inward setback from the site boundary, meters. Non-negative.
    pub min_setback_m: f64,
    /// Site-wide minimum spacing floor between assets, meters.
    pub min_asset_spacing_m: f64,
    /// Maximum total footprint coverage, percent of site area, in (0, 100].
    pub max_site_coverage_percent: f64,
    /// Whether layouts must be reachable from the road entry point.
    /// Consumed by the external road subsystem; carried here as data.
    pub require_road_access: bool,
    /// Upper bound on total road length, meters. Normalizes the
    /// road-length objective.
    pub max_total_road_length_m: f64,
}

impl SiteConstraints {
    /// Creates constraints for a site boundary.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBoundary`] when the boundary self-intersects,
    /// is unclosed, or has no area.
    pub fn new(site_boundary: Polygon) -> Result<Self> {
        if site_boundary.exterior().0.len() < 4 || site_boundary.unsigned_area() < AREA_EPS {
            return Err(Error::InvalidBoundary(
                "site boundary must enclose a positive area".into(),
            ));
        }
        if !site_boundary.is_valid() {
            return Err(Error::InvalidBoundary(
                "site boundary is not a valid simple polygon (self-intersection?)".into(),
            ));
        }
        Ok(Self {
            site_boundary,
            buildable_zones: Vec::new(),
            exclusion_zones: Vec::new(),
            regulatory_constraints: Vec::new(),
            min_setback_m: 0.0,
            min_asset_spacing_m: 0.0,
            max_site_coverage_percent: 100.0,
            require_road_access: false,
            max_total_road_length_m: 1000.0,
        })
    }

    /// Sets the boundary setback.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstraint`] for a negative setback.
    pub fn with_min_setback(mut self, setback_m: f64) -> Result<Self> {
        if setback_m < 0.0 {
            return Err(Error::InvalidConstraint(format!(
                "min_setback_m must be non-negative, got {setback_m}"
            )));
        }
        self.min_setback_m = setback_m;
        Ok(self)
    }

    /// Sets the site-wide asset spacing floor.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstraint`] for a negative spacing.
    pub fn with_min_asset_spacing(mut self, spacing_m: f64) -> Result<Self> {
        if spacing_m < 0.0 {
            return Err(Error::InvalidConstraint(format!(
                "min_asset_spacing_m must be non-negative, got {spacing_m}"
            )));
        }
        self.min_asset_spacing_m = spacing_m;
        Ok(self)
    }

    /// Sets the maximum site coverage.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConstraint`] when outside (0, 100].
    pub fn with_max_coverage(mut self, percent: f64) -> Result<Self> {
        if percent <= 0.0 || percent > 100.0 {
            return Err(Error::InvalidConstraint(format!(
                "max_site_coverage_percent must be in (0, 100], got {percent}"
            )));
        }
        self.max_site_coverage_percent = percent;
        Ok(self)
    }

    /// Adds a buildable zone.
    pub fn with_buildable_zone(mut self, zone: Polygon) -> Self {
        self.buildable_zones.push(zone);
        self
    }

    /// Adds an exclusion zone.
    pub fn with_exclusion_zone(mut self, zone: Polygon) -> Self {
        self.exclusion_zones.push(zone);
        self
    }

    /// Adds a regulatory constraint.
    pub fn with_regulatory(mut self, constraint: RegulatoryConstraint) -> Self {
        self.regulatory_constraints.push(constraint);
        self
    }

    /// Requires road access and bounds total road length.
    pub fn with_road_access(mut self, max_total_road_length_m: f64) -> Self {
        self.require_road_access = true;
        self.max_total_road_length_m = max_total_road_length_m.max(1.0);
        self
    }

    /// Derives the buildable-area polygon.
    ///
    /// Boundary, shrunk inward by the setback, intersected with the union
    /// of buildable zones (when declared), minus the union of exclusion
    /// zones, minus each regulatory geometry in turn. Anything other than a
    /// single polygon with positive area collapses to the empty polygon.
    pub fn buildable_area(&self) -> Polygon {
        let mut result: MultiPolygon = offset_inward(&self.site_boundary, self.min_setback_m);
        if result.unsigned_area() < AREA_EPS {
            log::warn!(
                "setback {} m collapses the site boundary; buildable area is empty",
                self.min_setback_m
            );
            return empty_polygon();
        }

        if !self.buildable_zones.is_empty() {
            result = result.intersection(&union_all(&self.buildable_zones));
        }
        if !self.exclusion_zones.is_empty() {
            result = result.difference(&union_all(&self.exclusion_zones));
        }
        for constraint in &self.regulatory_constraints {
            result = result.difference(&to_multi(&constraint.geometry));
        }

        // Clipping can leave degenerate slivers alongside the real region.
        let mut parts: Vec<Polygon> = result
            .0
            .into_iter()
            .filter(|p| p.unsigned_area() > AREA_EPS)
            .collect();

        match parts.len() {
            1 => parts.pop().expect("length checked"),
            0 => empty_polygon(),
            n => {
                log::warn!("buildable area split into {n} disjoint parts; treating as empty");
                empty_polygon()
            }
        }
    }

    /// Side-effect-free position validity check.
    ///
    /// Temporarily relocates the asset to `(x, y)`, evaluates boundary
    /// containment, setback-geometry containment, buildable-zone membership
    /// (when zones are declared), and non-intersection with every exclusion
    /// and regulatory geometry, then restores the original position on
    /// every path before returning.
    pub fn is_position_valid(&self, asset: &mut Asset, x: f64, y: f64) -> bool {
        let (orig_x, orig_y) = asset.position();
        asset.set_position(x, y);

        let footprint = asset.geometry();
        let setback_footprint = asset.setback_geometry();

        let mut valid = self.site_boundary.contains(&footprint)
            && self.site_boundary.contains(&setback_footprint);

        if valid && !self.buildable_zones.is_empty() {
            valid = self.buildable_zones.iter().any(|z| z.contains(&footprint));
        }
        if valid {
            valid = !self.exclusion_zones.iter().any(|z| z.intersects(&footprint))
                && !self
                    .regulatory_constraints
                    .iter()
                    .any(|c| c.geometry.intersects(&footprint));
        }

        asset.set_position(orig_x, orig_y);
        valid
    }
}

/// Serializable summary of the numeric constraint settings, for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintSummary {
    pub min_setback_m: f64,
    pub min_asset_spacing_m: f64,
    pub max_site_coverage_percent: f64,
    pub require_road_access: bool,
    pub max_total_road_length_m: f64,
    pub buildable_zones: usize,
    pub exclusion_zones: usize,
    pub regulatory_constraints: usize,
}

impl From<&SiteConstraints> for ConstraintSummary {
    fn from(c: &SiteConstraints) -> Self {
        Self {
            min_setback_m: c.min_setback_m,
            min_asset_spacing_m: c.min_asset_spacing_m,
            max_site_coverage_percent: c.max_site_coverage_percent,
            require_road_access: c.require_road_access,
            max_total_road_length_m: c.max_total_road_length_m,
            buildable_zones: c.buildable_zones.len(),
            exclusion_zones: c.exclusion_zones.len(),
            regulatory_constraints: c.regulatory_constraints.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::geometry::{polygon_is_empty, rect_polygon};
    use geo::{coord, LineString};

    fn square_site(size: f64) -> SiteConstraints {
        SiteConstraints::new(rect_polygon(0.0, 0.0, size, size)).unwrap()
    }

    // ---- Construction invariants ----

    #[test]
    fn test_self_intersecting_boundary_rejected() {
        // Bowtie: crosses itself at the center.
        let bowtie = Polygon::new(
            LineString::from(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 10.0, y: 10.0 },
                coord! { x: 10.0, y: 0.0 },
                coord! { x: 0.0, y: 10.0 },
            ]),
            vec![],
        );
        assert!(matches!(
            SiteConstraints::new(bowtie),
            Err(Error::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_degenerate_boundary_rejected() {
        let line = Polygon::new(
            LineString::from(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 10.0, y: 0.0 },
            ]),
            vec![],
        );
        assert!(SiteConstraints::new(line).is_err());
    }

    #[test]
    fn test_negative_setback_rejected() {
        assert!(matches!(
            square_site(100.0).with_min_setback(-1.0),
            Err(Error::InvalidConstraint(_))
        ));
    }

    #[test]
    fn test_coverage_bounds_rejected() {
        assert!(square_site(100.0).with_max_coverage(0.0).is_err());
        assert!(square_site(100.0).with_max_coverage(101.0).is_err());
        assert!(square_site(100.0).with_max_coverage(100.0).is_ok());
        assert!(square_site(100.0).with_max_coverage(35.0).is_ok());
    }

    // ---- Buildable area ----

    #[test]
    fn test_buildable_area_square_setback_exact() {
        // 100×100 with 10 m setback → (100 − 2·10)² = 6400, exact.
        let constraints = square_site(100.0).with_min_setback(10.0).unwrap();
        let area = constraints.buildable_area().unsigned_area();
        assert!((area - 6400.0).abs() < 1e-6, "got {area}");
    }

    #[test]
    fn test_buildable_area_collapsing_setback_is_empty() {
        let constraints = square_site(100.0).with_min_setback(60.0).unwrap();
        assert!(polygon_is_empty(&constraints.buildable_area()));
    }

    #[test]
    fn test_buildable_area_subtracts_exclusion() {
        let constraints = square_site(100.0)
            .with_exclusion_zone(rect_polygon(0.0, 0.0, 100.0, 20.0));
        let area = constraints.buildable_area().unsigned_area();
        assert!((area - 8000.0).abs() < 1e-6, "got {area}");
    }

    #[test]
    fn test_buildable_area_intersects_declared_zones() {
        let constraints =
            square_site(100.0).with_buildable_zone(rect_polygon(0.0, 0.0, 50.0, 100.0));
        let area = constraints.buildable_area().unsigned_area();
        assert!((area - 5000.0).abs() < 1e-6, "got {area}");
    }

    #[test]
    fn test_buildable_area_split_collapses_to_empty() {
        // A full-height exclusion strip cuts the site into two parts.
        let constraints = square_site(100.0)
            .with_exclusion_zone(rect_polygon(45.0, -1.0, 55.0, 101.0));
        assert!(polygon_is_empty(&constraints.buildable_area()));
    }

    #[test]
    fn test_buildable_area_subtracts_regulatory() {
        let constraints = square_site(100.0).with_regulatory(RegulatoryConstraint::new(
            "easement",
            rect_polygon(0.0, 90.0, 100.0, 100.0),
        ));
        let area = constraints.buildable_area().unsigned_area();
        assert!((area - 9000.0).abs() < 1e-6, "got {area}");
    }

    // ---- Position validity ----

    #[test]
    fn test_is_position_valid_restores_position() {
        let constraints = square_site(100.0);
        let mut asset =
            Asset::new("a", "A", AssetKind::Building, 10.0, 10.0).at(50.0, 50.0);

        assert!(constraints.is_position_valid(&mut asset, 20.0, 20.0));
        assert_eq!(asset.position(), (50.0, 50.0));

        // Restored on the failing path too.
        assert!(!constraints.is_position_valid(&mut asset, 500.0, 500.0));
        assert_eq!(asset.position(), (50.0, 50.0));
    }

    #[test]
    fn test_is_position_valid_checks_exclusions() {
        let constraints =
            square_site(100.0).with_exclusion_zone(rect_polygon(40.0, 40.0, 60.0, 60.0));
        let mut asset = Asset::new("a", "A", AssetKind::Building, 10.0, 10.0);

        assert!(!constraints.is_position_valid(&mut asset, 50.0, 50.0));
        assert!(constraints.is_position_valid(&mut asset, 20.0, 20.0));
    }

    #[test]
    fn test_is_position_valid_requires_zone_membership() {
        let constraints =
            square_site(100.0).with_buildable_zone(rect_polygon(0.0, 0.0, 40.0, 40.0));
        let mut asset = Asset::new("a", "A", AssetKind::Building, 10.0, 10.0);

        assert!(constraints.is_position_valid(&mut asset, 20.0, 20.0));
        assert!(!constraints.is_position_valid(&mut asset, 80.0, 80.0));
    }

    #[test]
    fn test_is_position_valid_honors_asset_setback() {
        let constraints = square_site(100.0);
        let mut asset = Asset::new("a", "A", AssetKind::Building, 10.0, 10.0).with_setback(5.0);

        // Footprint fits, but the setback-buffered footprint pokes out.
        assert!(!constraints.is_position_valid(&mut asset, 7.0, 50.0));
        assert!(constraints.is_position_valid(&mut asset, 12.0, 50.0));
    }

    #[test]
    fn test_is_position_valid_checks_regulatory() {
        let constraints = square_site(100.0).with_regulatory(RegulatoryConstraint::new(
            "easement",
            rect_polygon(70.0, 0.0, 100.0, 30.0),
        ));
        let mut asset = Asset::new("a", "A", AssetKind::Building, 10.0, 10.0);

        assert!(!constraints.is_position_valid(&mut asset, 80.0, 15.0));
        assert!(constraints.is_position_valid(&mut asset, 30.0, 70.0));
    }

    // ---- Summary ----

    #[test]
    fn test_summary_reflects_settings() {
        let constraints = square_site(100.0)
            .with_min_setback(5.0)
            .unwrap()
            .with_max_coverage(40.0)
            .unwrap()
            .with_exclusion_zone(rect_polygon(0.0, 0.0, 10.0, 10.0))
            .with_road_access(500.0);

        let summary = ConstraintSummary::from(&constraints);
        assert_eq!(summary.min_setback_m, 5.0);
        assert_eq!(summary.max_site_coverage_percent, 40.0);
        assert_eq!(summary.exclusion_zones, 1);
        assert_eq!(summary.buildable_zones, 0);
        assert!(summary.require_road_access);
        assert_eq!(summary.max_total_road_length_m, 500.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["exclusion_zones"], 1);
    }
}
