//! Fitness evaluation for placement solutions.
//!
//! Evaluation is a two-stage gate. First every constraint violation is
//! counted: boundary non-containment per asset, footprint overlap and
//! buffered-spacing intersection per pair, exclusion-zone intersection per
//! asset per zone, and one violation when total coverage exceeds the site
//! bound. Any violation short-circuits scoring with the exponential penalty
//! `−10000 · v^1.5`, which keeps every infeasible layout strictly below the
//! `[0, 100]` fitness band of feasible ones. Only violation-free layouts
//! get the five sub-objective scores.
//!
//! The sub-objective formulas are deliberate simplifications (the slope
//! objective, for example, uses positional variance as a proxy). Changing a
//! formula changes the fitness landscape under existing layouts, so they are
//! kept stable.

use geo::{Centroid, Contains, Intersects};
use serde::{Deserialize, Serialize};

use crate::asset::{required_spacing, Asset};
use crate::constraints::SiteConstraints;
use crate::ga::PlacementSolution;
use crate::geometry::polygons_overlap;

use super::terrain::TerrainGrid;
use super::weights::ObjectiveWeights;

/// Penalty coefficient applied per violation count.
pub const VIOLATION_PENALTY: f64 = -10_000.0;

/// Exponent of the violation count in the penalty.
pub const VIOLATION_PENALTY_EXPONENT: f64 = 1.5;

/// Score used when an objective's input data is absent.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Distance (meters) at which average centroid distance zeroes the
/// accessibility score.
pub const ACCESSIBILITY_NORMALIZER_M: f64 = 200.0;

/// Positional variance (m²) at which the slope-variance proxy bottoms out.
pub const POSITION_VARIANCE_NORMALIZER: f64 = 10_000.0;

/// Sampled elevation variance (m²) at which cut/fill bottoms out.
pub const ELEVATION_VARIANCE_NORMALIZER: f64 = 100.0;

/// Per-objective scores for one solution, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScores {
    pub cut_fill: f64,
    pub accessibility: f64,
    pub road_length: f64,
    pub compactness: f64,
    pub slope_variance: f64,
}

impl ObjectiveScores {
    /// Blends the scores with the given weights.
    pub fn weighted_total(&self, weights: &ObjectiveWeights) -> f64 {
        weights.cut_fill * self.cut_fill
            + weights.accessibility * self.accessibility
            + weights.road_length * self.road_length
            + weights.compactness * self.compactness
            + weights.slope_variance * self.slope_variance
    }
}

/// Scores full layouts against constraints and objectives.
#[derive(Debug, Clone)]
pub struct ObjectiveEvaluator {
    weights: ObjectiveWeights,
    constraints: SiteConstraints,
    road_entry: Option<(f64, f64)>,
    elevation: Option<TerrainGrid>,
    slope: Option<TerrainGrid>,
}

impl ObjectiveEvaluator {
    pub fn new(weights: ObjectiveWeights, constraints: SiteConstraints) -> Self {
        Self {
            weights,
            constraints,
            road_entry: None,
            elevation: None,
            slope: None,
        }
    }

    /// Sets the road entry point used by the road-length objective.
    pub fn with_road_entry(mut self, x: f64, y: f64) -> Self {
        self.road_entry = Some((x, y));
        self
    }

    /// Supplies elevation data, enabling the cut/fill objective.
    pub fn with_elevation(mut self, grid: TerrainGrid) -> Self {
        self.elevation = Some(grid);
        self
    }

    /// Supplies slope data, enabling the slope-variance objective.
    pub fn with_slope(mut self, grid: TerrainGrid) -> Self {
        self.slope = Some(grid);
        self
    }

    pub fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }

    pub fn constraints(&self) -> &SiteConstraints {
        &self.constraints
    }

    /// Evaluates a solution, recording fitness, sub-scores, violation count
    /// and validity on the solution itself, and returns the fitness.
    pub fn evaluate(&self, solution: &mut PlacementSolution) -> f64 {
        let violations = self.count_violations(&solution.assets);
        solution.constraint_violations = violations;

        if violations > 0 {
            // Sub-scores are intentionally not computed for infeasible
            // layouts; the penalty alone ranks them.
            solution.is_valid = false;
            solution.objectives = ObjectiveScores::default();
            solution.fitness =
                VIOLATION_PENALTY * (violations as f64).powf(VIOLATION_PENALTY_EXPONENT);
            solution.evaluated = true;
            return solution.fitness;
        }

        let scores = ObjectiveScores {
            cut_fill: self.score_cut_fill(&solution.assets),
            accessibility: self.score_accessibility(&solution.assets),
            road_length: self.score_road_length(&solution.assets),
            compactness: self.score_compactness(&solution.assets),
            slope_variance: self.score_slope_variance(&solution.assets),
        };

        solution.is_valid = true;
        solution.objectives = scores;
        solution.fitness = scores.weighted_total(&self.weights);
        solution.evaluated = true;
        solution.fitness
    }

    /// Counts every constraint violation in the layout.
    fn count_violations(&self, assets: &[Asset]) -> usize {
        let boundary = &self.constraints.site_boundary;
        let mut count = 0;

        for asset in assets {
            if !boundary.contains(&asset.geometry()) {
                count += 1;
            }
            for zone in &self.constraints.exclusion_zones {
                if zone.intersects(&asset.geometry()) {
                    count += 1;
                }
            }
        }

        for i in 0..assets.len() {
            let geometry_i = assets[i].geometry();
            for j in (i + 1)..assets.len() {
                let geometry_j = assets[j].geometry();
                if polygons_overlap(&geometry_i, &geometry_j) {
                    count += 1;
                }
                let spacing = required_spacing(&assets[i], &assets[j])
                    .max(self.constraints.min_asset_spacing_m);
                if assets[i].buffered_geometry(spacing).intersects(&geometry_j) {
                    count += 1;
                }
            }
        }

        let site_area = geo::Area::unsigned_area(boundary);
        if site_area > 0.0 {
            let total: f64 = assets.iter().map(Asset::area).sum();
            let coverage = total / site_area * 100.0;
            if coverage > self.constraints.max_site_coverage_percent {
                count += 1;
            }
        }

        count
    }

    /// Cut/fill balance proxy: variance of sampled elevations per asset.
    ///
    /// Neutral 50 without elevation data.
    fn score_cut_fill(&self, assets: &[Asset]) -> f64 {
        let grid = match &self.elevation {
            Some(g) => g,
            None => return NEUTRAL_SCORE,
        };
        let samples: Vec<f64> = assets
            .iter()
            .filter_map(|a| grid.sample(a.x, a.y))
            .collect();
        if samples.is_empty() {
            return NEUTRAL_SCORE;
        }
        let var = variance(&samples);
        100.0 * (1.0 - (var / ELEVATION_VARIANCE_NORMALIZER).min(1.0))
    }

    /// Mean distance of asset centers to the site centroid, normalized to
    /// [`ACCESSIBILITY_NORMALIZER_M`].
    fn score_accessibility(&self, assets: &[Asset]) -> f64 {
        if assets.is_empty() {
            return 100.0;
        }
        let centroid = match self.constraints.site_boundary.centroid() {
            Some(c) => c,
            None => return NEUTRAL_SCORE,
        };
        let avg: f64 = assets
            .iter()
            .map(|a| ((a.x - centroid.x()).powi(2) + (a.y - centroid.y()).powi(2)).sqrt())
            .sum::<f64>()
            / assets.len() as f64;
        100.0 * (1.0 - (avg / ACCESSIBILITY_NORMALIZER_M).min(1.0))
    }

    /// Total straight-line distance from each asset to the road entry,
    /// normalized to the maximum total road length.
    ///
    /// Neutral 50 when no road entry point is supplied.
    fn score_road_length(&self, assets: &[Asset]) -> f64 {
        let (entry_x, entry_y) = match self.road_entry {
            Some(p) => p,
            None => return NEUTRAL_SCORE,
        };
        let total: f64 = assets
            .iter()
            .map(|a| ((a.x - entry_x).powi(2) + (a.y - entry_y).powi(2)).sqrt())
            .sum();
        let max_length = self.constraints.max_total_road_length_m.max(1.0);
        100.0 * (1.0 - (total / max_length).min(1.0))
    }

    /// Footprint area over the bounding box of all asset vertices.
    ///
    /// 100 for fewer than two assets or a degenerate bounding box.
    fn score_compactness(&self, assets: &[Asset]) -> f64 {
        if assets.len() < 2 {
            return 100.0;
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for asset in assets {
            for coord in &asset.geometry().exterior().0 {
                min_x = min_x.min(coord.x);
                min_y = min_y.min(coord.y);
                max_x = max_x.max(coord.x);
                max_y = max_y.max(coord.y);
            }
        }
        let bbox_area = (max_x - min_x) * (max_y - min_y);
        if bbox_area <= f64::EPSILON {
            return 100.0;
        }
        let total: f64 = assets.iter().map(Asset::area).sum();
        100.0 * (total / bbox_area).min(1.0)
    }

    /// Slope-variance proxy: variance of asset positions.
    ///
    /// Neutral 50 without slope data. A positional proxy, not real slope
    /// sampling; kept for behavioral compatibility.
    fn score_slope_variance(&self, assets: &[Asset]) -> f64 {
        if self.slope.is_none() {
            return NEUTRAL_SCORE;
        }
        if assets.is_empty() {
            return 100.0;
        }
        let n = assets.len() as f64;
        let mean_x: f64 = assets.iter().map(|a| a.x).sum::<f64>() / n;
        let mean_y: f64 = assets.iter().map(|a| a.y).sum::<f64>() / n;
        let var: f64 = assets
            .iter()
            .map(|a| (a.x - mean_x).powi(2) + (a.y - mean_y).powi(2))
            .sum::<f64>()
            / n;
        100.0 * (1.0 - (var / POSITION_VARIANCE_NORMALIZER).min(1.0))
    }
}

/// Population variance of a sample.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::geometry::rect_polygon;

    fn evaluator(size: f64) -> ObjectiveEvaluator {
        let constraints = SiteConstraints::new(rect_polygon(0.0, 0.0, size, size)).unwrap();
        ObjectiveEvaluator::new(ObjectiveWeights::balanced(), constraints)
    }

    fn building(id: &str, w: f64, l: f64, x: f64, y: f64) -> Asset {
        Asset::new(id, format!("Building {id}"), AssetKind::Building, w, l).at(x, y)
    }

    fn solution(assets: Vec<Asset>) -> PlacementSolution {
        PlacementSolution::new(assets)
    }

    // ---- Penalty path ----

    #[test]
    fn test_out_of_bounds_penalized() {
        let eval = evaluator(200.0);
        let mut sol = solution(vec![building("a", 10.0, 10.0, 500.0, 500.0)]);
        let fitness = eval.evaluate(&mut sol);

        assert!(!sol.is_valid);
        assert_eq!(sol.constraint_violations, 1);
        assert!((fitness - VIOLATION_PENALTY).abs() < 1e-9, "v=1 → −10000");
        // Sub-scores are not computed on the penalty path.
        assert_eq!(sol.objectives, ObjectiveScores::default());
    }

    #[test]
    fn test_penalty_grows_superlinearly() {
        let eval = evaluator(200.0);
        // Two assets out of bounds and overlapping: 2 OOB + 1 overlap +
        // 1 buffered-spacing = 4 violations.
        let mut sol = solution(vec![
            building("a", 10.0, 10.0, 500.0, 500.0),
            building("b", 10.0, 10.0, 502.0, 500.0),
        ]);
        let fitness = eval.evaluate(&mut sol);
        assert_eq!(sol.constraint_violations, 4);
        assert!((fitness - VIOLATION_PENALTY * 4.0f64.powf(1.5)).abs() < 1e-6);
    }

    #[test]
    fn test_any_infeasible_below_any_feasible() {
        let eval = evaluator(200.0);

        let mut feasible = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        let feasible_fitness = eval.evaluate(&mut feasible);
        assert!(feasible.is_valid);
        assert!((0.0..=100.0).contains(&feasible_fitness));

        let mut infeasible = solution(vec![building("a", 10.0, 10.0, 500.0, 500.0)]);
        let infeasible_fitness = eval.evaluate(&mut infeasible);
        assert!(infeasible_fitness < feasible_fitness);
        assert!(infeasible_fitness < 0.0);
    }

    #[test]
    fn test_exclusion_zone_counted_per_asset() {
        let constraints = SiteConstraints::new(rect_polygon(0.0, 0.0, 200.0, 200.0))
            .unwrap()
            .with_exclusion_zone(rect_polygon(0.0, 0.0, 200.0, 50.0));
        let eval = ObjectiveEvaluator::new(ObjectiveWeights::balanced(), constraints);

        let mut sol = solution(vec![
            building("a", 10.0, 10.0, 50.0, 25.0),
            building("b", 10.0, 10.0, 150.0, 25.0),
        ]);
        eval.evaluate(&mut sol);
        assert_eq!(sol.constraint_violations, 2);
    }

    #[test]
    fn test_coverage_violation_counted_once() {
        let constraints = SiteConstraints::new(rect_polygon(0.0, 0.0, 200.0, 200.0))
            .unwrap()
            .with_max_coverage(1.0)
            .unwrap();
        let eval = ObjectiveEvaluator::new(ObjectiveWeights::balanced(), constraints);

        // 2500 m² on a 40000 m² site = 6.25% > 1%.
        let mut sol = solution(vec![building("a", 50.0, 50.0, 100.0, 100.0)]);
        eval.evaluate(&mut sol);
        assert_eq!(sol.constraint_violations, 1);
    }

    #[test]
    fn test_spacing_buffer_intersection_counted() {
        let eval = evaluator(200.0);
        // 4 m apart; buildings need 10 m. No overlap, one buffered hit.
        let mut sol = solution(vec![
            building("a", 20.0, 20.0, 50.0, 50.0),
            building("b", 20.0, 20.0, 74.0, 50.0),
        ]);
        eval.evaluate(&mut sol);
        assert_eq!(sol.constraint_violations, 1);
        assert!(!sol.is_valid);
    }

    // ---- Objective formulas ----

    #[test]
    fn test_neutral_scores_without_terrain() {
        let eval = evaluator(200.0);
        let mut sol = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        eval.evaluate(&mut sol);
        assert_eq!(sol.objectives.cut_fill, NEUTRAL_SCORE);
        assert_eq!(sol.objectives.slope_variance, NEUTRAL_SCORE);
    }

    #[test]
    fn test_accessibility_peaks_at_centroid() {
        let eval = evaluator(200.0);
        let mut centered = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        eval.evaluate(&mut centered);
        assert!((centered.objectives.accessibility - 100.0).abs() < 1e-9);

        // 50 m from the centroid → 100·(1 − 50/200) = 75.
        let mut offset = solution(vec![building("a", 10.0, 10.0, 150.0, 100.0)]);
        eval.evaluate(&mut offset);
        assert!((offset.objectives.accessibility - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_road_length_neutral_without_entry() {
        let eval = evaluator(200.0);
        let mut sol = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        eval.evaluate(&mut sol);
        assert_eq!(sol.objectives.road_length, NEUTRAL_SCORE);
    }

    #[test]
    fn test_road_length_scores_distance_to_entry() {
        let constraints = SiteConstraints::new(rect_polygon(0.0, 0.0, 200.0, 200.0))
            .unwrap()
            .with_road_access(1000.0);
        let eval = ObjectiveEvaluator::new(ObjectiveWeights::balanced(), constraints)
            .with_road_entry(0.0, 100.0);

        // One asset 100 m from the entry → 100·(1 − 100/1000) = 90.
        let mut sol = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        eval.evaluate(&mut sol);
        assert!((sol.objectives.road_length - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_compactness_single_asset_is_100() {
        let eval = evaluator(200.0);
        let mut sol = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        eval.evaluate(&mut sol);
        assert_eq!(sol.objectives.compactness, 100.0);
    }

    #[test]
    fn test_compactness_rewards_tight_layouts() {
        let eval = evaluator(400.0);
        // Identical assets, 10 m wide, with 20 m vs 150 m center spacing.
        let mut tight = solution(vec![
            building("a", 10.0, 10.0, 100.0, 200.0),
            building("b", 10.0, 10.0, 130.0, 200.0),
        ]);
        let mut sparse = solution(vec![
            building("a", 10.0, 10.0, 100.0, 200.0),
            building("b", 10.0, 10.0, 300.0, 200.0),
        ]);
        eval.evaluate(&mut tight);
        eval.evaluate(&mut sparse);
        assert!(tight.is_valid && sparse.is_valid);
        assert!(tight.objectives.compactness > sparse.objectives.compactness);
    }

    #[test]
    fn test_cut_fill_flat_terrain_scores_high() {
        let grid = TerrainGrid::new(vec![100.0; 400], 20, 20, 0.0, 0.0, 10.0).unwrap();
        let eval = evaluator(200.0).with_elevation(grid);
        let mut sol = solution(vec![
            building("a", 10.0, 10.0, 60.0, 100.0),
            building("b", 10.0, 10.0, 140.0, 100.0),
        ]);
        eval.evaluate(&mut sol);
        // Zero elevation variance → perfect cut/fill balance.
        assert!((sol.objectives.cut_fill - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_slope_variance_uses_positional_proxy() {
        let grid = TerrainGrid::new(vec![0.0; 400], 20, 20, 0.0, 0.0, 10.0).unwrap();
        let eval = evaluator(200.0).with_slope(grid);

        // Coincident positions → zero variance → 100.
        let mut sol = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        eval.evaluate(&mut sol);
        assert!((sol.objectives.slope_variance - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_fitness_is_weighted_sum() {
        let eval = evaluator(200.0);
        let mut sol = solution(vec![building("a", 10.0, 10.0, 100.0, 100.0)]);
        let fitness = eval.evaluate(&mut sol);
        let expected = sol.objectives.weighted_total(eval.weights());
        assert!((fitness - expected).abs() < 1e-12);
        assert!((sol.fitness - fitness).abs() < 1e-12);
    }

    #[test]
    fn test_variance_helper() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[5.0]), 0.0);
        assert!((variance(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }
}
