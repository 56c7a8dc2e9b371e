//! Placement solutions: the GA's individuals.
//!
//! A [`PlacementSolution`] is a complete candidate layout: one positioned
//! copy of every input asset, plus the fitness and scoring data recorded by
//! the evaluator. Solutions have plain value semantics: crossover and
//! mutation always operate on clones, so parents are never modified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::Asset;
use crate::objectives::ObjectiveScores;

/// One candidate layout in the population.
///
/// The asset count and identity set are fixed across a run; only positions
/// and rotations evolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementSolution {
    /// The positioned assets of this layout.
    pub assets: Vec<Asset>,
    /// Weighted fitness, or the violation penalty. Higher is better.
    pub fitness: f64,
    /// Per-objective scores. All zero on the penalty path.
    pub objectives: ObjectiveScores,
    /// Number of constraint violations counted by the evaluator.
    pub constraint_violations: usize,
    /// Whether the layout is free of constraint violations.
    pub is_valid: bool,
    /// Free-form annotations carried into reports.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Whether the evaluator has scored this exact layout.
    #[serde(skip)]
    pub evaluated: bool,
}

impl PlacementSolution {
    /// Wraps a set of positioned assets as an unevaluated solution.
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            fitness: f64::NEG_INFINITY,
            objectives: ObjectiveScores::default(),
            constraint_violations: 0,
            is_valid: false,
            metadata: Map::new(),
            evaluated: false,
        }
    }

    /// Looks up an asset by id.
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Marks the layout as changed so the evaluator rescores it.
    pub fn invalidate(&mut self) {
        self.evaluated = false;
        self.fitness = f64::NEG_INFINITY;
    }

    /// Normalized positional dissimilarity to another solution, in [0, 1].
    ///
    /// The mean distance between same-id assets' positions, divided by
    /// `normalizer` (the site bounding-box diagonal). Used both for
    /// stagnation detection and for picking varied alternatives. Zero when
    /// the solutions share no asset ids or the normalizer is degenerate.
    pub fn diversity(&self, other: &PlacementSolution, normalizer: f64) -> f64 {
        if normalizer <= f64::EPSILON {
            return 0.0;
        }
        let mut total = 0.0;
        let mut matched = 0usize;
        for asset in &self.assets {
            if let Some(twin) = other.asset(&asset.id) {
                total += ((asset.x - twin.x).powi(2) + (asset.y - twin.y).powi(2)).sqrt();
                matched += 1;
            }
        }
        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64 / normalizer).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;

    fn asset(id: &str, x: f64, y: f64) -> Asset {
        Asset::new(id, id.to_uppercase(), AssetKind::Building, 10.0, 10.0).at(x, y)
    }

    #[test]
    fn test_new_solution_is_unevaluated() {
        let sol = PlacementSolution::new(vec![asset("a", 0.0, 0.0)]);
        assert!(!sol.evaluated);
        assert_eq!(sol.fitness, f64::NEG_INFINITY);
        assert!(!sol.is_valid);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = PlacementSolution::new(vec![asset("a", 10.0, 10.0)]);
        let mut copy = original.clone();
        copy.assets[0].set_position(99.0, 99.0);
        assert_eq!(original.assets[0].position(), (10.0, 10.0));
    }

    #[test]
    fn test_diversity_identical_is_zero() {
        let a = PlacementSolution::new(vec![asset("a", 10.0, 10.0), asset("b", 50.0, 50.0)]);
        let b = a.clone();
        assert_eq!(a.diversity(&b, 100.0), 0.0);
    }

    #[test]
    fn test_diversity_is_symmetric_and_normalized() {
        let a = PlacementSolution::new(vec![asset("a", 0.0, 0.0), asset("b", 0.0, 0.0)]);
        let b = PlacementSolution::new(vec![asset("a", 30.0, 40.0), asset("b", 0.0, 0.0)]);

        // Mean displacement = (50 + 0) / 2 = 25; normalizer 100 → 0.25.
        let d = a.diversity(&b, 100.0);
        assert!((d - 0.25).abs() < 1e-12);
        assert!((b.diversity(&a, 100.0) - d).abs() < 1e-12);
    }

    #[test]
    fn test_diversity_clamped_to_one() {
        let a = PlacementSolution::new(vec![asset("a", 0.0, 0.0)]);
        let b = PlacementSolution::new(vec![asset("a", 1e6, 1e6)]);
        assert_eq!(a.diversity(&b, 100.0), 1.0);
    }

    #[test]
    fn test_diversity_degenerate_normalizer() {
        let a = PlacementSolution::new(vec![asset("a", 0.0, 0.0)]);
        let b = PlacementSolution::new(vec![asset("a", 10.0, 0.0)]);
        assert_eq!(a.diversity(&b, 0.0), 0.0);
    }

    #[test]
    fn test_serializes_to_json() {
        let sol = PlacementSolution::new(vec![asset("a", 5.0, 6.0)]);
        let json = serde_json::to_value(&sol).unwrap();
        assert_eq!(json["assets"][0]["id"], "a");
        assert_eq!(json["constraint_violations"], 0);
    }
}
