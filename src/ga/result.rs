//! Optimization run outcomes and JSON reporting.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::solution::PlacementSolution;
use crate::asset::AssetKind;
use crate::objectives::ObjectiveScores;

/// Why the optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Best fitness stagnated for the configured patience.
    Converged,
    /// The wall-clock limit elapsed at a generation boundary.
    TimeLimited,
    /// The configured generation count was exhausted.
    MaxGenerationsReached,
}

/// Result of a placement optimization run.
///
/// Carries the best layout, a set of mutually diverse alternatives, and
/// per-run statistics. Serializes to JSON for downstream consumers.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// The fittest layout found during the entire run.
    pub best_solution: PlacementSolution,
    /// Runner-up layouts, each meaningfully different from the best and
    /// from each other. Sorted by fitness descending. May be empty.
    pub alternative_solutions: Vec<PlacementSolution>,
    /// Number of generations actually executed.
    pub generations_run: usize,
    /// Wall-clock duration of the run in seconds.
    pub time_elapsed_seconds: f64,
    /// Best fitness after each generation, starting with the initial
    /// population's best (index 0).
    pub convergence_history: Vec<f64>,
    /// Why the run stopped.
    pub termination: Termination,
    /// Run annotations (spacing audit, time-limit flag).
    pub metadata: Map<String, Value>,
}

impl OptimizationResult {
    /// Flattens the best solution into a report for external consumers.
    pub fn report(&self) -> SolutionReport {
        SolutionReport::from_solution(&self.best_solution)
    }

    /// Serializes the whole result to pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A flattened, consumer-facing view of one layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionReport {
    pub fitness: f64,
    pub objectives: ObjectiveScores,
    pub constraint_violations: usize,
    pub is_valid: bool,
    pub assets: Vec<AssetPlacementReport>,
}

impl SolutionReport {
    pub fn from_solution(solution: &PlacementSolution) -> Self {
        Self {
            fitness: solution.fitness,
            objectives: solution.objectives,
            constraint_violations: solution.constraint_violations,
            is_valid: solution.is_valid,
            assets: solution
                .assets
                .iter()
                .map(|a| AssetPlacementReport {
                    id: a.id.clone(),
                    name: a.name.clone(),
                    kind: a.kind,
                    x: a.x,
                    y: a.y,
                    rotation_deg: a.rotation_deg,
                    area_m2: a.area(),
                })
                .collect(),
        }
    }
}

/// Final placement of a single asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPlacementReport {
    pub id: String,
    pub name: String,
    pub kind: AssetKind,
    pub x: f64,
    pub y: f64,
    pub rotation_deg: f64,
    pub area_m2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;

    fn sample_result() -> OptimizationResult {
        let mut best = PlacementSolution::new(vec![Asset::new(
            "b1",
            "Warehouse",
            AssetKind::Building,
            30.0,
            50.0,
        )
        .at(60.0, 80.0)
        .with_rotation(90.0)]);
        best.fitness = 72.5;
        best.is_valid = true;
        best.evaluated = true;

        OptimizationResult {
            best_solution: best,
            alternative_solutions: vec![],
            generations_run: 12,
            time_elapsed_seconds: 0.8,
            convergence_history: vec![40.0, 55.0, 72.5],
            termination: Termination::Converged,
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_report_flattens_best_solution() {
        let report = sample_result().report();
        assert_eq!(report.fitness, 72.5);
        assert!(report.is_valid);
        assert_eq!(report.assets.len(), 1);
        let asset = &report.assets[0];
        assert_eq!(asset.id, "b1");
        assert_eq!(asset.rotation_deg, 90.0);
        assert!((asset.area_m2 - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_shape() {
        let json: Value =
            serde_json::from_str(&sample_result().to_json().unwrap()).unwrap();
        assert_eq!(json["termination"], "converged");
        assert_eq!(json["generations_run"], 12);
        assert_eq!(json["convergence_history"][0], 40.0);
        assert_eq!(json["best_solution"]["assets"][0]["kind"], "building");
    }

    #[test]
    fn test_termination_serde_names() {
        assert_eq!(
            serde_json::to_value(Termination::TimeLimited).unwrap(),
            "time_limited"
        );
        assert_eq!(
            serde_json::to_value(Termination::MaxGenerationsReached).unwrap(),
            "max_generations_reached"
        );
    }
}
