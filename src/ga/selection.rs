//! Parent selection for the placement GA.
//!
//! Tournament selection only: draw `k` individuals with replacement and
//! keep the fittest. Fitness here is **maximized** (the violation penalty
//! makes invalid layouts deeply negative), so ties between selection
//! pressure and diversity are tuned through the tournament size alone.

use rand::Rng;

use super::solution::PlacementSolution;

/// Tournament selection: pick `k` random individuals, return the index of
/// the fittest.
///
/// Higher `k` = stronger selection pressure.
/// - k=2: light pressure (good for diversity)
/// - k=3-5: moderate pressure (typical default)
/// - k>5: strong pressure (risk of premature convergence)
///
/// # Panics
/// Panics if `population` is empty.
pub fn tournament<R: Rng>(population: &[PlacementSolution], k: usize, rng: &mut R) -> usize {
    assert!(
        !population.is_empty(),
        "cannot select from empty population"
    );
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness > population[best_idx].fitness {
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, AssetKind};
    use crate::random::create_rng;

    fn make_population(fitnesses: &[f64]) -> Vec<PlacementSolution> {
        fitnesses
            .iter()
            .map(|&f| {
                let mut sol = PlacementSolution::new(vec![Asset::new(
                    "a",
                    "A",
                    AssetKind::Building,
                    10.0,
                    10.0,
                )]);
                sol.fitness = f;
                sol
            })
            .collect()
    }

    #[test]
    fn test_tournament_favors_fittest() {
        let pop = make_population(&[10.0, 50.0, 90.0, 20.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            counts[tournament(&pop, 4, &mut rng)] += 1;
        }
        // Index 2 (fitness 90) should dominate.
        assert!(
            counts[2] > 6000,
            "expected fittest to win >60% of tournaments, got {}/{n}",
            counts[2]
        );
    }

    #[test]
    fn test_tournament_size_1_is_uniform() {
        let pop = make_population(&[10.0, 50.0, 90.0, 20.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[tournament(&pop, 1, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform selection, got {counts:?}");
        }
    }

    #[test]
    fn test_penalized_solutions_lose() {
        // Invalid layouts carry large negative penalties and should almost
        // never beat a valid one in a tournament.
        let pop = make_population(&[-10_000.0, -31_623.0, 75.0]);
        let mut rng = create_rng(7);

        let mut counts = [0u32; 3];
        for _ in 0..10000 {
            counts[tournament(&pop, 3, &mut rng)] += 1;
        }
        assert!(counts[2] > counts[0] + counts[1]);
    }

    #[test]
    fn test_single_individual() {
        let pop = make_population(&[5.0]);
        let mut rng = create_rng(42);
        assert_eq!(tournament(&pop, 3, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let pop: Vec<PlacementSolution> = vec![];
        let mut rng = create_rng(42);
        tournament(&pop, 3, &mut rng);
    }
}
