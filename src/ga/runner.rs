//! The placement optimization loop.
//!
//! [`GeneticOptimizer`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → crossover → mutation → repeat,
//! with elitism and three termination conditions (convergence, wall-clock
//! limit, generation budget). The final population is distilled into a best
//! layout plus mutually diverse alternatives, and the best layout gets one
//! spacing audit through the collision detector before being returned.

use std::time::Instant;

use geo::BoundingRect;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Map, Value};

use super::config::GaConfig;
use super::operators::{initialize_population, mutate, positional_crossover, PlacementArea};
use super::result::{OptimizationResult, Termination};
use super::selection::tournament;
use super::solution::PlacementSolution;
use crate::asset::Asset;
use crate::constraints::ConstraintSummary;
use crate::error::{Error, Result};
use crate::geometry::{bbox_diagonal, polygon_is_empty};
use crate::objectives::ObjectiveEvaluator;
use crate::random::create_rng;
use crate::spatial::CollisionDetector;

/// Diversity floor an alternative must clear against the best solution and
/// every previously chosen alternative.
const MIN_ALTERNATIVE_DIVERSITY: f64 = 0.1;

/// Runs the genetic placement search.
///
/// # Usage
///
/// ```no_run
/// use site_layout::{
///     Asset, AssetKind, GaConfig, GeneticOptimizer, ObjectiveEvaluator,
///     ObjectiveWeights, SiteConstraints,
/// };
/// use geo::{polygon, Polygon};
///
/// let boundary: Polygon = polygon![
///     (x: 0.0, y: 0.0), (x: 200.0, y: 0.0),
///     (x: 200.0, y: 200.0), (x: 0.0, y: 200.0),
/// ];
/// let constraints = SiteConstraints::new(boundary)?;
/// let evaluator = ObjectiveEvaluator::new(ObjectiveWeights::balanced(), constraints);
/// let mut optimizer = GeneticOptimizer::new(GaConfig::fast().with_seed(42), evaluator)?;
///
/// let assets = vec![Asset::new("b1", "Warehouse", AssetKind::Building, 30.0, 50.0)];
/// let result = optimizer.optimize(&assets)?;
/// println!("best fitness: {}", result.best_solution.fitness);
/// # Ok::<(), site_layout::Error>(())
/// ```
pub struct GeneticOptimizer {
    config: GaConfig,
    evaluator: ObjectiveEvaluator,
    detector: CollisionDetector,
    rng: StdRng,
    seed: u64,
}

impl GeneticOptimizer {
    /// Creates an optimizer with a validated configuration.
    ///
    /// Without an explicit seed, one is drawn from the OS and recorded in
    /// the result metadata so any run can be replayed.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] when the configuration is invalid.
    pub fn new(config: GaConfig, evaluator: ObjectiveEvaluator) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            evaluator,
            detector: CollisionDetector::new(),
            rng: create_rng(seed),
            seed,
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the full evolutionary search over the given asset templates.
    ///
    /// Template positions are ignored; every individual receives fresh
    /// placements from the configured initialization strategy.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] when `assets` is empty.
    pub fn optimize(&mut self, assets: &[Asset]) -> Result<OptimizationResult> {
        if assets.is_empty() {
            return Err(Error::InvalidConfig(
                "cannot optimize an empty asset list".into(),
            ));
        }

        let start = Instant::now();
        let area = self.placement_area();
        let diversity_normalizer = bbox_diagonal(&self.evaluator.constraints().site_boundary);

        let mut population = initialize_population(
            assets,
            area,
            self.config.initialization,
            self.config.population_size,
            &mut self.rng,
        );
        self.evaluate_population(&mut population);
        sort_by_fitness_desc(&mut population);

        let mut best = population[0].clone();
        let mut history = Vec::with_capacity(self.config.num_generations + 1);
        history.push(best.fitness);

        let mut metadata = Map::new();
        metadata.insert("seed".into(), json!(self.seed));
        metadata.insert(
            "constraints".into(),
            serde_json::to_value(ConstraintSummary::from(self.evaluator.constraints()))
                .unwrap_or(Value::Null),
        );

        let mut stagnation = 0usize;
        let mut generations_run = 0usize;
        let mut termination = Termination::MaxGenerationsReached;

        for gen in 0..self.config.num_generations {
            // Wall-clock is only inspected at generation boundaries, so a
            // started generation always runs to completion.
            if let Some(limit) = self.config.time_limit_seconds {
                if start.elapsed().as_secs_f64() >= limit {
                    termination = Termination::TimeLimited;
                    metadata.insert("time_limited".into(), json!(true));
                    break;
                }
            }

            let mut next = Vec::with_capacity(self.config.population_size);
            next.extend_from_slice(&population[..self.config.elite_count]);

            while next.len() < self.config.population_size {
                let p1 = tournament(&population, self.config.tournament_size, &mut self.rng);
                let p2 = tournament(&population, self.config.tournament_size, &mut self.rng);

                let mut child = if self.rng.random_range(0.0..1.0) < self.config.crossover_rate {
                    positional_crossover(&population[p1], &population[p2], &mut self.rng)
                } else {
                    population[p1].clone()
                };
                if self.rng.random_range(0.0..1.0) < self.config.mutation_rate {
                    mutate(&mut child, area, &mut self.rng);
                }
                next.push(child);
            }

            self.evaluate_population(&mut next);
            sort_by_fitness_desc(&mut next);
            population = next;
            generations_run = gen + 1;

            let improvement = population[0].fitness - best.fitness;
            if improvement > 0.0 {
                best = population[0].clone();
            }
            if improvement > self.config.convergence_threshold {
                stagnation = 0;
            } else {
                stagnation += 1;
            }
            history.push(best.fitness);

            log::debug!(
                "generation {generations_run}: best fitness {:.3}, stagnation {stagnation}",
                best.fitness
            );

            if self.config.convergence_patience > 0
                && stagnation >= self.config.convergence_patience
            {
                termination = Termination::Converged;
                break;
            }
        }

        let alternatives =
            self.select_alternatives(&best, &population, diversity_normalizer);
        self.audit_spacing(&best, &mut metadata);

        let elapsed = start.elapsed().as_secs_f64();
        log::info!(
            "optimization finished: {generations_run} generations in {elapsed:.2} s, \
             best fitness {:.3}, {} alternatives, termination {termination:?}",
            best.fitness,
            alternatives.len()
        );

        Ok(OptimizationResult {
            best_solution: best,
            alternative_solutions: alternatives,
            generations_run,
            time_elapsed_seconds: elapsed,
            convergence_history: history,
            termination,
            metadata,
        })
    }

    /// The extent assets may be placed in: the buildable area's bounding
    /// box, falling back to the site boundary's when the buildable area is
    /// empty (initial layouts then heal through the penalty gradient).
    fn placement_area(&self) -> PlacementArea {
        let constraints = self.evaluator.constraints();
        let buildable = constraints.buildable_area();
        let source = if polygon_is_empty(&buildable) {
            log::warn!("buildable area is empty; initializing over the full site extent");
            &constraints.site_boundary
        } else {
            &buildable
        };
        match source.bounding_rect() {
            Some(rect) => {
                PlacementArea::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
            }
            None => PlacementArea::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    fn evaluate_population(&self, population: &mut [PlacementSolution]) {
        for solution in population.iter_mut().filter(|s| !s.evaluated) {
            self.evaluator.evaluate(solution);
        }
    }

    /// Greedy max-min selection of runner-up layouts.
    ///
    /// Walks the final population in fitness order and keeps candidates
    /// whose diversity to the best solution and to every already kept
    /// alternative clears [`MIN_ALTERNATIVE_DIVERSITY`]. When a pass finds
    /// no qualifying candidate, the most diverse remaining one is taken
    /// instead, so near-converged populations still yield alternatives.
    fn select_alternatives(
        &self,
        best: &PlacementSolution,
        population: &[PlacementSolution],
        normalizer: f64,
    ) -> Vec<PlacementSolution> {
        let mut chosen: Vec<PlacementSolution> = Vec::new();
        let mut remaining: Vec<&PlacementSolution> = population.iter().collect();

        while chosen.len() < self.config.num_alternatives && !remaining.is_empty() {
            let min_diversity = |candidate: &PlacementSolution| -> f64 {
                let to_best = candidate.diversity(best, normalizer);
                chosen
                    .iter()
                    .map(|alt| candidate.diversity(alt, normalizer))
                    .fold(to_best, f64::min)
            };

            let qualifying = remaining
                .iter()
                .position(|c| min_diversity(c) >= MIN_ALTERNATIVE_DIVERSITY);
            let pick = match qualifying {
                Some(idx) => idx,
                None => {
                    let (idx, score) = remaining
                        .iter()
                        .enumerate()
                        .map(|(i, c)| (i, min_diversity(c)))
                        .fold((0, f64::NEG_INFINITY), |acc, cur| {
                            if cur.1 > acc.1 {
                                cur
                            } else {
                                acc
                            }
                        });
                    if score <= 0.0 {
                        break;
                    }
                    idx
                }
            };
            chosen.push(remaining.remove(pick).clone());
        }
        chosen
    }

    /// Cross-checks the winning layout's pairwise spacing through the
    /// collision detector and records the outcome in the run metadata.
    fn audit_spacing(&mut self, best: &PlacementSolution, metadata: &mut Map<String, Value>) {
        self.detector.clear();
        for asset in &best.assets {
            self.detector.add_asset(asset.clone());
        }
        let violations = self.detector.check_minimum_spacing_violations();
        if !violations.is_empty() {
            log::warn!(
                "best layout failed the spacing audit with {} violation(s)",
                violations.len()
            );
        }
        metadata.insert(
            "spacing_audit_violations".into(),
            serde_json::to_value(&violations).unwrap_or(Value::Null),
        );
    }
}

fn sort_by_fitness_desc(population: &mut [PlacementSolution]) {
    population.sort_by(|a, b| {
        b.fitness
            .partial_cmp(&a.fitness)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ============================================================================
// Tests
// ============================================================================
