//! Genetic algorithm configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::operators::InitStrategy;

/// Configuration for the genetic placement optimizer.
///
/// Controls population size, operator rates, termination conditions, and
/// alternative selection.
///
/// # Defaults
///
/// ```
/// use site_layout::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.num_generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use site_layout::{GaConfig, InitStrategy};
///
/// let config = GaConfig::default()
///     .with_population_size(100)
///     .with_mutation_rate(0.4)
///     .with_initialization(InitStrategy::Heuristic)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Number of individuals in the population. At least 2.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub num_generations: usize,

    /// Probability of applying one mutation operator to an offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, a clone of the first parent is used.
    pub crossover_rate: f64,

    /// Optional wall-clock time limit in seconds.
    ///
    /// Checked only at generation boundaries: a generation's evaluation
    /// always runs to completion even if it overshoots the limit.
    /// `None` disables time-based termination.
    pub time_limit_seconds: Option<f64>,

    /// Number of consecutive stagnant generations before stopping.
    ///
    /// Set to 0 to disable convergence-based termination.
    pub convergence_patience: usize,

    /// Minimum fitness improvement that resets the stagnation counter.
    pub convergence_threshold: f64,

    /// Maximum number of alternative solutions returned next to the best.
    pub num_alternatives: usize,

    /// Tournament size for parent selection. Higher = stronger pressure.
    pub tournament_size: usize,

    /// Number of elite individuals carried forward unchanged.
    pub elite_count: usize,

    /// Population initialization strategy, chosen once per run.
    pub initialization: InitStrategy,

    /// Random seed for reproducibility. `None` draws a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            num_generations: 100,
            mutation_rate: 0.3,
            crossover_rate: 0.7,
            time_limit_seconds: None,
            convergence_patience: 15,
            convergence_threshold: 0.001,
            num_alternatives: 3,
            tournament_size: 3,
            elite_count: 1,
            initialization: InitStrategy::Random,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_num_generations(mut self, n: usize) -> Self {
        self.num_generations = n;
        self
    }

    /// Sets the mutation rate (clamped to [0, 1]).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate (clamped to [0, 1]).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the wall-clock time limit in seconds.
    pub fn with_time_limit_seconds(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    /// Sets the convergence patience (0 to disable).
    pub fn with_convergence_patience(mut self, generations: usize) -> Self {
        self.convergence_patience = generations;
        self
    }

    /// Sets the convergence threshold.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    /// Sets the number of alternative solutions to extract.
    pub fn with_num_alternatives(mut self, n: usize) -> Self {
        self.num_alternatives = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k.max(1);
        self
    }

    /// Sets the initialization strategy.
    pub fn with_initialization(mut self, strategy: InitStrategy) -> Self {
        self.initialization = strategy;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for fast optimization: small population, few generations.
    ///
    /// - Population: 20, Generations: 40, Time limit: 10 s
    /// - Patience: 8, Threshold: 0.01
    pub fn fast() -> Self {
        Self {
            population_size: 20,
            num_generations: 40,
            convergence_patience: 8,
            convergence_threshold: 0.01,
            time_limit_seconds: Some(10.0),
            ..Self::default()
        }
    }

    /// Preset for balanced optimization.
    ///
    /// - Population: 50, Generations: 100, Time limit: 60 s
    /// - Patience: 15, Threshold: 0.001
    pub fn balanced() -> Self {
        Self {
            time_limit_seconds: Some(60.0),
            ..Self::default()
        }
    }

    /// Preset for quality optimization: large population, many generations.
    ///
    /// - Population: 100, Generations: 300, Time limit: 300 s
    /// - Patience: 30, Threshold: 0.0005
    pub fn quality() -> Self {
        Self {
            population_size: 100,
            num_generations: 300,
            convergence_patience: 30,
            convergence_threshold: 0.0005,
            time_limit_seconds: Some(300.0),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidConfig`] with a description when any
    /// parameter is out of range.
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error::InvalidConfig;

        if self.population_size < 2 {
            return Err(InvalidConfig("population_size must be at least 2".into()));
        }
        if self.num_generations == 0 {
            return Err(InvalidConfig("num_generations must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(InvalidConfig(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(InvalidConfig(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if let Some(limit) = self.time_limit_seconds {
            if limit <= 0.0 {
                return Err(InvalidConfig(
                    "time_limit_seconds must be positive or None".into(),
                ));
            }
        }
        if self.convergence_threshold < 0.0 {
            return Err(InvalidConfig(
                "convergence_threshold must be non-negative".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(InvalidConfig("tournament_size must be at least 1".into()));
        }
        if self.elite_count >= self.population_size {
            return Err(InvalidConfig(
                "elite_count must leave room for offspring".into(),
            ));
        }
        if self.num_alternatives >= self.population_size {
            return Err(InvalidConfig(
                "num_alternatives must be smaller than the population".into(),
            ));
        }
        Ok(())
    }
}
