//! Stepwise generational controller.
//!
//! [`GaEngine`] owns the population, the counters, the random source, and
//! the best-solution record. Each call to [`GaEngine::step`] performs one
//! generation:
//!
//! ```text
//! select pools → crossover → mutate → evaluate offspring
//!     → parents ∪ offspring → stable sort by fitness → truncate
//!     → update best record → update stagnation counter
//! ```
//!
//! The population is replaced wholesale every generation. Survivor
//! selection is strict elitist truncation, so the best individual of the
//! combined pool always survives.

use super::config::{ConfigError, GaConfig};
use super::evaluation::{best_index, compare_fitness, evaluate_population, mean_fitness};
use super::selection::ExponentialSelection;
use super::types::{Fitness, GaProblem, Individual};
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The generation counter reached `max_generations`.
    IterationLimit,
    /// The population mean was unchanged for `stagnation_limit` generations.
    Stagnation,
    /// Stopped by the caller.
    Cancelled,
}

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineState {
    /// Population created and evaluated; no generation run yet.
    Initialized,
    /// At least one generation completed, no stop condition met.
    Running,
    /// Terminal state.
    Stopped(StopReason),
}

/// Snapshot of the best solution seen so far.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestSolution<I: Individual> {
    individual: I,
    generation: usize,
}

impl<I: Individual> BestSolution<I> {
    /// The best individual.
    pub fn individual(&self) -> &I {
        &self.individual
    }

    /// Its fitness.
    pub fn fitness(&self) -> I::Fitness {
        self.individual.fitness()
    }

    /// Generation in which it was found (0 = initial population).
    pub fn generation(&self) -> usize {
        self.generation
    }
}

/// Per-generation statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation index (1-based: the first step reports 1).
    pub generation: usize,
    /// Best fitness recorded so far.
    pub best_fitness: f64,
    /// Best fitness in the survivor population.
    pub population_best: f64,
    /// Mean fitness of the survivor population.
    pub mean_fitness: f64,
    /// Best fitness among this generation's offspring.
    pub offspring_best: f64,
    /// Consecutive generations with an unchanged mean.
    pub stagnation: usize,
}

/// Generational GA controller.
///
/// # Usage
///
/// ```
/// use u_evolve::continuous::ContinuousProblem;
/// use u_evolve::ga::{GaConfig, GaEngine};
///
/// let problem = ContinuousProblem::new(2, |p: &[f64]| p[0] * p[0] + p[1] * p[1]).unwrap();
/// let config = GaConfig::continuous().with_population_size(10).with_max_generations(5).with_seed(1);
/// let mut engine = GaEngine::new(&problem, config).unwrap();
/// while let Some(stats) = engine.step() {
///     assert_eq!(engine.population().len(), 10);
///     assert!(stats.best_fitness <= stats.population_best);
/// }
/// assert!(engine.is_stopped());
/// ```
pub struct GaEngine<'a, P: GaProblem> {
    problem: &'a P,
    config: GaConfig,
    selection: ExponentialSelection,
    rng: StdRng,
    population: Vec<P::Individual>,
    best: BestSolution<P::Individual>,
    generation: usize,
    stagnation: usize,
    last_mean: f64,
    initial_best: f64,
    state: EngineState,
    history: Vec<GenerationStats>,
}

impl<'a, P: GaProblem> GaEngine<'a, P> {
    /// Validates the configuration, then creates and evaluates the initial
    /// population.
    pub fn new(problem: &'a P, config: GaConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();
        evaluate_population(problem, &mut population, config.parallel);

        let best_idx = best_index(&population).expect("population must not be empty");
        let best = BestSolution {
            individual: population[best_idx].clone(),
            generation: 0,
        };
        let last_mean = mean_fitness(&population);
        let initial_best = best.fitness().to_f64();

        Ok(Self {
            problem,
            selection: ExponentialSelection::new(config.selection_scale),
            history: Vec::new(),
            config,
            rng,
            population,
            best,
            generation: 0,
            stagnation: 0,
            last_mean,
            initial_best,
            state: EngineState::Initialized,
        })
    }

    /// Runs one generation.
    ///
    /// Returns `None` without doing anything once the engine has stopped.
    pub fn step(&mut self) -> Option<GenerationStats> {
        if self.is_stopped() {
            return None;
        }

        if self.config.log_interval > 0 && self.generation % self.config.log_interval == 0 {
            log::info!(
                "generation {}: best = {:.4}, mean = {:.4}",
                self.generation,
                self.best.fitness().to_f64(),
                self.last_mean
            );
        }

        let n = self.config.population_size;

        // Parent pools from the current population
        let (pool_a, pool_b) = self.selection.select_pools(&self.population, &mut self.rng);

        // Recombination and mutation
        let mut offspring: Vec<P::Individual> = Vec::with_capacity(2 * n);
        for (&a, &b) in pool_a.iter().zip(pool_b.iter()) {
            let children =
                self.problem
                    .crossover(&self.population[a], &self.population[b], &mut self.rng);
            for mut child in children {
                if self.rng.random_range(0.0..1.0) < self.config.mutation_rate {
                    self.problem.mutate(&mut child, &mut self.rng);
                }
                offspring.push(child);
            }
        }

        evaluate_population(self.problem, &mut offspring, self.config.parallel);
        let offspring_best = offspring
            .iter()
            .map(|ind| ind.fitness().to_f64())
            .fold(f64::INFINITY, f64::min);

        // Survivor selection: parents ∪ offspring, stable sort, truncate
        let mut next = std::mem::take(&mut self.population);
        next.extend(offspring);
        next.sort_by(|a, b| compare_fitness(a.fitness(), b.fitness()));
        next.truncate(n);
        self.population = next;

        self.generation += 1;

        // Best record only moves on strict improvement
        let leader = &self.population[0];
        if compare_fitness(leader.fitness(), self.best.fitness()).is_lt() {
            log::debug!(
                "generation {}: new best {:.6} (was {:.6})",
                self.generation,
                leader.fitness().to_f64(),
                self.best.fitness().to_f64()
            );
            self.best = BestSolution {
                individual: leader.clone(),
                generation: self.generation,
            };
        }

        let mean = mean_fitness(&self.population);
        if mean.to_bits() == self.last_mean.to_bits() {
            self.stagnation += 1;
        } else {
            self.stagnation = 0;
        }
        self.last_mean = mean;

        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: self.best.fitness().to_f64(),
            population_best: self.population[0].fitness().to_f64(),
            mean_fitness: mean,
            offspring_best,
            stagnation: self.stagnation,
        };
        self.history.push(stats);
        self.problem.on_generation(&stats);

        self.state = if self.config.stagnation_limit > 0
            && self.stagnation >= self.config.stagnation_limit
        {
            EngineState::Stopped(StopReason::Stagnation)
        } else if self.generation >= self.config.max_generations {
            EngineState::Stopped(StopReason::IterationLimit)
        } else {
            EngineState::Running
        };

        if let EngineState::Stopped(reason) = self.state {
            log::info!(
                "stopped after {} generations ({:?}): best = {:.4} found in generation {}",
                self.generation,
                reason,
                self.best.fitness().to_f64(),
                self.best.generation
            );
        }

        Some(stats)
    }

    /// Runs generations until a stop condition is met.
    pub fn run_to_end(&mut self) {
        while self.step().is_some() {}
    }

    /// Stops the engine. Has no effect if it already stopped.
    pub fn cancel(&mut self) {
        if !self.is_stopped() {
            log::info!("cancelled after {} generations", self.generation);
            self.state = EngineState::Stopped(StopReason::Cancelled);
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether a stop condition has been reached.
    pub fn is_stopped(&self) -> bool {
        matches!(self.state, EngineState::Stopped(_))
    }

    /// The current population, sorted best first after the first step.
    pub fn population(&self) -> &[P::Individual] {
        &self.population
    }

    /// The best-solution record.
    pub fn best(&self) -> &BestSolution<P::Individual> {
        &self.best
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Consecutive generations with an unchanged population mean.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    /// Mean fitness of the current population.
    pub fn mean_fitness(&self) -> f64 {
        self.last_mean
    }

    /// Statistics of every completed generation.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// The configuration the engine runs with.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Consumes the engine and returns the result.
    pub fn into_result(self) -> GaResult<P::Individual> {
        let stop_reason = match self.state {
            EngineState::Stopped(reason) => Some(reason),
            _ => None,
        };
        let mut fitness_history = Vec::with_capacity(self.history.len() + 1);
        fitness_history.push(self.initial_best);
        fitness_history.extend(self.history.iter().map(|s| s.best_fitness));

        GaResult {
            best_fitness: self.best.fitness(),
            found_in_generation: self.best.generation,
            best: self.best.individual,
            generations: self.generation,
            stop_reason,
            fitness_history,
            history: self.history,
        }
    }
}

/// Result of a GA optimization run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// The best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Generation in which `best` was found (0 = initial population).
    pub found_in_generation: usize,

    /// Total number of generations executed.
    pub generations: usize,

    /// Why the run stopped; `None` if the engine was consumed mid-run.
    pub stop_reason: Option<StopReason>,

    /// Best fitness so far: the initial value, then one entry per generation.
    pub fitness_history: Vec<f64>,

    /// Full per-generation statistics.
    pub history: Vec<GenerationStats>,
}

impl<I: Individual> GaResult<I> {
    /// Whether the run was terminated due to stagnation.
    pub fn stagnated(&self) -> bool {
        self.stop_reason == Some(StopReason::Stagnation)
    }

    /// Whether the run was cancelled externally.
    pub fn cancelled(&self) -> bool {
        self.stop_reason == Some(StopReason::Cancelled)
    }
}
