//! Generational genetic algorithm with binary-coded continuous and
//! permutation (TSP) problem adapters.
//!
//! - [`ga`]: The generic engine. Exponentially scaled fitness-proportionate
//!   selection, elitist truncation, a best-solution record, and a
//!   stagnation stop.
//! - [`codec`]: Fixed-point sign-magnitude encoding of real vectors into
//!   bit strings.
//! - [`continuous`]: Minimization of `f: ℝⁿ → ℝ` over binary genomes with
//!   two-point crossover and bit-swap mutation.
//! - [`tsp`]: Tour optimization with segment-transfer crossover and
//!   distance-biased relocation mutation.
//! - [`random`]: Seeded RNG construction.
//!
//! Lower fitness is always better.
//!
//! # Example
//!
//! ```
//! use u_evolve::continuous::ContinuousProblem;
//! use u_evolve::ga::{GaConfig, GaRunner};
//!
//! let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
//! let problem = ContinuousProblem::new(2, sphere).unwrap();
//! let config = GaConfig::continuous()
//!     .with_population_size(40)
//!     .with_max_generations(60)
//!     .with_seed(7);
//!
//! let result = GaRunner::run(&problem, &config).unwrap();
//! assert!(result.best_fitness < 1.0);
//! ```

pub mod codec;
pub mod continuous;
pub mod ga;
pub mod random;
pub mod tsp;
