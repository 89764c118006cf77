//! Generational Genetic Algorithm.
//!
//! A generic GA built on trait-based abstractions. Problems plug in by
//! implementing [`GaProblem`], which specifies how to create, evaluate,
//! recombine, and mutate individuals. The engine supplies everything else:
//! exponentially scaled fitness-proportionate parent selection, offspring
//! generation, elitist (μ + λ) truncation, the best-solution record, and
//! stagnation-based termination.
//!
//! # Core Traits
//!
//! - [`Individual`]: A candidate solution with associated fitness type
//! - [`GaProblem`]: Problem definition: initialization, evaluation, operators
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters, with `continuous()` and
//!   `permutation()` presets
//! - [`GaEngine`]: Stepwise controller (one generation per [`GaEngine::step`])
//! - [`GaRunner`]: Runs an engine to completion
//! - [`GaResult`]: Final optimization result with statistics
//!
//! # Submodules
//!
//! - [`operators`]: Bit-string and permutation crossover/mutation operators
//! - [`evaluation`]: Population evaluation and fitness statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod engine;
pub mod evaluation;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::{
    ConfigError, GaConfig, CONTINUOUS_SELECTION_SCALE, CONTINUOUS_STAGNATION_LIMIT,
    PERMUTATION_SELECTION_SCALE, PERMUTATION_STAGNATION_LIMIT,
};
pub use engine::{BestSolution, EngineState, GaEngine, GaResult, GenerationStats, StopReason};
pub use runner::GaRunner;
pub use selection::{draw_pool, ExponentialSelection};
pub use types::{Fitness, GaProblem, Individual};
