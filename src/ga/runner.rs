//! GA evolutionary loop execution.
//!
//! [`GaRunner`] drives a [`GaEngine`] from initialization to a stop
//! condition: iteration limit, stagnation, or external cancellation.

use super::config::{ConfigError, GaConfig};
use super::engine::{GaEngine, GaResult};
use super::types::GaProblem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Executes the GA evolutionary loop.
///
/// # Usage
///
/// ```
/// use u_evolve::ga::{GaConfig, GaRunner};
/// use u_evolve::tsp::{Point, TspProblem};
///
/// let cities = vec![
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(1.0, 1.0),
///     Point::new(1.0, 0.0),
/// ];
/// let problem = TspProblem::new(cities).unwrap();
/// let config = GaConfig::permutation()
///     .with_population_size(20)
///     .with_max_generations(30)
///     .with_seed(42);
/// let result = GaRunner::run(&problem, &config).unwrap();
/// assert!((result.best_fitness - 4.0).abs() < 1e-9);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA optimization.
    ///
    /// Fails fast if the configuration is invalid.
    pub fn run<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops at
    /// the next generation boundary and returns the best solution found so
    /// far.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult<P::Individual>, ConfigError> {
        let mut engine = GaEngine::new(problem, config.clone())?;

        while !engine.is_stopped() {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    engine.cancel();
                    break;
                }
            }
            engine.step();
        }

        Ok(engine.into_result())
    }
}

// ============================================================================
// Tests
// ============================================================================
