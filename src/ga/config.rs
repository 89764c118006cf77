//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.

/// Default stagnation limit for binary-coded continuous problems.
pub const CONTINUOUS_STAGNATION_LIMIT: usize = 200;

/// Default stagnation limit for permutation problems.
pub const PERMUTATION_STAGNATION_LIMIT: usize = 100;

/// Default selection scale for binary-coded continuous problems.
pub const CONTINUOUS_SELECTION_SCALE: f64 = -1e-15;

/// Default selection scale for permutation problems.
pub const PERMUTATION_SELECTION_SCALE: f64 = -1e-6;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Population size must be at least 1")]
    PopulationTooSmall,
    #[error("Maximum generations must be at least 1")]
    NoGenerations,
    #[error("Mutation rate must lie in [0, 1], got {0}")]
    InvalidMutationRate(f64),
    #[error("Selection scale must be finite and non-positive, got {0}")]
    InvalidSelectionScale(f64),
}

/// Configuration for the generational GA.
///
/// # Defaults
///
/// ```
/// use u_evolve::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.stagnation_limit, 200);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::ga::GaConfig;
///
/// let config = GaConfig::permutation()
///     .with_population_size(50)
///     .with_max_generations(300)
///     .with_mutation_rate(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals kept after each truncation.
    pub population_size: usize,

    /// Iteration limit: the run stops after this many generations.
    pub max_generations: usize,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Exponent factor of the selection weights `exp(scale * fitness)`.
    ///
    /// Must be non-positive so that lower fitness gets larger weight.
    /// `0.0` gives uniform parent selection.
    pub selection_scale: f64,

    /// Number of consecutive generations with an unchanged population mean
    /// before stopping.
    ///
    /// Set to 0 to disable stagnation-based termination.
    pub stagnation_limit: usize,

    /// Emit a progress log line every this many generations (0 disables).
    pub log_interval: usize,

    /// Whether to evaluate offspring in parallel.
    ///
    /// Only effective with the `parallel` cargo feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self::continuous()
    }
}

impl GaConfig {
    /// Preset for binary-coded continuous optimization.
    ///
    /// - Population: 100, Generations: 500, Mutation rate: 0.25
    /// - Selection scale: -1e-15, Stagnation limit: 200, Log every 20
    pub fn continuous() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            mutation_rate: 0.25,
            selection_scale: CONTINUOUS_SELECTION_SCALE,
            stagnation_limit: CONTINUOUS_STAGNATION_LIMIT,
            log_interval: 20,
            parallel: false,
            seed: None,
        }
    }

    /// Preset for permutation (TSP) optimization.
    ///
    /// - Population: 100, Generations: 500, Mutation rate: 0.25
    /// - Selection scale: -1e-6, Stagnation limit: 100, Log every 50
    pub fn permutation() -> Self {
        Self {
            selection_scale: PERMUTATION_SELECTION_SCALE,
            stagnation_limit: PERMUTATION_STAGNATION_LIMIT,
            log_interval: 50,
            ..Self::continuous()
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the mutation rate.
    ///
    /// Values outside `[0, 1]` are kept as given and rejected by
    /// [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the selection scale.
    pub fn with_selection_scale(mut self, scale: f64) -> Self {
        self.selection_scale = scale;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the progress log interval (0 to disable).
    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationTooSmall);
        }
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !self.selection_scale.is_finite() || self.selection_scale > 0.0 {
            return Err(ConfigError::InvalidSelectionScale(self.selection_scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_continuous() {
        let config = GaConfig::default();
        assert_eq!(config, GaConfig::continuous());
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 500);
        assert!((config.mutation_rate - 0.25).abs() < 1e-12);
        assert_eq!(config.selection_scale, -1e-15);
        assert_eq!(config.stagnation_limit, 200);
        assert_eq!(config.log_interval, 20);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_permutation_preset() {
        let config = GaConfig::permutation();
        assert_eq!(config.selection_scale, -1e-6);
        assert_eq!(config.stagnation_limit, 100);
        assert_eq!(config.log_interval, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(25)
            .with_mutation_rate(0.5)
            .with_selection_scale(-0.1)
            .with_stagnation_limit(0)
            .with_log_interval(5)
            .with_parallel(true)
            .with_seed(42);

        assert_eq!(config.population_size, 20);
        assert_eq!(config.max_generations, 25);
        assert!((config.mutation_rate - 0.5).abs() < 1e-12);
        assert_eq!(config.selection_scale, -0.1);
        assert_eq!(config.stagnation_limit, 0);
        assert_eq!(config.log_interval, 5);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_out_of_range_mutation_rate_rejected() {
        let config = GaConfig::default().with_mutation_rate(2.0);
        assert_eq!(config.mutation_rate, 2.0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMutationRate(2.0)));
        assert_eq!(
            GaConfig::default().with_mutation_rate(-0.1).validate(),
            Err(ConfigError::InvalidMutationRate(-0.1))
        );
        assert!(GaConfig::default().with_mutation_rate(0.0).validate().is_ok());
        assert!(GaConfig::default().with_mutation_rate(1.0).validate().is_ok());
    }

    #[test]
    fn test_validate_population() {
        let config = GaConfig::default().with_population_size(0);
        assert_eq!(config.validate(), Err(ConfigError::PopulationTooSmall));
        assert!(GaConfig::default().with_population_size(1).validate().is_ok());
    }

    #[test]
    fn test_validate_generations() {
        let config = GaConfig::default().with_max_generations(0);
        assert_eq!(config.validate(), Err(ConfigError::NoGenerations));
    }

    #[test]
    fn test_validate_mutation_rate_set_directly() {
        let config = GaConfig {
            mutation_rate: f64::NAN,
            ..GaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMutationRate(_))
        ));
    }

    #[test]
    fn test_validate_selection_scale() {
        for scale in [1e-3, f64::NAN, f64::NEG_INFINITY] {
            let config = GaConfig::default().with_selection_scale(scale);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidSelectionScale(_))
            ));
        }
        assert!(GaConfig::default().with_selection_scale(0.0).validate().is_ok());
    }
}
