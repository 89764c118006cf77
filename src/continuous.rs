//! Binary-coded continuous optimization.
//!
//! [`ContinuousProblem`] adapts a real-valued objective `f: &[f64] -> f64`
//! to the GA. Genomes are [`BitString`]s produced by a [`BinaryCodec`];
//! crossover and mutation act on the bits, and every offspring is decoded
//! back to a point before evaluation.
//!
//! # Examples
//!
//! ```
//! use u_evolve::continuous::ContinuousProblem;
//! use u_evolve::ga::{GaConfig, GaRunner};
//!
//! let sphere = |p: &[f64]| p.iter().map(|x| x * x).sum::<f64>();
//! let problem = ContinuousProblem::new(2, sphere).unwrap();
//! let config = GaConfig::continuous()
//!     .with_population_size(30)
//!     .with_max_generations(40)
//!     .with_seed(42);
//! let result = GaRunner::run(&problem, &config).unwrap();
//! assert!(result.best_fitness < 1.0);
//! assert_eq!(result.best.point().len(), 2);
//! ```

use crate::codec::{BinaryCodec, BitString, CodecError, DEFAULT_WIDTH};
use crate::ga::operators::{bit_swap_mutation, two_point_crossover};
use crate::ga::{Fitness, GaProblem, Individual};
use rand::Rng;
use std::fmt;

/// Default lower bound of the initialization box.
pub const DEFAULT_LOWER_BOUND: f64 = -5.0;

/// Default upper bound of the initialization box.
pub const DEFAULT_UPPER_BOUND: f64 = 5.0;

/// Continuous problem construction errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProblemError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Invalid bounds: low = {low}, high = {high}")]
    InvalidBounds { low: f64, high: f64 },
    #[error("Bounds [{low}, {high}] exceed the codec range ±{max}")]
    BoundsOutsideCodec { low: f64, high: f64, max: f64 },
}

/// A binary-coded individual: the genome bits and the decoded point.
#[derive(Debug, Clone, PartialEq)]
pub struct RealIndividual {
    bits: BitString,
    point: Vec<f64>,
    fitness: f64,
}

impl RealIndividual {
    /// The encoded genome.
    pub fn bits(&self) -> &BitString {
        &self.bits
    }

    /// The decoded decision vector.
    pub fn point(&self) -> &[f64] {
        &self.point
    }
}

impl Individual for RealIndividual {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// Real-valued minimization over a binary genome.
///
/// Initial points are drawn uniformly from the box `[low, high)` in every
/// coordinate. Offspring may leave the box but always stay inside the codec
/// range.
#[derive(Clone)]
pub struct ContinuousProblem<F> {
    objective: F,
    codec: BinaryCodec,
    low: f64,
    high: f64,
}

impl<F> fmt::Debug for ContinuousProblem<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousProblem")
            .field("codec", &self.codec)
            .field("low", &self.low)
            .field("high", &self.high)
            .finish_non_exhaustive()
    }
}

impl<F> ContinuousProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Creates a problem over `n_dim` coordinates with the default codec
    /// (17-bit fields, 4 decimals) and bounds `[-5, 5)`.
    pub fn new(n_dim: usize, objective: F) -> Result<Self, ProblemError> {
        let codec = BinaryCodec::new(n_dim, DEFAULT_WIDTH)?;
        Self {
            objective,
            codec,
            low: DEFAULT_LOWER_BOUND,
            high: DEFAULT_UPPER_BOUND,
        }
        .checked()
    }

    /// Sets the initialization box.
    pub fn with_bounds(mut self, low: f64, high: f64) -> Result<Self, ProblemError> {
        self.low = low;
        self.high = high;
        self.checked()
    }

    /// Replaces the codec. Its dimensionality becomes the problem's.
    pub fn with_codec(mut self, codec: BinaryCodec) -> Result<Self, ProblemError> {
        self.codec = codec;
        self.checked()
    }

    /// Number of decision variables.
    pub fn n_dim(&self) -> usize {
        self.codec.n_dim()
    }

    /// The genome codec.
    pub fn codec(&self) -> &BinaryCodec {
        &self.codec
    }

    /// The initialization box `(low, high)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Evaluates the objective at `point`.
    pub fn objective(&self, point: &[f64]) -> f64 {
        (self.objective)(point)
    }

    /// Builds an (unevaluated) individual from a point, quantizing it to the
    /// codec's precision.
    pub fn individual_from_point(&self, point: &[f64]) -> Result<RealIndividual, ProblemError> {
        let bits = self.codec.encode(point)?;
        Ok(self.individual_from_bits(bits)?)
    }

    fn individual_from_bits(&self, bits: BitString) -> Result<RealIndividual, CodecError> {
        let point = self.codec.decode(&bits)?;
        Ok(RealIndividual {
            bits,
            point,
            fitness: f64::worst(),
        })
    }

    fn decode_offspring(&self, bits: BitString) -> RealIndividual {
        self.individual_from_bits(bits)
            .expect("offspring keep the genome length")
    }

    fn checked(self) -> Result<Self, ProblemError> {
        let (low, high) = (self.low, self.high);
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(ProblemError::InvalidBounds { low, high });
        }
        let max = self.codec.max_magnitude();
        if low < -max || high > max {
            return Err(ProblemError::BoundsOutsideCodec { low, high, max });
        }
        Ok(self)
    }
}

impl<F> GaProblem for ContinuousProblem<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    type Individual = RealIndividual;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> RealIndividual {
        let point: Vec<f64> = (0..self.n_dim())
            .map(|_| rng.random_range(self.low..self.high))
            .collect();
        let bits = self
            .codec
            .encode(&point)
            .expect("bounds lie inside the codec range");
        self.decode_offspring(bits)
    }

    fn evaluate(&self, individual: &RealIndividual) -> f64 {
        (self.objective)(&individual.point)
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &RealIndividual,
        parent2: &RealIndividual,
        rng: &mut R,
    ) -> Vec<RealIndividual> {
        let (bits_1, bits_2) = two_point_crossover(&parent1.bits, &parent2.bits, rng);
        vec![self.decode_offspring(bits_1), self.decode_offspring(bits_2)]
    }

    fn mutate<R: Rng>(&self, individual: &mut RealIndividual, rng: &mut R) {
        bit_swap_mutation(&mut individual.bits, rng);
        individual.point = self
            .codec
            .decode(&individual.bits)
            .expect("mutation keeps the genome length");
    }
}
