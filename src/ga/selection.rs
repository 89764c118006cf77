//! Parent selection.
//!
//! Parents are drawn with replacement from an exponentially scaled
//! fitness-proportionate distribution:
//!
//! ```text
//! P(i) = exp(scale * f_i) / Σ_j exp(scale * f_j),   scale <= 0
//! ```
//!
//! A negative `scale` gives lower (better) fitness a larger weight. The
//! magnitude of `scale` controls selection pressure: with the tiny default
//! scales the distribution is close to uniform and the elitist truncation
//! step carries most of the pressure.

use super::types::{Fitness, Individual};
use rand::Rng;

/// Exponentially scaled fitness-proportionate selection.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::ExponentialSelection;
///
/// let sel = ExponentialSelection::new(-1.0);
/// let w = sel.weights(&[0.0, 1.0]);
/// assert!(w[0] > w[1]);
/// assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialSelection {
    scale: f64,
}

impl ExponentialSelection {
    /// Creates a selector with the given (non-positive) scale.
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    /// The exponent scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Computes the normalized selection distribution for `fitness`.
    ///
    /// Weights are shifted by the minimum finite fitness before
    /// exponentiation, which leaves the normalized distribution unchanged
    /// and avoids underflow. Non-finite fitness values get weight 0. If no
    /// weight survives, the distribution is uniform.
    pub fn weights(&self, fitness: &[f64]) -> Vec<f64> {
        let n = fitness.len();
        if n == 0 {
            return Vec::new();
        }

        let min = fitness
            .iter()
            .copied()
            .filter(|f| f.is_finite())
            .fold(f64::INFINITY, f64::min);
        if !min.is_finite() {
            return vec![1.0 / n as f64; n];
        }

        let raw: Vec<f64> = fitness
            .iter()
            .map(|&f| {
                let w = (self.scale * (f - min)).exp();
                if f.is_finite() && w.is_finite() {
                    w
                } else {
                    0.0
                }
            })
            .collect();

        let total: f64 = raw.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return vec![1.0 / n as f64; n];
        }
        raw.into_iter().map(|w| w / total).collect()
    }

    /// Draws two independent parent pools, each the size of the population.
    ///
    /// Returned values are indices into `population`. The same index may
    /// appear at the same position of both pools (self-mating).
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select_pools<I: Individual, R: Rng>(
        &self,
        population: &[I],
        rng: &mut R,
    ) -> (Vec<usize>, Vec<usize>) {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        let fitness: Vec<f64> = population
            .iter()
            .map(|ind| ind.fitness().to_f64())
            .collect();
        let weights = self.weights(&fitness);
        let n = population.len();

        let pool_a = draw_pool(&weights, n, rng);
        let pool_b = draw_pool(&weights, n, rng);
        (pool_a, pool_b)
    }
}

/// Draws `size` indices with replacement, proportionally to `weights`.
///
/// Weights need not be normalized. Falls back to uniform sampling when the
/// weights sum to zero or a non-finite value.
///
/// # Panics
/// Panics if `weights` is empty and `size > 0`.
pub fn draw_pool<R: Rng>(weights: &[f64], size: usize, rng: &mut R) -> Vec<usize> {
    if size == 0 {
        return Vec::new();
    }
    assert!(
        !weights.is_empty(),
        "cannot draw from an empty distribution"
    );

    let n = weights.len();
    let mut cumulative = Vec::with_capacity(n);
    let mut acc = 0.0;
    for &w in weights {
        acc += if w.is_finite() && w > 0.0 { w } else { 0.0 };
        cumulative.push(acc);
    }

    if acc <= 0.0 || !acc.is_finite() {
        return (0..size).map(|_| rng.random_range(0..n)).collect();
    }

    (0..size)
        .map(|_| {
            let threshold = rng.random_range(0.0..acc);
            cumulative
                .partition_point(|&c| c <= threshold)
                .min(n - 1) // floating-point fallback
        })
        .collect()
}
