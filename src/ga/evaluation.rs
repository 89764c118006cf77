//! Fitness evaluation and population statistics.

use super::types::{Fitness, GaProblem, Individual};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;

/// Evaluates every individual in `population` and stores its fitness.
///
/// With the `parallel` feature and `parallel = true`, individuals are
/// evaluated on the rayon pool. Each result is written to its own
/// individual, so the outcome does not depend on evaluation order.
pub fn evaluate_population<P: GaProblem>(
    problem: &P,
    population: &mut [P::Individual],
    parallel: bool,
) {
    if parallel {
        evaluate_parallel(problem, population);
    } else {
        evaluate_sequential(problem, population);
    }
}

fn evaluate_sequential<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    for ind in population.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

#[cfg(feature = "parallel")]
fn evaluate_parallel<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    population.par_iter_mut().for_each(|ind| {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    });
}

#[cfg(not(feature = "parallel"))]
fn evaluate_parallel<P: GaProblem>(problem: &P, population: &mut [P::Individual]) {
    evaluate_sequential(problem, population);
}

/// The population's fitness vector, in population order.
pub fn fitness_values<I: Individual>(population: &[I]) -> Vec<f64> {
    population.iter().map(|ind| ind.fitness().to_f64()).collect()
}

/// Arithmetic mean of the population's fitness (`NaN` if empty).
pub fn mean_fitness<I: Individual>(population: &[I]) -> f64 {
    let sum: f64 = population.iter().map(|ind| ind.fitness().to_f64()).sum();
    sum / population.len() as f64
}

/// Total order on fitness values, best (lowest) first.
///
/// `NaN` ranks together with `+inf` behind every finite value, and the two
/// zeros tie.
pub fn compare_fitness<F: Fitness>(a: F, b: F) -> Ordering {
    rank(a.to_f64()).total_cmp(&rank(b.to_f64()))
}

fn rank(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::INFINITY
    } else {
        fitness + 0.0
    }
}

/// Index of the individual with the best (lowest) fitness.
///
/// Ties resolve to the first occurrence. Returns `None` for an empty slice.
pub fn best_index<I: Individual>(population: &[I]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| compare_fitness(a.fitness(), b.fitness()))
        .map(|(i, _)| i)
}
