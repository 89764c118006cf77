//! Travelling-salesperson tours as permutation genomes.
//!
//! A [`Tour`] is an ordering of the indices `0..n` of a fixed city set.
//! [`TspProblem`] evaluates a tour by handing the ordered coordinates to its
//! objective, by default [`tour_length`], the closed-loop Euclidean length.
//!
//! Operators:
//! - crossover: [`segment_transfer_crossover`] (one child per pair)
//! - mutation: [`relocation_mutation`] biased by the precomputed distance
//!   matrix

use crate::ga::operators::{is_permutation, relocation_mutation, segment_transfer_crossover};
use crate::ga::{Fitness, GaProblem, Individual};
use crate::random::shuffle;
use rand::Rng;
use std::fmt;

/// Objective type used by [`TspProblem::new`].
pub type RouteObjective = fn(&[Point]) -> f64;

/// TSP construction errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TspError {
    #[error("At least 2 cities are required, got {0}")]
    TooFewCities(usize),
    #[error("City {index} has {found} coordinates, expected 2")]
    CoordinateDimension { index: usize, found: usize },
    #[error("City {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
    #[error("Order is not a permutation of the {n_cities} cities")]
    InvalidTour { n_cities: usize },
}

/// A city location in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Total length of a closed route, including the leg from the last city
/// back to the first.
pub fn tour_length(route: &[Point]) -> f64 {
    match route {
        [] | [_] => 0.0,
        [first, .., last] => {
            let legs: f64 = route.windows(2).map(|w| w[0].distance(&w[1])).sum();
            legs + last.distance(first)
        }
    }
}

/// A permutation of city indices with its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    order: Vec<usize>,
    fitness: f64,
}

impl Tour {
    /// The visiting order as city indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Consumes the tour, returning the visiting order.
    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

impl Individual for Tour {
    type Fitness = f64;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// TSP over a fixed set of cities.
pub struct TspProblem<F = RouteObjective> {
    cities: Vec<Point>,
    distances: Vec<f64>,
    objective: F,
}

impl TspProblem {
    /// Creates a problem minimizing [`tour_length`].
    pub fn new(cities: Vec<Point>) -> Result<Self, TspError> {
        if cities.len() < 2 {
            return Err(TspError::TooFewCities(cities.len()));
        }
        if let Some(index) = cities
            .iter()
            .position(|c| !c.x.is_finite() || !c.y.is_finite())
        {
            return Err(TspError::NonFiniteCoordinate { index });
        }

        let n = cities.len();
        let mut distances = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cities[i].distance(&cities[j]);
                distances[i * n + j] = d;
                distances[j * n + i] = d;
            }
        }

        Ok(Self {
            cities,
            distances,
            objective: tour_length,
        })
    }

    /// Creates a problem from raw coordinate rows, each of which must hold
    /// exactly two values.
    pub fn from_coordinates<C: AsRef<[f64]>>(rows: &[C]) -> Result<Self, TspError> {
        let cities = rows
            .iter()
            .enumerate()
            .map(|(index, row)| match row.as_ref() {
                [x, y] => Ok(Point::new(*x, *y)),
                other => Err(TspError::CoordinateDimension {
                    index,
                    found: other.len(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(cities)
    }
}

impl<F> TspProblem<F>
where
    F: Fn(&[Point]) -> f64 + Send + Sync,
{
    /// Replaces the route objective.
    ///
    /// The relocation mutation keeps using Euclidean city distances.
    pub fn with_objective<G>(self, objective: G) -> TspProblem<G>
    where
        G: Fn(&[Point]) -> f64 + Send + Sync,
    {
        TspProblem {
            cities: self.cities,
            distances: self.distances,
            objective,
        }
    }

    /// The city set.
    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    /// Number of cities.
    pub fn n_cities(&self) -> usize {
        self.cities.len()
    }

    /// Euclidean distance between cities `a` and `b`.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.distances[a * self.cities.len() + b]
    }

    /// The coordinates of `tour` in visiting order.
    pub fn route(&self, tour: &Tour) -> Vec<Point> {
        self.route_of(&tour.order)
    }

    /// The coordinates of a visiting order.
    pub fn route_of(&self, order: &[usize]) -> Vec<Point> {
        order.iter().map(|&i| self.cities[i]).collect()
    }

    /// Builds an (unevaluated) tour from a visiting order.
    pub fn tour_from_order(&self, order: Vec<usize>) -> Result<Tour, TspError> {
        if !is_permutation(&order, self.n_cities()) {
            return Err(TspError::InvalidTour {
                n_cities: self.n_cities(),
            });
        }
        Ok(Tour {
            order,
            fitness: f64::worst(),
        })
    }
}

impl<F> fmt::Debug for TspProblem<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TspProblem")
            .field("cities", &self.cities)
            .finish_non_exhaustive()
    }
}

impl<F> GaProblem for TspProblem<F>
where
    F: Fn(&[Point]) -> f64 + Send + Sync,
{
    type Individual = Tour;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Tour {
        let mut order: Vec<usize> = (0..self.n_cities()).collect();
        shuffle(&mut order, rng);
        Tour {
            order,
            fitness: f64::worst(),
        }
    }

    fn evaluate(&self, tour: &Tour) -> f64 {
        (self.objective)(&self.route(tour))
    }

    fn crossover<R: Rng>(&self, parent1: &Tour, parent2: &Tour, rng: &mut R) -> Vec<Tour> {
        let order = segment_transfer_crossover(&parent1.order, &parent2.order, rng);
        vec![Tour {
            order,
            fitness: f64::worst(),
        }]
    }

    fn mutate<R: Rng>(&self, tour: &mut Tour, rng: &mut R) {
        relocation_mutation(&mut tour.order, |a, b| self.distance(a, b), rng);
    }
}
