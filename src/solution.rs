//! The placement genome: one `(x, y, rotation)` triple per building.

use serde::{Deserialize, Serialize};

use crate::geometry::{float_equals, Point};
use crate::{Error, Result};

/// A candidate arrangement of every building, plus its cached fitness.
///
/// Genes are stored flat: building `i` occupies slots `3i..3i+3` as
/// x-position, y-position, rotation in degrees. The fitness cache starts
/// unset; reading it before [`set_fitness`](Self::set_fitness) fails with
/// [`Error::FitnessNotSet`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Solution {
    genes: Vec<f32>,
    num_buildings: usize,
    fitness: Option<f64>,
}

impl Solution {
    /// A zero-filled genome for `num_buildings` buildings, fitness unset.
    pub fn new(num_buildings: usize) -> Self {
        Self {
            genes: vec![0.0; num_buildings * 3],
            num_buildings,
            fitness: None,
        }
    }

    pub fn num_buildings(&self) -> usize {
        self.num_buildings
    }

    pub fn x(&self, building: usize) -> f32 {
        self.genes[building * 3]
    }

    pub fn y(&self, building: usize) -> f32 {
        self.genes[building * 3 + 1]
    }

    pub fn rotation(&self, building: usize) -> f32 {
        self.genes[building * 3 + 2]
    }

    pub fn set_x(&mut self, building: usize, x: f32) {
        self.genes[building * 3] = x;
    }

    pub fn set_y(&mut self, building: usize, y: f32) {
        self.genes[building * 3 + 1] = y;
    }

    pub fn set_rotation(&mut self, building: usize, rotation: f32) {
        self.genes[building * 3 + 2] = rotation;
    }

    /// Center of the given building.
    pub fn position(&self, building: usize) -> Point {
        Point::new(self.x(building), self.y(building))
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Cached fitness, or [`Error::FitnessNotSet`] when it has never been
    /// assigned.
    pub fn fitness(&self) -> Result<f64> {
        self.fitness.ok_or(Error::FitnessNotSet)
    }

    /// Cached fitness with a fallback, for ordering solutions without
    /// surfacing the unset case.
    pub(crate) fn fitness_or(&self, default: f64) -> f64 {
        self.fitness.unwrap_or(default)
    }
}

/// Gene-wise equality within the geometry epsilon. The fitness cache does not
/// participate.
impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.genes.len() == other.genes.len()
            && self
                .genes
                .iter()
                .zip(&other.genes)
                .all(|(&a, &b)| float_equals(a, b))
    }
}
