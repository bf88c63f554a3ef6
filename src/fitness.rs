//! The objective: weighted material-flow cost plus hazard-zone penalties.
//! Lower is better; nothing is normalized.

use crate::constraints::building_rect;
use crate::geometry::{distance, rect_intersects_polygon, Polygon};
use crate::solution::Solution;
use crate::InputBuilding;

/// Score a placement. Pure: equal inputs always produce equal outputs.
///
/// The flow term sums `distance(i, j) * flows[i][j]` over building pairs and
/// is scaled by `distance_weight`; the hazard term adds `flood_penalty` once
/// per flood polygon a building touches and `landslide_penalty` once per
/// landslide polygon.
///
/// `flows` must be a square matrix matching `buildings`; the solver validates
/// this at run entry.
pub fn solution_fitness(
    solution: &Solution,
    buildings: &[InputBuilding],
    flows: &[Vec<f32>],
    flood_areas: &[Polygon],
    landslide_areas: &[Polygon],
    flood_penalty: f32,
    landslide_penalty: f32,
    distance_weight: f32,
) -> f64 {
    let count = solution.num_buildings();
    let mut fitness = 0.0f64;

    for i in 0..count {
        // NOTE: the inner index deliberately starts at 1, so column 0 of the
        // flow matrix never contributes a term.
        for j in 1..count {
            if i == j {
                continue;
            }
            fitness +=
                f64::from(distance(solution.position(i), solution.position(j)) * flows[i][j]);
        }
    }

    fitness *= f64::from(distance_weight);

    for i in 0..count {
        let rect = building_rect(solution, i, &buildings[i]);
        for area in flood_areas {
            if rect_intersects_polygon(&rect, area) {
                fitness += f64::from(flood_penalty);
            }
        }
        for area in landslide_areas {
            if rect_intersects_polygon(&rect, area) {
                fitness += f64::from(landslide_penalty);
            }
        }
    }

    fitness
}
