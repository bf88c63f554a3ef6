//! Uniform per-gene crossover with feasibility-guarded retries.

use rand::Rng;

use crate::constraints::{is_feasible, MAX_FEASIBILITY_ATTEMPTS};
use crate::geometry::Polygon;
use crate::solution::Solution;
use crate::{Error, InputBuilding, Result};

/// Breed two children from two parents.
///
/// Each child starts as a full copy of one parent, keeping that parent's
/// cached fitness until the driver re-evaluates it. Then, per attempt,
/// every gene slot (x, y, rotation of every building) is re-drawn with a fair
/// coin from parent A or parent B. An attempt is kept only if the resulting
/// child is feasible; infeasible mixes are re-rolled.
pub fn crossover<R: Rng>(
    rng: &mut R,
    parent_a: &Solution,
    parent_b: &Solution,
    site: &Polygon,
    buildings: &[InputBuilding],
) -> Result<(Solution, Solution)> {
    let count = parent_a.num_buildings();
    let mut children = [parent_a.clone(), parent_b.clone()];

    for child in &mut children {
        let mut attempts = 0usize;
        loop {
            for i in 0..count {
                let src = pick(rng, parent_a, parent_b);
                child.set_x(i, src.x(i));
                let src = pick(rng, parent_a, parent_b);
                child.set_y(i, src.y(i));
                let src = pick(rng, parent_a, parent_b);
                child.set_rotation(i, src.rotation(i));
            }
            if is_feasible(child, site, buildings) {
                break;
            }
            attempts += 1;
            if attempts >= MAX_FEASIBILITY_ATTEMPTS {
                return Err(Error::InfeasibleInput {
                    reason: "crossover could not mix a feasible child".into(),
                });
            }
        }
    }

    let [first, second] = children;
    Ok((first, second))
}

fn pick<'a, R: Rng>(rng: &mut R, a: &'a Solution, b: &'a Solution) -> &'a Solution {
    if rng.random_bool(0.5) {
        a
    } else {
        b
    }
}
