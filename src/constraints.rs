//! Feasibility predicates: a placement is admissible only when every building
//! sits inside the site and no two buildings overlap.

use crate::geometry::{rect_within_polygon, rects_intersect, Polygon, Rect};
use crate::solution::Solution;
use crate::InputBuilding;

/// Upper bound on rejection-sampling attempts before a search loop gives up
/// and reports the input as infeasible.
pub(crate) const MAX_FEASIBILITY_ATTEMPTS: usize = 1_000_000;

/// The world-space rectangle building `index` occupies in `solution`.
pub fn building_rect(solution: &Solution, index: usize, building: &InputBuilding) -> Rect {
    Rect {
        x: solution.x(index),
        y: solution.y(index),
        width: building.width,
        height: building.length,
        angle: solution.rotation(index),
    }
}

/// True when no pair of buildings overlaps.
pub fn no_overlap(solution: &Solution, buildings: &[InputBuilding]) -> bool {
    for i in 0..solution.num_buildings() {
        let a = building_rect(solution, i, &buildings[i]);
        for j in (i + 1)..solution.num_buildings() {
            let b = building_rect(solution, j, &buildings[j]);
            if rects_intersect(&a, &b) {
                return false;
            }
        }
    }
    true
}

/// True when every building lies entirely inside the site polygon.
pub fn within_bounds(solution: &Solution, site: &Polygon, buildings: &[InputBuilding]) -> bool {
    (0..solution.num_buildings()).all(|i| {
        let rect = building_rect(solution, i, &buildings[i]);
        rect_within_polygon(&rect, site)
    })
}

/// The full admission predicate: non-overlapping and in bounds.
pub fn is_feasible(solution: &Solution, site: &Polygon, buildings: &[InputBuilding]) -> bool {
    no_overlap(solution, buildings) && within_bounds(solution, site, buildings)
}
