//! The three geometric mutation operators.
//!
//! Every operator proposes a change to a clone of the solution and commits it
//! only once the whole placement is feasible again; rejected proposals restart
//! from the pre-mutation state. Rejection loops are bounded so a pathological
//! site surfaces as an error instead of spinning forever.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::constraints::{building_rect, is_feasible, MAX_FEASIBILITY_ATTEMPTS};
use crate::geometry::{angle, line_to_vec, perp, rotate, Line, Point, Polygon};
use crate::solution::Solution;
use crate::{Error, InputBuilding, Result};

/// Maximum positional shift per axis for [`jiggle`].
const MAX_SHIFT: f32 = 1.0;
/// Maximum rotation delta in degrees for [`jiggle`].
const MAX_ROT_SHIFT: f32 = 5.0;

/// The mutation repertoire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOp {
    /// Snap one building flush against a side of another.
    BuddyBuddy,
    /// Re-roll one building's pose from scratch.
    Shake,
    /// Nudge one building by small positional and rotational deltas.
    Jiggle,
}

const ALL_OPS: [MutationOp; 3] = [MutationOp::BuddyBuddy, MutationOp::Shake, MutationOp::Jiggle];
// BuddyBuddy needs two distinct buildings, so it leaves the pool when there
// is only one.
const SINGLE_BUILDING_OPS: [MutationOp; 2] = [MutationOp::Shake, MutationOp::Jiggle];

/// Apply one mutation operator, chosen uniformly at random.
pub fn mutate<R: Rng>(
    rng: &mut R,
    solution: &mut Solution,
    site: &Polygon,
    buildings: &[InputBuilding],
) -> Result<()> {
    let pool: &[MutationOp] = if buildings.len() < 2 {
        &SINGLE_BUILDING_OPS
    } else {
        &ALL_OPS
    };
    let op = pool.choose(rng).copied().unwrap_or(MutationOp::Shake);
    match op {
        MutationOp::BuddyBuddy => buddy_buddy(rng, solution, site, buildings),
        MutationOp::Shake => shake(rng, solution, site, buildings),
        MutationOp::Jiggle => jiggle(rng, solution, site, buildings),
    }
}

/// Slide one building (the dynamic buddy) along a side of another (the static
/// buddy) so the two end up flush.
///
/// A contact side of the static buddy is picked at random; the dynamic buddy
/// is positioned a half-extent (plus a 1e-4 separation nudge, so flush contact
/// does not read as overlap) off that side, at a uniformly drawn point along
/// it. Orientation 0 aligns the dynamic buddy with the contact line;
/// orientation 1 tilts it 45 degrees off the line rather than a perpendicular
/// 90.
pub fn buddy_buddy<R: Rng>(
    rng: &mut R,
    solution: &mut Solution,
    site: &Polygon,
    buildings: &[InputBuilding],
) -> Result<()> {
    let count = buildings.len();
    if count < 2 {
        return Err(Error::InfeasibleInput {
            reason: "buddy-buddy mutation needs at least two buildings".into(),
        });
    }
    let mut attempts = 0usize;
    loop {
        let mut candidate = solution.clone();

        let (static_buddy, dynamic_buddy) = loop {
            let a = rng.random_range(0..count);
            let b = rng.random_range(0..count);
            if a != b {
                break (a, b);
            }
        };

        let corners = building_rect(solution, static_buddy, &buildings[static_buddy]).corners();
        let side = rng.random_range(0..4usize);
        let contact = Line {
            start: corners[side],
            end: corners[(side + 1) % 4],
        };
        let contact_vec = line_to_vec(&contact);
        let contact_angle = angle(contact_vec);

        let building = &buildings[dynamic_buddy];
        let (center_dist, ext, dynamic_angle) = if rng.random_range(0..2) == 0 {
            (building.width / 2.0, building.length / 2.0, contact_angle)
        } else {
            (
                building.length / 2.0,
                building.width / 2.0,
                contact_angle + 45.0,
            )
        };
        let center_dist = center_dist + 1e-4;

        let mid = rotate(Point::new(0.0, ext * 2.0), contact_angle) + contact_vec;
        let mid_start = rotate(Point::new(0.0, -ext), contact_angle) + contact.start;
        let slide = rng.random::<f32>();
        let offset = perp(rotate(Point::new(0.0, center_dist), contact_angle));
        let pos = mid * slide + offset + mid_start;

        candidate.set_x(dynamic_buddy, pos.x);
        candidate.set_y(dynamic_buddy, pos.y);
        candidate.set_rotation(dynamic_buddy, dynamic_angle);

        if is_feasible(&candidate, site, buildings) {
            *solution = candidate;
            return Ok(());
        }
        attempts += 1;
        if attempts >= MAX_FEASIBILITY_ATTEMPTS {
            return Err(Error::InfeasibleInput {
                reason: "buddy-buddy mutation found no feasible contact placement".into(),
            });
        }
    }
}

/// Re-roll one building's pose uniformly: x and y from the site's axis-aligned
/// bounds, rotation from `[0, 360)`. Only the target building's genes change.
pub fn shake<R: Rng>(
    rng: &mut R,
    solution: &mut Solution,
    site: &Polygon,
    buildings: &[InputBuilding],
) -> Result<()> {
    let target = rng.random_range(0..solution.num_buildings());
    let (min, max) = site.bounding_box();

    let mut candidate = solution.clone();
    let mut attempts = 0usize;
    loop {
        candidate.set_x(target, rng.random_range(min.x..max.x));
        candidate.set_y(target, rng.random_range(min.y..max.y));
        candidate.set_rotation(target, rng.random_range(0.0f32..360.0));
        if is_feasible(&candidate, site, buildings) {
            *solution = candidate;
            return Ok(());
        }
        attempts += 1;
        if attempts >= MAX_FEASIBILITY_ATTEMPTS {
            return Err(Error::InfeasibleInput {
                reason: "shake mutation found no feasible pose".into(),
            });
        }
    }
}

/// Nudge one building: one of 8 move patterns (single-axis and diagonal) with
/// per-axis shifts from `[0, 1)`, then a rotation delta from `[-5, 5)`.
///
/// NOTE: the single-axis y patterns read the building's X coordinate when
/// assigning Y, so they relocate rather than nudge.
pub fn jiggle<R: Rng>(
    rng: &mut R,
    solution: &mut Solution,
    site: &Polygon,
    buildings: &[InputBuilding],
) -> Result<()> {
    let mut attempts = 0usize;
    loop {
        let mut candidate = solution.clone();
        let target = rng.random_range(0..buildings.len());

        match rng.random_range(0..8) {
            0 => {
                let shift = rng.random_range(0.0..MAX_SHIFT);
                candidate.set_x(target, candidate.x(target) + shift);
            }
            1 => {
                let shift = rng.random_range(0.0..MAX_SHIFT);
                candidate.set_x(target, candidate.x(target) - shift);
            }
            2 => {
                let shift = rng.random_range(0.0..MAX_SHIFT);
                candidate.set_y(target, candidate.x(target) - shift);
            }
            3 => {
                let shift = rng.random_range(0.0..MAX_SHIFT);
                candidate.set_y(target, candidate.x(target) + shift);
            }
            4 => {
                let (a, b) = two_shifts(rng);
                candidate.set_x(target, candidate.x(target) + a);
                candidate.set_y(target, candidate.y(target) - b);
            }
            5 => {
                let (a, b) = two_shifts(rng);
                candidate.set_x(target, candidate.x(target) + a);
                candidate.set_y(target, candidate.y(target) + b);
            }
            6 => {
                let (a, b) = two_shifts(rng);
                candidate.set_x(target, candidate.x(target) - a);
                candidate.set_y(target, candidate.y(target) - b);
            }
            _ => {
                let (a, b) = two_shifts(rng);
                candidate.set_x(target, candidate.x(target) - a);
                candidate.set_y(target, candidate.y(target) + b);
            }
        }

        let rot_delta = rng.random_range(-MAX_ROT_SHIFT..MAX_ROT_SHIFT);
        candidate.set_rotation(target, candidate.rotation(target) + rot_delta);

        if is_feasible(&candidate, site, buildings) {
            *solution = candidate;
            return Ok(());
        }
        attempts += 1;
        if attempts >= MAX_FEASIBILITY_ATTEMPTS {
            return Err(Error::InfeasibleInput {
                reason: "jiggle mutation found no feasible nudge".into(),
            });
        }
    }
}

fn two_shifts<R: Rng>(rng: &mut R) -> (f32, f32) {
    (
        rng.random_range(0.0..MAX_SHIFT),
        rng.random_range(0.0..MAX_SHIFT),
    )
}
