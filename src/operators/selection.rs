//! Parent selection over a fitness-evaluated population.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::float_less_equal_f64;
use crate::solution::Solution;

/// How parents are drawn from the population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionKind {
    /// No selection pressure: the first two individuals are used as-is.
    None,
    RouletteWheel,
    Tournament,
}

/// Draw two parents from `population` according to `kind`.
///
/// `tournament_size` only matters for [`SelectionKind::Tournament`].
pub fn select_parents<R: Rng>(
    rng: &mut R,
    population: &[Solution],
    tournament_size: usize,
    kind: SelectionKind,
) -> (Solution, Solution) {
    match kind {
        SelectionKind::None => (population[0].clone(), population[1].clone()),
        SelectionKind::RouletteWheel => roulette_wheel(rng, population),
        SelectionKind::Tournament => tournament(rng, population, tournament_size),
    }
}

/// One tournament of `size` uniform draws; returns the winner and the
/// runner-up of the same tournament. Ties keep the earlier-seen contender.
/// With fewer than two draws the winner is duplicated.
fn tournament<R: Rng>(
    rng: &mut R,
    population: &[Solution],
    size: usize,
) -> (Solution, Solution) {
    let mut best: Option<usize> = None;
    let mut second: Option<usize> = None;

    for _ in 0..size {
        let idx = rng.random_range(0..population.len());
        let fit = population[idx].fitness_or(f64::INFINITY);
        let best_fit = best.map_or(f64::INFINITY, |b| population[b].fitness_or(f64::INFINITY));
        if best.is_none() || fit < best_fit {
            second = best;
            best = Some(idx);
        } else {
            let second_fit =
                second.map_or(f64::INFINITY, |s| population[s].fitness_or(f64::INFINITY));
            if second.is_none() || fit < second_fit {
                second = Some(idx);
            }
        }
    }

    let winner = best.unwrap_or(0);
    let runner_up = second.unwrap_or(winner);
    (population[winner].clone(), population[runner_up].clone())
}

/// Roulette-wheel selection, two independent spins.
///
/// Each spin draws `p` uniformly from `[0, sum]` and scans the population
/// decrementing `p` until it drops to zero; index 0 is the fallback when it
/// never does.
fn roulette_wheel<R: Rng>(rng: &mut R, population: &[Solution]) -> (Solution, Solution) {
    let fitnesses: Vec<f64> = population.iter().map(|s| s.fitness_or(0.0)).collect();
    let sum: f64 = fitnesses.iter().sum();
    let max = fitnesses.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = fitnesses.iter().cloned().fold(f64::INFINITY, f64::min);
    let upper_bound = max + min;

    let mut picks = [0usize; 2];
    for parent in 0..2 {
        let mut p = if sum > 0.0 {
            rng.random_range(0.0..=sum)
        } else {
            0.0
        };
        for k in 0..fitnesses.len() {
            // NOTE: the decrement reads the parent slot's fitness, not the
            // fitness of the individual being scanned.
            p -= upper_bound - fitnesses[parent];
            if float_less_equal_f64(p, 0.0) {
                picks[parent] = k;
                break;
            }
        }
    }

    (population[picks[0]].clone(), population[picks[1]].clone())
}
