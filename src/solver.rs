//! The evolution driver: population seeding, the generation loop, and run
//! statistics.
//!
//! A run is one blocking call to [`GeneticSolver::generate_solutions`]. The
//! solver owns a seeded [`Pcg64`], so two solvers built
//! [`with_seed`](GeneticSolver::with_seed) on the same inputs produce the
//! same snapshots. Progress can be observed from another thread through the
//! [`GenerationCounter`] handle; everything else is single-threaded and
//! synchronous.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use rand::prelude::SeedableRng;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::constraints::{is_feasible, MAX_FEASIBILITY_ATTEMPTS};
use crate::fitness::solution_fitness;
use crate::geometry::{float_less_than, float_less_than_f64, rect_within_polygon, Polygon, Rect};
use crate::operators::crossover::crossover;
use crate::operators::mutation::mutate;
use crate::operators::selection::{select_parents, SelectionKind};
use crate::solution::Solution;
use crate::{Error, InputBuilding, Result};

/// Tuning knobs for a placement run. Scenario data (buildings, site, flows,
/// hazard areas) are passed to
/// [`generate_solutions`](GeneticSolver::generate_solutions) directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverParams {
    /// Per-child probability of applying a mutation operator.
    pub mutation_rate: f32,
    pub population_size: usize,
    pub num_generations: usize,
    pub tournament_size: usize,
    /// Number of best individuals carried over unchanged each generation.
    pub keep_prev: usize,
    /// Added once per flood polygon a building intersects.
    pub flood_penalty: f32,
    /// Added once per landslide polygon a building intersects.
    pub landslide_penalty: f32,
    /// Scale on the inter-building flow-distance term.
    pub distance_weight: f32,
    /// Accepted but currently unused; reserved for a refinement pass.
    pub local_search: bool,
    pub selection: SelectionKind,
}

/// Cheap cloneable handle for polling run progress from another thread.
///
/// Reads are relaxed atomic loads: tear-free, but an observer may see a value
/// that lags the solver.
#[derive(Clone, Debug)]
pub struct GenerationCounter(Arc<AtomicI32>);

impl GenerationCounter {
    /// The generation the solver is currently breeding, or -1 when no run is
    /// active.
    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// The genetic placement solver.
pub struct GeneticSolver {
    rng: Pcg64,
    generation: Arc<AtomicI32>,
    avg_fitnesses: Vec<f32>,
    best_fitnesses: Vec<f32>,
    worst_fitnesses: Vec<f32>,
}

/// Everything a generation needs to score and repair candidates.
struct EvalContext<'a> {
    buildings: &'a [InputBuilding],
    site: &'a Polygon,
    flows: &'a [Vec<f32>],
    flood_areas: &'a [Polygon],
    landslide_areas: &'a [Polygon],
    params: &'a SolverParams,
}

impl EvalContext<'_> {
    fn evaluate(&self, solution: &Solution) -> f64 {
        solution_fitness(
            solution,
            self.buildings,
            self.flows,
            self.flood_areas,
            self.landslide_areas,
            self.params.flood_penalty,
            self.params.landslide_penalty,
            self.params.distance_weight,
        )
    }
}

impl Default for GeneticSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneticSolver {
    /// A solver seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(Pcg64::from_rng(&mut rand::rng()))
    }

    /// A deterministic solver: same seed + same inputs = same run.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg64::seed_from_u64(seed))
    }

    fn from_rng(rng: Pcg64) -> Self {
        Self {
            rng,
            generation: Arc::new(AtomicI32::new(-1)),
            avg_fitnesses: Vec::new(),
            best_fitnesses: Vec::new(),
            worst_fitnesses: Vec::new(),
        }
    }

    /// Handle for observing the current generation number from another
    /// thread while a run is in flight.
    pub fn generation_counter(&self) -> GenerationCounter {
        GenerationCounter(Arc::clone(&self.generation))
    }

    /// The generation the solver is currently breeding, or -1 outside a run.
    pub fn current_run_generation_number(&self) -> i32 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Mean population fitness per generation of the most recent run,
    /// including the initial population.
    pub fn recent_run_average_fitnesses(&self) -> &[f32] {
        &self.avg_fitnesses
    }

    /// Best (lowest) fitness per generation of the most recent run.
    pub fn recent_run_best_fitnesses(&self) -> &[f32] {
        &self.best_fitnesses
    }

    /// Worst (highest) fitness per generation of the most recent run.
    pub fn recent_run_worst_fitnesses(&self) -> &[f32] {
        &self.worst_fitnesses
    }

    /// Run the evolutionary search and return one population snapshot per
    /// generation, the initial population included: `num_generations + 1`
    /// snapshots of `population_size` solutions each.
    ///
    /// Every returned solution is feasible: inside the site and overlap-free.
    #[instrument(skip_all, fields(
        buildings = buildings.len(),
        population = params.population_size,
        generations = params.num_generations,
    ))]
    pub fn generate_solutions(
        &mut self,
        buildings: &[InputBuilding],
        site: &Polygon,
        flows: &[Vec<f32>],
        flood_areas: &[Polygon],
        landslide_areas: &[Polygon],
        params: &SolverParams,
    ) -> Result<Vec<Vec<Solution>>> {
        validate_inputs(buildings, site, flows, params)?;

        self.avg_fitnesses.clear();
        self.best_fitnesses.clear();
        self.worst_fitnesses.clear();
        self.generation.store(-1, Ordering::Relaxed);

        let ctx = EvalContext {
            buildings,
            site,
            flows,
            flood_areas,
            landslide_areas,
            params,
        };

        info!("seeding initial population");
        let mut population = Vec::with_capacity(params.population_size);
        for i in 0..params.population_size {
            debug!(individual = i, "placing random feasible solution");
            population.push(random_feasible_solution(&mut self.rng, buildings, site)?);
        }

        #[cfg(feature = "parallel")]
        population.par_iter_mut().for_each(|sol| {
            let fitness = ctx.evaluate(sol);
            sol.set_fitness(fitness);
        });
        #[cfg(not(feature = "parallel"))]
        for sol in &mut population {
            let fitness = ctx.evaluate(sol);
            sol.set_fitness(fitness);
        }

        let mut snapshots = Vec::with_capacity(params.num_generations + 1);
        snapshots.push(population.clone());
        let initial_best = population
            .iter()
            .map(|s| s.fitness_or(f64::INFINITY))
            .fold(f64::INFINITY, f64::min);
        self.record_statistics(&population, initial_best);

        let offspring_target = params.population_size - params.keep_prev;
        for gen in 0..params.num_generations {
            self.generation.store(gen as i32, Ordering::Relaxed);

            let mut offspring: Vec<Solution> = Vec::with_capacity(offspring_target);
            while offspring.len() < offspring_target {
                let (parent_a, parent_b) = select_parents(
                    &mut self.rng,
                    &population,
                    params.tournament_size,
                    params.selection,
                );
                self.breed_pair(&parent_a, &parent_b, &mut offspring, offspring_target, &ctx)?;
            }

            sort_by_fitness(&mut population);
            for (slot, child) in population[params.keep_prev..].iter_mut().zip(offspring) {
                *slot = child;
            }
            sort_by_fitness(&mut population);

            // The best statistic re-evaluates the front runner; the snapshot
            // keeps its cached value.
            let best = ctx.evaluate(&population[0]);
            snapshots.push(population.clone());
            self.record_statistics(&population, best);
            debug!(generation = gen, best, "generation complete");
        }

        self.generation.store(-1, Ordering::Relaxed);
        info!(
            best = self.best_fitnesses.last().copied().unwrap_or_default(),
            "placement run complete"
        );
        Ok(snapshots)
    }

    /// Breed one selected pair into the offspring pool.
    ///
    /// The first child always takes a slot. If it fills the pool, the second
    /// child only displaces the weakest offspring, judged against the
    /// fitness the child inherited from its seeding parent; otherwise it
    /// takes the next slot. Either way each admitted child is evaluated,
    /// coin-flipped for mutation, and re-evaluated when mutated.
    fn breed_pair(
        &mut self,
        parent_a: &Solution,
        parent_b: &Solution,
        offspring: &mut Vec<Solution>,
        target: usize,
        ctx: &EvalContext<'_>,
    ) -> Result<()> {
        let (mut first, second) =
            crossover(&mut self.rng, parent_a, parent_b, ctx.site, ctx.buildings)?;

        let fitness = ctx.evaluate(&first);
        first.set_fitness(fitness);
        self.maybe_mutate(&mut first, ctx)?;
        offspring.push(first);

        if offspring.len() == target {
            let (weakest_idx, weakest_fitness) = weakest_of(offspring);
            if float_less_than_f64(second.fitness_or(f64::INFINITY), weakest_fitness) {
                let mut second = second;
                let fitness = ctx.evaluate(&second);
                second.set_fitness(fitness);
                self.maybe_mutate(&mut second, ctx)?;
                offspring[weakest_idx] = second;
            }
        } else {
            let mut second = second;
            let fitness = ctx.evaluate(&second);
            second.set_fitness(fitness);
            self.maybe_mutate(&mut second, ctx)?;
            offspring.push(second);
        }

        Ok(())
    }

    fn maybe_mutate(&mut self, child: &mut Solution, ctx: &EvalContext<'_>) -> Result<()> {
        let roll: f32 = self.rng.random();
        if float_less_than(roll, ctx.params.mutation_rate) {
            mutate(&mut self.rng, child, ctx.site, ctx.buildings)?;
            let fitness = ctx.evaluate(child);
            child.set_fitness(fitness);
        }
        Ok(())
    }

    fn record_statistics(&mut self, population: &[Solution], best: f64) {
        let mut total = 0.0f64;
        let mut worst = f64::NEG_INFINITY;
        for sol in population {
            let fitness = sol.fitness_or(0.0);
            total += fitness;
            if fitness > worst {
                worst = fitness;
            }
        }
        self.avg_fitnesses
            .push((total / population.len() as f64) as f32);
        self.best_fitnesses.push(best as f32);
        self.worst_fitnesses.push(worst as f32);
    }
}

/// Rejection-sample one feasible solution: each building's pose is re-drawn
/// from the site bounds until it lands inside the polygon, and the whole
/// arrangement is restarted until it is also overlap-free.
fn random_feasible_solution<R: Rng>(
    rng: &mut R,
    buildings: &[InputBuilding],
    site: &Polygon,
) -> Result<Solution> {
    let (min, max) = site.bounding_box();
    let mut solution = Solution::new(buildings.len());
    let mut attempts = 0usize;
    loop {
        for (i, building) in buildings.iter().enumerate() {
            loop {
                let x = rng.random_range(min.x..max.x);
                let y = rng.random_range(min.y..max.y);
                let rotation = rng.random_range(0.0f32..360.0);
                let rect = Rect {
                    x,
                    y,
                    width: building.width,
                    height: building.length,
                    angle: rotation,
                };
                if rect_within_polygon(&rect, site) {
                    solution.set_x(i, x);
                    solution.set_y(i, y);
                    solution.set_rotation(i, rotation);
                    break;
                }
                attempts += 1;
                if attempts >= MAX_FEASIBILITY_ATTEMPTS {
                    return Err(Error::InfeasibleInput {
                        reason: "no building pose fits inside the site polygon".into(),
                    });
                }
            }
        }
        if is_feasible(&solution, site, buildings) {
            return Ok(solution);
        }
        attempts += 1;
        if attempts >= MAX_FEASIBILITY_ATTEMPTS {
            return Err(Error::InfeasibleInput {
                reason: "no overlap-free arrangement found for the site".into(),
            });
        }
    }
}

fn validate_inputs(
    buildings: &[InputBuilding],
    site: &Polygon,
    flows: &[Vec<f32>],
    params: &SolverParams,
) -> Result<()> {
    if flows.len() != buildings.len() {
        return Err(Error::DimensionMismatch {
            expected: buildings.len(),
            actual: flows.len(),
        });
    }
    for row in flows {
        if row.len() != buildings.len() {
            return Err(Error::DimensionMismatch {
                expected: buildings.len(),
                actual: row.len(),
            });
        }
    }
    if buildings.is_empty() {
        return Err(Error::InfeasibleInput {
            reason: "no buildings to place".into(),
        });
    }
    if site.vertices.len() < 3 {
        return Err(Error::InfeasibleInput {
            reason: "site polygon needs at least 3 vertices".into(),
        });
    }
    let (min, max) = site.bounding_box();
    if !(max.x > min.x && max.y > min.y) {
        return Err(Error::InfeasibleInput {
            reason: "site bounding box has zero area".into(),
        });
    }
    if params.population_size == 0 {
        return Err(Error::InfeasibleInput {
            reason: "population size must be positive".into(),
        });
    }
    if params.keep_prev > params.population_size {
        return Err(Error::InfeasibleInput {
            reason: "keep_prev exceeds the population size".into(),
        });
    }
    Ok(())
}

fn sort_by_fitness(population: &mut [Solution]) {
    population.sort_by(|a, b| {
        a.fitness_or(f64::INFINITY)
            .partial_cmp(&b.fitness_or(f64::INFINITY))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Index and fitness of the weakest (highest-fitness) offspring; the earliest
/// such slot on ties.
fn weakest_of(offspring: &[Solution]) -> (usize, f64) {
    let mut idx = 0;
    let mut worst = f64::NEG_INFINITY;
    for (i, sol) in offspring.iter().enumerate() {
        let fitness = sol.fitness_or(0.0);
        if fitness > worst {
            worst = fitness;
            idx = i;
        }
    }
    (idx, worst)
}
