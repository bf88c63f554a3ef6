//! Genetic search for placing rectangular buildings inside an irregular
//! polygonal site.
//!
//! Candidate layouts are genomes of per-building `(x, y, rotation)` triples.
//! The solver evolves a population of feasible layouts (every building inside
//! the site, no two buildings overlapping) toward a minimal weighted
//! objective of inter-building material-flow cost plus hazard-zone penalties.
//! Feasibility is enforced by construction: seeding, crossover, and mutation
//! all rejection-sample until their candidate clears the geometric
//! predicates.

use serde::{Deserialize, Serialize};

pub mod constraints;
pub mod fitness;
pub mod geometry;
pub mod solution;
pub mod solver;

pub mod operators {
    pub mod crossover;
    pub mod mutation;
    pub mod selection;
}

/// Footprint of one building to place: the dimensions are fixed, the pose is
/// what the search decides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputBuilding {
    pub length: f32,
    pub width: f32,
}

impl InputBuilding {
    pub fn new(length: f32, width: f32) -> Self {
        Self { length, width }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The flow matrix is not square over the building list.
    #[error("flow matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// The input admits no feasible placement.
    #[error("infeasible input: {reason}")]
    InfeasibleInput { reason: String },
    /// A solution's fitness was read before it was evaluated.
    #[error("fitness read before it was set")]
    FitnessNotSet,
}

pub type Result<T> = std::result::Result<T, Error>;

pub use fitness::solution_fitness;
pub use operators::mutation::MutationOp;
pub use operators::selection::SelectionKind;
pub use solution::Solution;
pub use solver::{GenerationCounter, GeneticSolver, SolverParams};
