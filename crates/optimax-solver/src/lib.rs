mod branch_bound;
mod problem;
mod selector;
mod simplex;
mod solution;
mod solver;
mod standard_form;

pub use branch_bound::{
    BranchDecision, BranchDirection, NodeOutcome, PruneReason, Relaxation, SearchNode, VariableBounds,
};
pub use problem::{Constraint, Direction, Problem, ProblemError, Relation};
pub use selector::{
    is_zero_vector_feasible, select_algorithm, select_algorithm_with_tolerance, Algorithm, UnknownAlgorithm,
};
pub use solution::{IterationPoint, SolutionReport, SolutionStatus};
pub use solver::{Solver, DEFAULT_TOLERANCE};
pub use standard_form::StandardForm;
