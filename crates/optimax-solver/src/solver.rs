use log::{debug, info};

use crate::problem::Problem;
use crate::selector::{self, Algorithm};
use crate::simplex::SimplexMode;
use crate::solution::SolutionReport;
use crate::standard_form::StandardForm;

/// Tolerance used for every comparison against zero unless overridden
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Entry point of the engine and its configuration.
///
/// A `Solver` holds no per-solve state, so one value can be shared across
/// threads and used for any number of independent problems.
#[derive(Debug, Clone, PartialEq)]
pub struct Solver {
    /// Maximum pivots per simplex run before reporting an error
    pub(crate) max_iterations: usize,
    /// Maximum branch-and-bound nodes before reporting an error
    pub(crate) max_nodes: usize,
    /// Tolerance for floating point comparisons
    pub(crate) tolerance: f64,
    /// Concatenate every relaxation's pivot trace into branch-and-bound reports
    pub(crate) trace_relaxations: bool,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_nodes: 100_000,
            tolerance: DEFAULT_TOLERANCE,
            trace_relaxations: false,
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_relaxation_traces(mut self, enabled: bool) -> Self {
        self.trace_relaxations = enabled;
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Strategy the selector picks for `problem` under this tolerance
    pub fn select(&self, problem: &Problem) -> Algorithm {
        selector::select_algorithm_with_tolerance(problem, self.tolerance)
    }

    /// Select a strategy and solve
    pub fn solve(&self, problem: &Problem) -> SolutionReport {
        let algorithm = self.select(problem);
        info!("selected algorithm: {}", algorithm);
        self.solve_with(problem, algorithm)
    }

    /// Solve with an explicit strategy.
    ///
    /// The simplex strategies solve the continuous relaxation and ignore any
    /// integrality flags.
    pub fn solve_with(&self, problem: &Problem, algorithm: Algorithm) -> SolutionReport {
        debug!(
            "solving {} variables, {} constraints with {}",
            problem.num_variables(),
            problem.num_constraints(),
            algorithm
        );
        match algorithm {
            Algorithm::Simplex => self.solve_lp(problem, SimplexMode::Primal, algorithm),
            Algorithm::DualSimplex => self.solve_lp(problem, SimplexMode::Dual, algorithm),
            Algorithm::BranchAndBound => self.branch_and_bound(problem),
        }
    }

    fn solve_lp(&self, problem: &Problem, mode: SimplexMode, algorithm: Algorithm) -> SolutionReport {
        let form = StandardForm::from_problem(problem);
        self.run_simplex(&form, mode).into_report(algorithm)
    }
}
