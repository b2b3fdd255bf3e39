use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::problem::{Problem, Relation};
use crate::solver::DEFAULT_TOLERANCE;

/// Solving strategy
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Primal simplex from the all-zero vertex
    Simplex,
    /// Dual simplex from the slack basis
    DualSimplex,
    BranchAndBound,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Simplex => "simplex",
            Algorithm::DualSimplex => "dual_simplex",
            Algorithm::BranchAndBound => "branch_and_bound",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown algorithm '{0}' (expected simplex, dual_simplex or branch_and_bound)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplex" | "primal" | "simplex_primal" => Ok(Algorithm::Simplex),
            "dual_simplex" | "dual" | "simplex_dual" => Ok(Algorithm::DualSimplex),
            "branch_and_bound" | "bnb" => Ok(Algorithm::BranchAndBound),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Whether `x = 0` satisfies every constraint of `problem`.
///
/// `<=` and `>=` rows are compared exactly; `==` rows need `|rhs| <= tolerance`.
pub fn is_zero_vector_feasible(problem: &Problem, tolerance: f64) -> bool {
    problem.constraints().iter().all(|c| match c.relation {
        Relation::Le => 0.0 <= c.rhs,
        Relation::Ge => 0.0 >= c.rhs,
        Relation::Eq => c.rhs.abs() <= tolerance,
    })
}

/// Pick a strategy from the problem's structure, using the default tolerance.
///
/// Integer-restricted variables always mean branch-and-bound. Pure LPs use
/// primal simplex when the zero vector is feasible and dual simplex otherwise.
pub fn select_algorithm(problem: &Problem) -> Algorithm {
    select_algorithm_with_tolerance(problem, DEFAULT_TOLERANCE)
}

pub fn select_algorithm_with_tolerance(problem: &Problem, tolerance: f64) -> Algorithm {
    if problem.has_integer_variables() {
        Algorithm::BranchAndBound
    } else if is_zero_vector_feasible(problem, tolerance) {
        Algorithm::Simplex
    } else {
        Algorithm::DualSimplex
    }
}
