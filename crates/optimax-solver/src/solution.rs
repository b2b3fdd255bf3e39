use crate::branch_bound::SearchNode;
use crate::selector::Algorithm;

/// Terminal status of a solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// An iteration or node ceiling was exceeded
    Error,
}

impl SolutionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "Optimal",
            SolutionStatus::Infeasible => "Infeasible",
            SolutionStatus::Unbounded => "Unbounded",
            SolutionStatus::Error => "Error",
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Objective value after one simplex pivot
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationPoint {
    /// 1-based pivot counter
    pub iteration: usize,
    /// Objective at the basic solution after the pivot, in the problem's direction
    pub objective_value: f64,
}

/// The result of one top-level solve call
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionReport {
    /// Strategy that produced the report
    pub algorithm: Algorithm,
    pub status: SolutionStatus,
    /// Optimal objective value, in the problem's direction
    pub optimal_value: Option<f64>,
    /// Optimal values for each variable
    pub assignment: Option<Vec<f64>>,
    pub iteration_trace: Vec<IterationPoint>,
    /// Explored nodes in creation order (branch-and-bound only)
    pub search_tree: Option<Vec<SearchNode>>,
    /// Reason attached to an `Error` status
    pub message: Option<String>,
}

impl SolutionReport {
    pub fn optimal(algorithm: Algorithm, optimal_value: f64, assignment: Vec<f64>) -> Self {
        Self {
            algorithm,
            status: SolutionStatus::Optimal,
            optimal_value: Some(optimal_value),
            assignment: Some(assignment),
            iteration_trace: Vec::new(),
            search_tree: None,
            message: None,
        }
    }

    pub fn infeasible(algorithm: Algorithm) -> Self {
        Self::without_solution(algorithm, SolutionStatus::Infeasible)
    }

    pub fn unbounded(algorithm: Algorithm) -> Self {
        Self::without_solution(algorithm, SolutionStatus::Unbounded)
    }

    pub fn error(algorithm: Algorithm, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::without_solution(algorithm, SolutionStatus::Error)
        }
    }

    fn without_solution(algorithm: Algorithm, status: SolutionStatus) -> Self {
        Self {
            algorithm,
            status,
            optimal_value: None,
            assignment: None,
            iteration_trace: Vec::new(),
            search_tree: None,
            message: None,
        }
    }

    pub fn with_trace(mut self, trace: Vec<IterationPoint>) -> Self {
        self.iteration_trace = trace;
        self
    }

    pub fn with_search_tree(mut self, nodes: Vec<SearchNode>) -> Self {
        self.search_tree = Some(nodes);
        self
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }

    /// Number of explored branch-and-bound nodes (zero for simplex runs)
    pub fn node_count(&self) -> usize {
        self.search_tree.as_ref().map_or(0, Vec::len)
    }
}
