use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::problem::Problem;
use crate::selector::Algorithm;
use crate::simplex::{LpSolution, SimplexMode};
use crate::solution::{IterationPoint, SolutionReport, SolutionStatus};
use crate::solver::Solver;
use crate::standard_form::StandardForm;

/// Bounds fixed on one variable along a branch
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableBounds {
    pub lower: f64,
    /// `None` means no upper bound
    pub upper: Option<f64>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: None,
        }
    }
}

impl VariableBounds {
    pub fn is_empty(&self) -> bool {
        self.upper.is_some_and(|upper| self.lower > upper)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDirection {
    /// `x <= floor(value)`
    Floor,
    /// `x >= ceil(value)`
    Ceil,
}

/// The split that created a node
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchDecision {
    pub variable: usize,
    pub direction: BranchDirection,
    pub bound: f64,
}

/// Summary of a node's LP relaxation
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub assignment: Option<Vec<f64>>,
    /// Simplex pivots spent on this relaxation
    pub iterations: usize,
}

impl From<&LpSolution> for Relaxation {
    fn from(lp: &LpSolution) -> Self {
        let optimal = lp.status == SolutionStatus::Optimal;
        Self {
            status: lp.status,
            objective_value: optimal.then_some(lp.objective_value),
            assignment: optimal.then(|| lp.values.clone()),
            iterations: lp.iterations(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneReason {
    /// The relaxation has no feasible point
    Infeasible,
    /// The relaxation cannot beat the incumbent
    Bound,
    /// The accumulated bounds contradict each other
    EmptyDomain,
}

/// What happened to a node once its relaxation was solved
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeOutcome {
    Pruned(PruneReason),
    /// Every integer variable is integral; the node became the incumbent
    IntegralFeasible,
    /// Split on `variable`, whose relaxed value was `value`
    Branched { variable: usize, value: f64 },
    /// The relaxation was unbounded or the simplex failed, ending the search
    Aborted,
}

/// A node of the branch-and-bound tree.
///
/// Nodes are stored in an arena in creation order; `id` is the index into it
/// and `parent_id` points back at the node that branched.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub id: usize,
    pub parent_id: Option<usize>,
    pub depth: usize,
    /// Bounds accumulated from the root, by variable index
    pub fixed_bounds: BTreeMap<usize, VariableBounds>,
    /// `None` when the node was pruned before solving
    pub relaxation: Option<Relaxation>,
    /// The split that created this node (`None` at the root)
    pub branch: Option<BranchDecision>,
    pub outcome: NodeOutcome,
}

/// A child waiting on the depth-first stack
struct PendingNode {
    parent_id: Option<usize>,
    depth: usize,
    bounds: BTreeMap<usize, VariableBounds>,
    branch: Option<BranchDecision>,
}

struct Incumbent {
    value: f64,
    assignment: Vec<f64>,
}

impl Solver {
    /// Depth-first branch-and-bound, floor child before ceiling child.
    pub(crate) fn branch_and_bound(&self, problem: &Problem) -> SolutionReport {
        let algorithm = Algorithm::BranchAndBound;
        let base = StandardForm::from_problem(problem);
        let direction = problem.direction();
        let integer_vars: Vec<usize> = problem
            .integrality()
            .iter()
            .enumerate()
            .filter_map(|(j, &flag)| flag.then_some(j))
            .collect();

        let mut nodes: Vec<SearchNode> = Vec::new();
        let mut trace: Vec<IterationPoint> = Vec::new();
        let mut incumbent: Option<Incumbent> = None;
        let mut stack = vec![PendingNode {
            parent_id: None,
            depth: 0,
            bounds: BTreeMap::new(),
            branch: None,
        }];

        while let Some(pending) = stack.pop() {
            if nodes.len() >= self.max_nodes {
                warn!("branch-and-bound node limit of {} exceeded", self.max_nodes);
                return SolutionReport::error(
                    algorithm,
                    format!("branch-and-bound node limit of {} exceeded", self.max_nodes),
                )
                .with_trace(trace)
                .with_search_tree(nodes);
            }

            let id = nodes.len();
            let mut node = SearchNode {
                id,
                parent_id: pending.parent_id,
                depth: pending.depth,
                fixed_bounds: pending.bounds,
                relaxation: None,
                branch: pending.branch,
                outcome: NodeOutcome::Pruned(PruneReason::EmptyDomain),
            };

            if node.fixed_bounds.values().any(VariableBounds::is_empty) {
                debug!("node {}: empty domain", id);
                nodes.push(node);
                continue;
            }

            let form = node_form(&base, &node.fixed_bounds);
            let mode = if form.is_zero_feasible(self.tolerance) {
                SimplexMode::Primal
            } else {
                SimplexMode::Dual
            };
            let lp = self.run_simplex(&form, mode);
            if self.trace_relaxations {
                let offset = trace.len();
                trace.extend(lp.trace.iter().map(|p| IterationPoint {
                    iteration: offset + p.iteration,
                    objective_value: p.objective_value,
                }));
            }
            node.relaxation = Some(Relaxation::from(&lp));

            match lp.status {
                SolutionStatus::Error => {
                    node.outcome = NodeOutcome::Aborted;
                    nodes.push(node);
                    let message = lp.message.unwrap_or_else(|| "simplex failed".to_string());
                    return SolutionReport::error(algorithm, format!("node {}: {}", id, message))
                        .with_trace(trace)
                        .with_search_tree(nodes);
                }
                SolutionStatus::Unbounded => {
                    debug!("node {}: relaxation unbounded", id);
                    node.outcome = NodeOutcome::Aborted;
                    nodes.push(node);
                    return SolutionReport::unbounded(algorithm)
                        .with_trace(trace)
                        .with_search_tree(nodes);
                }
                SolutionStatus::Infeasible => {
                    node.outcome = NodeOutcome::Pruned(PruneReason::Infeasible);
                }
                SolutionStatus::Optimal => {
                    let bounded_out = incumbent
                        .as_ref()
                        .is_some_and(|best| !direction.is_better(lp.objective_value, best.value, self.tolerance));

                    if bounded_out {
                        node.outcome = NodeOutcome::Pruned(PruneReason::Bound);
                    } else if let Some(var) = self.most_fractional(&lp.values, &integer_vars) {
                        let value = lp.values[var];
                        node.outcome = NodeOutcome::Branched { variable: var, value };
                        // Ceiling first so the floor child is popped first.
                        for (side, bound) in [
                            (BranchDirection::Ceil, value.ceil()),
                            (BranchDirection::Floor, value.floor()),
                        ] {
                            stack.push(PendingNode {
                                parent_id: Some(id),
                                depth: node.depth + 1,
                                bounds: child_bounds(&node.fixed_bounds, var, side, bound),
                                branch: Some(BranchDecision {
                                    variable: var,
                                    direction: side,
                                    bound,
                                }),
                            });
                        }
                    } else {
                        let assignment = snap_integers(&lp.values, &integer_vars);
                        let value = base.objective_value(&assignment);
                        info!("node {}: new incumbent {}", id, value);
                        incumbent = Some(Incumbent { value, assignment });
                        node.outcome = NodeOutcome::IntegralFeasible;
                    }
                }
            }

            debug!("node {} (depth {}): {:?}", id, node.depth, node.outcome);
            nodes.push(node);
        }

        debug!("branch-and-bound explored {} nodes", nodes.len());
        let report = match incumbent {
            Some(best) => SolutionReport::optimal(algorithm, best.value, best.assignment),
            None => SolutionReport::infeasible(algorithm),
        };
        report.with_trace(trace).with_search_tree(nodes)
    }

    /// Integer variable farthest from an integer, ties to the lowest index
    fn most_fractional(&self, values: &[f64], integer_vars: &[usize]) -> Option<usize> {
        let mut max_dev = self.tolerance;
        let mut max_var = None;
        for &j in integer_vars {
            let dev = (values[j] - values[j].round()).abs();
            if dev > max_dev {
                max_dev = dev;
                max_var = Some(j);
            }
        }
        max_var
    }
}

fn child_bounds(
    parent: &BTreeMap<usize, VariableBounds>,
    var: usize,
    direction: BranchDirection,
    bound: f64,
) -> BTreeMap<usize, VariableBounds> {
    let mut bounds = parent.clone();
    let entry = bounds.entry(var).or_default();
    match direction {
        BranchDirection::Floor => {
            entry.upper = Some(entry.upper.map_or(bound, |u| u.min(bound)));
        }
        BranchDirection::Ceil => {
            entry.lower = entry.lower.max(bound);
        }
    }
    bounds
}

fn node_form(base: &StandardForm, bounds: &BTreeMap<usize, VariableBounds>) -> StandardForm {
    let mut form = base.clone();
    for (&var, b) in bounds {
        if b.lower > 0.0 {
            form.push_lower_bound(var, b.lower);
        }
        if let Some(upper) = b.upper {
            form.push_upper_bound(var, upper);
        }
    }
    form
}

fn snap_integers(values: &[f64], integer_vars: &[usize]) -> Vec<f64> {
    let mut snapped = values.to_vec();
    for &j in integer_vars {
        snapped[j] = snapped[j].round();
    }
    snapped
}
