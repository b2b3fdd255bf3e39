use std::fmt::Write;

use optimax_solver::{BranchDirection, NodeOutcome, PruneReason, SearchNode, SolutionReport};

/// Human-readable summary of a report
pub fn format_solution(report: &SolutionReport) -> String {
    let vars = match &report.assignment {
        Some(values) => values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("x{} = {:.2}", i, v))
            .collect::<Vec<_>>()
            .join(", "),
        None => "No variable assignments available.".to_string(),
    };
    let value = match report.optimal_value {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    };

    let mut out = format!("Status: {}\nOptimal Value: {}\nVariables: {}", report.status, value, vars);
    if let Some(message) = &report.message {
        let _ = write!(out, "\nMessage: {}", message);
    }
    out
}

/// Indented text rendering of a branch-and-bound tree, one node per line
pub fn format_search_tree(nodes: &[SearchNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        let indent = "  ".repeat(node.depth);
        let split = match node.branch {
            Some(b) => match b.direction {
                BranchDirection::Floor => format!("x{} <= {}", b.variable, b.bound),
                BranchDirection::Ceil => format!("x{} >= {}", b.variable, b.bound),
            },
            None => "root".to_string(),
        };
        let bound = node
            .relaxation
            .as_ref()
            .and_then(|r| r.objective_value)
            .map(|v| format!(" z={:.4}", v))
            .unwrap_or_default();
        let outcome = match node.outcome {
            NodeOutcome::Pruned(PruneReason::Infeasible) => "pruned (infeasible)".to_string(),
            NodeOutcome::Pruned(PruneReason::Bound) => "pruned (bound)".to_string(),
            NodeOutcome::Pruned(PruneReason::EmptyDomain) => "pruned (empty domain)".to_string(),
            NodeOutcome::IntegralFeasible => "integral".to_string(),
            NodeOutcome::Branched { variable, value } => format!("branch on x{} = {:.4}", variable, value),
            NodeOutcome::Aborted => "aborted".to_string(),
        };
        let _ = writeln!(out, "{}#{} [{}]{} -> {}", indent, node.id, split, bound, outcome);
    }
    out
}

/// Pretty JSON for plotting or export
pub fn report_to_json(report: &SolutionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_problem;
    use optimax_solver::{Algorithm, Solver};

    #[test]
    fn test_format_optimal() {
        let report = SolutionReport::optimal(Algorithm::Simplex, 26.0, vec![4.0, 2.0]);
        assert_eq!(
            format_solution(&report),
            "Status: Optimal\nOptimal Value: 26.00\nVariables: x0 = 4.00, x1 = 2.00"
        );
    }

    #[test]
    fn test_format_without_solution() {
        let report = SolutionReport::infeasible(Algorithm::DualSimplex);
        assert_eq!(
            format_solution(&report),
            "Status: Infeasible\nOptimal Value: N/A\nVariables: No variable assignments available."
        );

        let report = SolutionReport::error(Algorithm::BranchAndBound, "node limit");
        assert!(format_solution(&report).ends_with("Message: node limit"));
    }

    #[test]
    fn test_search_tree_rendering() {
        let problem = load_problem(
            r#"{"objetivo": "maximizar", "funcion_objetivo": [5, 4],
                "restricciones": [
                    {"coeficientes": [6, 4], "signo": "<=", "valor": 24},
                    {"coeficientes": [1, 2], "signo": "<=", "valor": 6}
                ],
                "variables_enteras": [true, true]}"#,
        )
        .unwrap();
        let report = Solver::new().solve(&problem);
        let text = format_search_tree(report.search_tree.as_ref().unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "#0 [root] z=21.0000 -> branch on x1 = 1.5000");
        assert!(lines[1].starts_with("  #1 [x1 <= 1]"));
        assert!(lines[4].ends_with("pruned (bound)"));
    }

    #[test]
    fn test_report_json() {
        let report = SolutionReport::optimal(Algorithm::Simplex, 26.0, vec![4.0, 2.0]);
        let json = report_to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "optimal");
        assert_eq!(value["algorithm"], "simplex");
        assert_eq!(value["optimal_value"], 26.0);
        assert_eq!(value["assignment"][1], 2.0);
    }
}
