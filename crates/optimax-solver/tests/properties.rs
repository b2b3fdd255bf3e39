use approx::assert_abs_diff_eq;
use optimax_solver::{Algorithm, Constraint, Direction, Problem, SolutionStatus, Solver};
use proptest::prelude::*;

/// Random bounded LPs: non-negative `<=` rows plus a box row per variable,
/// and an optional `>=` row that may push the start away from zero.
fn bounded_problem() -> impl Strategy<Value = Problem> {
    (1usize..4, 1usize..4).prop_flat_map(|(n, m)| {
        (
            prop::collection::vec(-5i32..6, n),
            prop::collection::vec(prop::collection::vec(0i32..6, n), m),
            prop::collection::vec(1i32..20, m),
            prop::option::of(1i32..4),
            any::<bool>(),
        )
            .prop_map(move |(objective, rows, rhs, lower, maximize)| {
                let mut constraints: Vec<Constraint> = rows
                    .into_iter()
                    .zip(rhs)
                    .map(|(row, b)| Constraint::le(row.into_iter().map(f64::from).collect(), f64::from(b)))
                    .collect();
                for j in 0..n {
                    let mut unit = vec![0.0; n];
                    unit[j] = 1.0;
                    constraints.push(Constraint::le(unit, 10.0));
                }
                if let Some(lower) = lower {
                    constraints.push(Constraint::ge(vec![1.0; n], f64::from(lower)));
                }
                let direction = if maximize { Direction::Maximize } else { Direction::Minimize };
                Problem::continuous(direction, objective.into_iter().map(f64::from).collect(), constraints).unwrap()
            })
    })
}

fn with_integrality(problem: &Problem, flags: Vec<bool>) -> Problem {
    Problem::new(
        problem.direction(),
        problem.objective().to_vec(),
        problem.constraints().to_vec(),
        flags,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn primal_dual_and_branch_and_bound_agree_on_lps(problem in bounded_problem()) {
        let solver = Solver::new();
        let primal = solver.solve_with(&problem, Algorithm::Simplex);
        let dual = solver.solve_with(&problem, Algorithm::DualSimplex);
        let bnb = solver.solve_with(&problem, Algorithm::BranchAndBound);

        prop_assert_eq!(primal.status, dual.status);
        prop_assert_eq!(primal.status, bnb.status);
        if primal.status == SolutionStatus::Optimal {
            let value = primal.optimal_value.unwrap();
            prop_assert!((value - dual.optimal_value.unwrap()).abs() < 1e-6);
            prop_assert!((value - bnb.optimal_value.unwrap()).abs() < 1e-6);
            prop_assert!(problem.is_feasible(primal.assignment.as_ref().unwrap(), 1e-6));
            prop_assert!(problem.is_feasible(dual.assignment.as_ref().unwrap(), 1e-6));
            prop_assert_eq!(bnb.node_count(), 1);
        }
    }

    #[test]
    fn flipping_direction_negates_value(problem in bounded_problem()) {
        let negated: Vec<f64> = problem.objective().iter().map(|c| -c).collect();
        let flipped = problem.with_direction(problem.direction().flipped(), negated).unwrap();

        let solver = Solver::new();
        let original = solver.solve(&problem);
        let mirrored = solver.solve(&flipped);

        prop_assert_eq!(original.status, mirrored.status);
        if original.status == SolutionStatus::Optimal {
            prop_assert!((original.optimal_value.unwrap() + mirrored.optimal_value.unwrap()).abs() < 1e-6);
            let a = original.assignment.unwrap();
            let b = mirrored.assignment.unwrap();
            for (x, y) in a.iter().zip(&b) {
                prop_assert!((x - y).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn solving_twice_is_identical(problem in bounded_problem(), first_integer in any::<bool>()) {
        let mut flags = vec![false; problem.num_variables()];
        flags[0] = first_integer;
        let problem = with_integrality(&problem, flags);

        let solver = Solver::new();
        prop_assert_eq!(solver.solve(&problem), solver.solve(&problem));
    }

    #[test]
    fn incumbent_never_beats_root_relaxation(problem in bounded_problem()) {
        let problem = with_integrality(&problem, vec![true; problem.num_variables()]);
        let report = Solver::new().solve(&problem);

        if report.status == SolutionStatus::Optimal {
            let nodes = report.search_tree.as_ref().unwrap();
            let root = nodes[0].relaxation.as_ref().unwrap().objective_value.unwrap();
            let best = report.optimal_value.unwrap();
            match problem.direction() {
                Direction::Maximize => prop_assert!(best <= root + 1e-6),
                Direction::Minimize => prop_assert!(best >= root - 1e-6),
            }
            let assignment = report.assignment.as_ref().unwrap();
            prop_assert!(assignment.iter().all(|v| *v == v.round()));
            prop_assert!(problem.is_feasible(assignment, 1e-5));
        }
    }
}

#[test]
fn relaxed_paths_cross_check_on_fixed_problem() {
    let problem = Problem::continuous(
        Direction::Minimize,
        vec![2.0, 3.0, 1.0],
        vec![
            Constraint::ge(vec![1.0, 1.0, 1.0], 6.0),
            Constraint::le(vec![1.0, 0.0, 2.0], 8.0),
            Constraint::eq(vec![0.0, 1.0, -1.0], 1.0),
        ],
    )
    .unwrap();

    let solver = Solver::new();
    let values: Vec<f64> = [Algorithm::Simplex, Algorithm::DualSimplex, Algorithm::BranchAndBound]
        .into_iter()
        .map(|algorithm| solver.solve_with(&problem, algorithm).optimal_value.unwrap())
        .collect();
    assert_abs_diff_eq!(values[0], values[1], epsilon = 1e-6);
    assert_abs_diff_eq!(values[0], values[2], epsilon = 1e-6);
}
