use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::path::PathBuf;

use optimax_solver::{Algorithm, Problem, SolutionStatus, Solver};

#[derive(Parser)]
#[command(name = "optimax")]
#[command(about = "Solve linear and mixed-integer programs described in JSON", long_about = None)]
struct Cli {
    /// Log solver progress (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Select an algorithm, solve, and print the solution
    Solve {
        /// The JSON problem file
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Force a strategy (simplex, dual_simplex, branch_and_bound)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,
        /// Maximum pivots per simplex run
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Maximum branch-and-bound nodes
        #[arg(long)]
        max_nodes: Option<usize>,
        /// Tolerance for comparisons against zero (finite, not negative)
        #[arg(long, value_parser = parse_tolerance)]
        tolerance: Option<f64>,
        /// Print the iteration trace and, for branch-and-bound, the search tree
        #[arg(short, long)]
        trace: bool,
    },
    /// Print the algorithm the selector picks for a problem
    Select {
        /// The JSON problem file
        file: PathBuf,
    },
    /// Check a problem file for errors
    Check {
        /// The JSON problem file
        file: PathBuf,
    },
}

fn parse_tolerance(s: &str) -> Result<f64, String> {
    let tol: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if !tol.is_finite() || tol < 0.0 {
        return Err(format!("tolerance must be a finite, non-negative number (got {})", s));
    }
    Ok(tol)
}

fn load(file: &PathBuf) -> Problem {
    match optimax_input::load_file(file) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match cli.command {
        Commands::Solve {
            file,
            format,
            algorithm,
            max_iterations,
            max_nodes,
            tolerance,
            trace,
        } => {
            let problem = load(&file);

            let mut solver = Solver::new().with_relaxation_traces(trace);
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }
            if let Some(max) = max_nodes {
                solver = solver.with_max_nodes(max);
            }
            if let Some(tol) = tolerance {
                solver = solver.with_tolerance(tol);
            }

            let algorithm = algorithm.unwrap_or_else(|| solver.select(&problem));
            debug!("solver configuration: {:?}", solver);
            let report = solver.solve_with(&problem, algorithm);

            match format {
                OutputFormat::Json => match optimax_input::report_to_json(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing report: {}", e);
                        std::process::exit(1);
                    }
                },
                OutputFormat::Text => {
                    println!("Selected algorithm: {}", algorithm);
                    println!("{}", optimax_input::format_solution(&report));

                    if trace {
                        if !report.iteration_trace.is_empty() {
                            println!();
                            println!("Iterations:");
                            for point in &report.iteration_trace {
                                println!("  {:5} {:14.6}", point.iteration, point.objective_value);
                            }
                        }
                        if let Some(ref nodes) = report.search_tree {
                            println!();
                            println!("Search tree ({} nodes):", nodes.len());
                            print!("{}", optimax_input::format_search_tree(nodes));
                        }
                    }
                }
            }

            if report.status != SolutionStatus::Optimal {
                std::process::exit(1);
            }
        }
        Commands::Select { file } => {
            let problem = load(&file);
            println!("{}", Solver::new().select(&problem));
        }
        Commands::Check { file } => {
            let problem = load(&file);
            let integers = problem.integrality().iter().filter(|&&flag| flag).count();

            println!("✓ {} is valid", file.display());
            println!("  {} ({} variables)", problem.direction(), problem.num_variables());
            println!("  {} constraints", problem.num_constraints());
            println!("  {} integer variables", integers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tolerance() {
        assert_eq!(parse_tolerance("1e-8"), Ok(1e-8));
        assert_eq!(parse_tolerance("0"), Ok(0.0));
        assert!(parse_tolerance("-1e-6").is_err());
        assert!(parse_tolerance("NaN").is_err());
        assert!(parse_tolerance("inf").is_err());
        assert!(parse_tolerance("tiny").is_err());
    }

    #[test]
    fn test_cli_rejects_negative_tolerance() {
        let err = Cli::try_parse_from(["optimax", "solve", "problem.json", "--tolerance=-0.5"]);
        assert!(err.is_err());

        let cli = Cli::try_parse_from(["optimax", "solve", "problem.json", "--tolerance", "1e-9"]).unwrap();
        match cli.command {
            Commands::Solve { tolerance, .. } => assert_eq!(tolerance, Some(1e-9)),
            _ => panic!("expected solve"),
        }
    }
}
