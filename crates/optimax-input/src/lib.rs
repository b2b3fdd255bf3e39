pub mod document;
pub mod format;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use document::{load_file, load_problem, ConstraintDocument, LoadError, ProblemDocument};
pub use format::{format_search_tree, format_solution, report_to_json};
