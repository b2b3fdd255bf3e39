//! WASM bindings for the optimax solver
//!
//! JavaScript-friendly entry points taking the JSON problem document as a
//! string, for use in browser front ends.

use wasm_bindgen::prelude::*;

use crate::document::{LoadError, ProblemDocument};
use optimax_solver::Solver;

/// Solve a JSON problem document and return the full report
#[wasm_bindgen]
pub fn solve(source: &str) -> Result<JsValue, JsValue> {
    let problem = crate::load_problem(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let report = Solver::new().solve(&problem);
    serde_wasm_bindgen::to_value(&report).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Name of the strategy the selector would use
#[wasm_bindgen]
pub fn select(source: &str) -> Result<String, JsValue> {
    let problem = crate::load_problem(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(Solver::new().select(&problem).to_string())
}

/// Validate a document and return diagnostics as JSON
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    let diagnostics = get_diagnostics(source);
    serde_wasm_bindgen::to_value(&diagnostics).unwrap_or(JsValue::NULL)
}

#[derive(serde::Serialize)]
struct Diagnostic {
    line: usize,
    column: usize,
    severity: String,
    message: String,
}

fn get_diagnostics(source: &str) -> Vec<Diagnostic> {
    let result = ProblemDocument::from_json(source).and_then(ProblemDocument::into_problem);
    match result {
        Ok(_) => Vec::new(),
        Err(LoadError::Json(e)) => vec![Diagnostic {
            line: e.line(),
            column: e.column(),
            severity: "error".to_string(),
            message: e.to_string(),
        }],
        Err(e) => vec![Diagnostic {
            line: 0,
            column: 0,
            severity: "error".to_string(),
            message: e.to_string(),
        }],
    }
}
