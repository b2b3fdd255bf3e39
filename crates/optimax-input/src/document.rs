use std::path::Path;

use optimax_solver::{Constraint, Direction, Problem, ProblemError, Relation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown objective '{0}' (expected maximizar or minimizar)")]
    UnknownObjective(String),
    #[error(transparent)]
    Problem(#[from] ProblemError),
}

/// A problem description as written in a JSON file.
///
/// Keys use the Spanish names of the established file format; English
/// aliases are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDocument {
    /// `maximizar` or `minimizar`
    #[serde(rename = "objetivo", alias = "objective")]
    pub objective: String,
    #[serde(rename = "funcion_objetivo", alias = "objective_function")]
    pub objective_function: Vec<f64>,
    #[serde(rename = "restricciones", alias = "constraints", default)]
    pub constraints: Vec<ConstraintDocument>,
    /// Omitted means every variable is continuous
    #[serde(
        rename = "variables_enteras",
        alias = "integer_variables",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub integer_variables: Option<Vec<bool>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDocument {
    #[serde(rename = "coeficientes", alias = "coefficients")]
    pub coefficients: Vec<f64>,
    /// `<=`, `>=` or `==`
    #[serde(rename = "signo", alias = "sign")]
    pub sign: String,
    #[serde(rename = "valor", alias = "value")]
    pub value: f64,
}

impl ProblemDocument {
    pub fn from_json(source: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn direction(&self) -> Result<Direction, LoadError> {
        match self.objective.trim().to_lowercase().as_str() {
            "maximizar" | "maximize" | "max" => Ok(Direction::Maximize),
            "minimizar" | "minimize" | "min" => Ok(Direction::Minimize),
            _ => Err(LoadError::UnknownObjective(self.objective.clone())),
        }
    }

    /// Validate the document and build the solver's problem
    pub fn into_problem(self) -> Result<Problem, LoadError> {
        let direction = self.direction()?;
        let n = self.objective_function.len();

        let constraints = self
            .constraints
            .into_iter()
            .map(|c| {
                let relation: Relation = c.sign.parse()?;
                Ok(Constraint::new(c.coefficients, relation, c.value))
            })
            .collect::<Result<Vec<_>, ProblemError>>()?;

        let integrality = self.integer_variables.unwrap_or_else(|| vec![false; n]);
        Ok(Problem::new(direction, self.objective_function, constraints, integrality)?)
    }
}

/// Parse and validate a JSON problem document
pub fn load_problem(source: &str) -> Result<Problem, LoadError> {
    ProblemDocument::from_json(source)?.into_problem()
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Problem, LoadError> {
    let source = std::fs::read_to_string(path)?;
    load_problem(&source)
}
