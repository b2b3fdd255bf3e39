use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Structural errors detected while building a [`Problem`].
///
/// These are raised before any solving begins; a problem that fails
/// construction is never handed to the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Malformed problem: objective has {objective} coefficients but {integrality} integrality flags were given")]
    IntegralityMismatch { objective: usize, integrality: usize },
    #[error("Malformed problem: constraint {index} has {found} coefficients, expected {expected}")]
    ConstraintDimension {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Malformed problem: non-finite value in {0}")]
    NonFinite(String),
    #[error("Malformed constraint: unsupported relation '{0}'")]
    MalformedConstraint(String),
}

/// Optimization direction
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Whether `candidate` improves on `reference` by more than `tolerance`.
    pub fn is_better(self, candidate: f64, reference: f64, tolerance: f64) -> bool {
        match self {
            Direction::Maximize => candidate > reference + tolerance,
            Direction::Minimize => candidate < reference - tolerance,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Maximize => Direction::Minimize,
            Direction::Minimize => Direction::Maximize,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Maximize => write!(f, "maximize"),
            Direction::Minimize => write!(f, "minimize"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    /// Equal (==)
    #[cfg_attr(feature = "serde", serde(rename = "=="))]
    Eq,
}

impl Relation {
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Relation {
    type Err = ProblemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" => Ok(Relation::Le),
            ">=" => Ok(Relation::Ge),
            "==" | "=" => Ok(Relation::Eq),
            other => Err(ProblemError::MalformedConstraint(other.to_string())),
        }
    }
}

/// A single linear constraint `coefficients · x (relation) rhs`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub relation: Relation,
    /// Right-hand side value
    pub rhs: f64,
}

impl Constraint {
    pub fn new(coefficients: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self {
            coefficients,
            relation,
            rhs,
        }
    }

    pub fn le(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, Relation::Le, rhs)
    }

    pub fn ge(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, Relation::Ge, rhs)
    }

    pub fn eq(coefficients: Vec<f64>, rhs: f64) -> Self {
        Self::new(coefficients, Relation::Eq, rhs)
    }

    /// Left-hand side evaluated at `x`
    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum()
    }

    /// Whether `x` satisfies the constraint within `tolerance`.
    pub fn is_satisfied_by(&self, x: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(x);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// A validated linear or mixed-integer linear program.
///
/// All decision variables are implicitly bounded below by zero. Once built
/// the problem is read-only; use [`Problem::relaxation`] or
/// [`Problem::with_direction`] to derive variants.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    direction: Direction,
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
    integrality: Vec<bool>,
}

impl Problem {
    pub fn new(
        direction: Direction,
        objective: Vec<f64>,
        constraints: Vec<Constraint>,
        integrality: Vec<bool>,
    ) -> Result<Self, ProblemError> {
        let n = objective.len();
        if integrality.len() != n {
            return Err(ProblemError::IntegralityMismatch {
                objective: n,
                integrality: integrality.len(),
            });
        }
        if objective.iter().any(|c| !c.is_finite()) {
            return Err(ProblemError::NonFinite("objective".to_string()));
        }
        for (index, c) in constraints.iter().enumerate() {
            if c.coefficients.len() != n {
                return Err(ProblemError::ConstraintDimension {
                    index,
                    expected: n,
                    found: c.coefficients.len(),
                });
            }
            if !c.rhs.is_finite() || c.coefficients.iter().any(|a| !a.is_finite()) {
                return Err(ProblemError::NonFinite(format!("constraint {}", index)));
            }
        }

        Ok(Self {
            direction,
            objective,
            constraints,
            integrality,
        })
    }

    /// A problem with no integer-restricted variables
    pub fn continuous(
        direction: Direction,
        objective: Vec<f64>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, ProblemError> {
        let n = objective.len();
        Self::new(direction, objective, constraints, vec![false; n])
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn integrality(&self) -> &[bool] {
        &self.integrality
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn has_integer_variables(&self) -> bool {
        self.integrality.iter().any(|&flag| flag)
    }

    /// Objective value of `x` in the problem's own direction
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Whether `x` is non-negative and satisfies every constraint.
    pub fn is_feasible(&self, x: &[f64], tolerance: f64) -> bool {
        x.len() == self.num_variables()
            && x.iter().all(|&v| v >= -tolerance)
            && self.constraints.iter().all(|c| c.is_satisfied_by(x, tolerance))
    }

    /// The same problem with every integrality flag cleared
    pub fn relaxation(&self) -> Problem {
        Problem {
            integrality: vec![false; self.num_variables()],
            ..self.clone()
        }
    }

    /// The same constraints with a different direction and objective.
    pub fn with_direction(&self, direction: Direction, objective: Vec<f64>) -> Result<Problem, ProblemError> {
        Problem::new(
            direction,
            objective,
            self.constraints.clone(),
            self.integrality.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrality_mismatch_is_rejected() {
        let err = Problem::new(
            Direction::Maximize,
            vec![1.0, 2.0],
            vec![],
            vec![true],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProblemError::IntegralityMismatch {
                objective: 2,
                integrality: 1
            }
        );
    }

    #[test]
    fn test_constraint_dimension_is_rejected() {
        let err = Problem::continuous(
            Direction::Minimize,
            vec![1.0, 2.0],
            vec![Constraint::le(vec![1.0, 1.0], 4.0), Constraint::ge(vec![1.0], 1.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProblemError::ConstraintDimension {
                index: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let err = Problem::continuous(Direction::Minimize, vec![f64::NAN], vec![]).unwrap_err();
        assert!(matches!(err, ProblemError::NonFinite(_)));

        let err = Problem::continuous(
            Direction::Minimize,
            vec![1.0],
            vec![Constraint::le(vec![1.0], f64::INFINITY)],
        )
        .unwrap_err();
        assert_eq!(err, ProblemError::NonFinite("constraint 0".to_string()));
    }

    #[test]
    fn test_relation_parsing() {
        assert_eq!("<=".parse::<Relation>().unwrap(), Relation::Le);
        assert_eq!(" >= ".parse::<Relation>().unwrap(), Relation::Ge);
        assert_eq!("==".parse::<Relation>().unwrap(), Relation::Eq);
        assert_eq!("=".parse::<Relation>().unwrap(), Relation::Eq);
        assert_eq!(
            "<>".parse::<Relation>().unwrap_err(),
            ProblemError::MalformedConstraint("<>".to_string())
        );
    }

    #[test]
    fn test_relaxation_clears_integrality() {
        let problem = Problem::new(
            Direction::Maximize,
            vec![5.0, 3.0],
            vec![Constraint::le(vec![2.0, 1.0], 10.0)],
            vec![true, false],
        )
        .unwrap();
        assert!(problem.has_integer_variables());
        let relaxed = problem.relaxation();
        assert!(!relaxed.has_integer_variables());
        assert_eq!(relaxed.constraints(), problem.constraints());
    }

    #[test]
    fn test_feasibility_check() {
        let problem = Problem::continuous(
            Direction::Maximize,
            vec![5.0, 3.0],
            vec![
                Constraint::le(vec![2.0, 1.0], 10.0),
                Constraint::eq(vec![1.0, -1.0], 2.0),
            ],
        )
        .unwrap();
        assert!(problem.is_feasible(&[4.0, 2.0], 1e-6));
        assert!(!problem.is_feasible(&[5.0, 3.0], 1e-6));
        assert!(!problem.is_feasible(&[-1.0, -3.0], 1e-6));
        assert_eq!(problem.evaluate(&[4.0, 2.0]), 26.0);
    }
}
