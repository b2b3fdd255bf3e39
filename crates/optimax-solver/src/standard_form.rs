use crate::problem::{Direction, Problem, Relation};

/// A problem rewritten as `min cᵀx` subject to `A_ub x ≤ b_ub`,
/// `A_eq x = b_eq` and `x ≥ 0`.
///
/// Maximization objectives are negated on the way in; `negated` records the
/// flip so values can be reported in the caller's direction.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardForm {
    /// Cost vector of the internal minimization
    pub cost: Vec<f64>,
    pub a_ub: Vec<Vec<f64>>,
    pub b_ub: Vec<f64>,
    pub a_eq: Vec<Vec<f64>>,
    pub b_eq: Vec<f64>,
    /// True when the original objective was maximized
    pub negated: bool,
}

impl StandardForm {
    pub fn from_problem(problem: &Problem) -> Self {
        let negated = problem.direction() == Direction::Maximize;
        let cost = if negated {
            problem.objective().iter().map(|c| -c).collect()
        } else {
            problem.objective().to_vec()
        };

        let mut form = Self {
            cost,
            a_ub: Vec::new(),
            b_ub: Vec::new(),
            a_eq: Vec::new(),
            b_eq: Vec::new(),
            negated,
        };

        for c in problem.constraints() {
            form.push_row(c.coefficients.clone(), c.relation, c.rhs);
        }

        form
    }

    /// Route a row by its relation: `>=` rows are negated into `<=` rows.
    pub fn push_row(&mut self, coefficients: Vec<f64>, relation: Relation, rhs: f64) {
        match relation {
            Relation::Le => {
                self.a_ub.push(coefficients);
                self.b_ub.push(rhs);
            }
            Relation::Ge => {
                self.a_ub.push(coefficients.into_iter().map(|a| -a).collect());
                self.b_ub.push(-rhs);
            }
            Relation::Eq => {
                self.a_eq.push(coefficients);
                self.b_eq.push(rhs);
            }
        }
    }

    /// Add `x[var] <= upper`
    pub fn push_upper_bound(&mut self, var: usize, upper: f64) {
        let row = self.unit_row(var);
        self.push_row(row, Relation::Le, upper);
    }

    /// Add `x[var] >= lower`
    pub fn push_lower_bound(&mut self, var: usize, lower: f64) {
        let row = self.unit_row(var);
        self.push_row(row, Relation::Ge, lower);
    }

    fn unit_row(&self, var: usize) -> Vec<f64> {
        let mut row = vec![0.0; self.num_variables()];
        row[var] = 1.0;
        row
    }

    pub fn num_variables(&self) -> usize {
        self.cost.len()
    }

    /// Whether `x = 0` satisfies every row. Inequalities are checked
    /// exactly, equalities within `tolerance`.
    pub fn is_zero_feasible(&self, tolerance: f64) -> bool {
        self.b_ub.iter().all(|&b| b >= 0.0) && self.b_eq.iter().all(|b| b.abs() <= tolerance)
    }

    /// Internal (minimization) objective at `x`
    pub fn internal_objective(&self, x: &[f64]) -> f64 {
        self.cost.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Convert an internal objective value back to the caller's direction.
    pub fn to_reported(&self, internal: f64) -> f64 {
        if self.negated { -internal } else { internal }
    }

    /// Objective at `x` in the caller's direction
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.to_reported(self.internal_objective(x))
    }
}
