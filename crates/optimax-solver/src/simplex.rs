use log::{debug, trace, warn};

use crate::selector::Algorithm;
use crate::solution::{IterationPoint, SolutionReport, SolutionStatus};
use crate::solver::Solver;
use crate::standard_form::StandardForm;

/// Consecutive degenerate pivots after which Bland's rule takes over
const BLAND_AFTER_DEGENERATE_PIVOTS: usize = 25;

/// How a simplex run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplexMode {
    /// Start from the all-zero vertex and keep primal feasibility
    Primal,
    /// Start from the slack basis and work towards primal feasibility
    Dual,
}

/// Outcome of one simplex run over a [`StandardForm`]
#[derive(Debug, Clone)]
pub(crate) struct LpSolution {
    pub status: SolutionStatus,
    /// Decision variable values (empty unless optimal)
    pub values: Vec<f64>,
    /// Objective in the caller's direction (only meaningful when optimal)
    pub objective_value: f64,
    pub trace: Vec<IterationPoint>,
    pub message: Option<String>,
}

impl LpSolution {
    fn terminal(status: SolutionStatus, trace: Vec<IterationPoint>, message: Option<String>) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value: f64::NAN,
            trace,
            message,
        }
    }

    pub fn iterations(&self) -> usize {
        self.trace.len()
    }

    pub fn into_report(self, algorithm: Algorithm) -> SolutionReport {
        let report = match self.status {
            SolutionStatus::Optimal => SolutionReport::optimal(algorithm, self.objective_value, self.values),
            SolutionStatus::Infeasible => SolutionReport::infeasible(algorithm),
            SolutionStatus::Unbounded => SolutionReport::unbounded(algorithm),
            SolutionStatus::Error => {
                SolutionReport::error(algorithm, self.message.unwrap_or_else(|| "simplex failed".to_string()))
            }
        };
        report.with_trace(self.trace)
    }
}

enum PivotRun {
    /// No further pivot is possible under the current rule
    Converged,
    Infeasible,
    Unbounded,
    IterationLimit,
}

impl Solver {
    /// Solve `min cᵀx` over a standard form.
    ///
    /// Primal mode pivots from the zero vertex. Dual mode runs dual simplex
    /// directly when the costs are dual-feasible at the slack basis. When the
    /// requested start is not available (a primal start that is infeasible,
    /// or a dual start whose costs are not dual-feasible) the dual iterations
    /// run against a zero cost vector until the basis is primal feasible, and
    /// primal simplex finishes with the real costs.
    pub(crate) fn run_simplex(&self, form: &StandardForm, mode: SimplexMode) -> LpSolution {
        let mut tableau = Tableau::new(form, self.tolerance);
        let primal_start = tableau.is_primal_feasible(self.tolerance);
        let dual_start = tableau.is_dual_feasible(self.tolerance);
        debug!(
            "simplex {:?}: {} rows, {} columns, primal feasible start: {}, dual feasible start: {}",
            mode,
            tableau.n_rows(),
            tableau.n_cols(),
            primal_start,
            dual_start
        );

        let first = match mode {
            SimplexMode::Primal if primal_start => PivotRun::Converged,
            SimplexMode::Dual if dual_start => self.dual(&mut tableau, false),
            _ => {
                debug!("simplex {:?}: restoring primal feasibility with zero-cost dual iterations", mode);
                self.dual(&mut tableau, true)
            }
        };

        let run = match first {
            PivotRun::Converged => self.primal(&mut tableau),
            other => other,
        };

        let status = match run {
            PivotRun::Converged => SolutionStatus::Optimal,
            PivotRun::Infeasible => SolutionStatus::Infeasible,
            PivotRun::Unbounded => SolutionStatus::Unbounded,
            PivotRun::IterationLimit => {
                warn!("simplex iteration limit of {} exceeded", self.max_iterations);
                return LpSolution::terminal(
                    SolutionStatus::Error,
                    tableau.trace,
                    Some(format!("simplex iteration limit of {} exceeded", self.max_iterations)),
                );
            }
        };
        debug!("simplex finished: {} after {} pivots", status, tableau.trace.len());

        if status != SolutionStatus::Optimal {
            return LpSolution::terminal(status, tableau.trace, None);
        }

        let values = tableau.values(self.tolerance);
        let objective_value = form.objective_value(&values);
        LpSolution {
            status,
            values,
            objective_value,
            trace: tableau.trace,
            message: None,
        }
    }

    /// Primal simplex: most negative reduced cost enters, minimum ratio leaves.
    fn primal(&self, tableau: &mut Tableau) -> PivotRun {
        loop {
            let bland = tableau.degenerate_streak >= BLAND_AFTER_DEGENERATE_PIVOTS;
            let Some(col) = self.entering_column(tableau, bland) else {
                return PivotRun::Converged;
            };
            let Some(row) = self.leaving_row(tableau, col, bland) else {
                return PivotRun::Unbounded;
            };
            if tableau.trace.len() >= self.max_iterations {
                return PivotRun::IterationLimit;
            }
            let degenerate = tableau.rhs(row) <= self.tolerance;
            tableau.pivot(row, col, degenerate, self.tolerance);
        }
    }

    /// Dual simplex: most infeasible row leaves, dual ratio test picks the
    /// entering column. With `ignore_costs` every reduced cost is read as
    /// zero, which is always dual-feasible.
    fn dual(&self, tableau: &mut Tableau, ignore_costs: bool) -> PivotRun {
        loop {
            let bland = tableau.degenerate_streak >= BLAND_AFTER_DEGENERATE_PIVOTS;
            let Some(row) = self.dual_leaving_row(tableau, bland) else {
                return PivotRun::Converged;
            };
            let Some((col, ratio)) = self.dual_entering_column(tableau, row, ignore_costs) else {
                return PivotRun::Infeasible;
            };
            if tableau.trace.len() >= self.max_iterations {
                return PivotRun::IterationLimit;
            }
            tableau.pivot(row, col, ratio <= self.tolerance, self.tolerance);
        }
    }

    fn entering_column(&self, tableau: &Tableau, bland: bool) -> Option<usize> {
        let costs = tableau.reduced_costs();
        if bland {
            return costs.iter().position(|&d| d < -self.tolerance);
        }

        let mut min_val = -self.tolerance;
        let mut min_col = None;
        for (j, &d) in costs.iter().enumerate() {
            if d < min_val {
                min_val = d;
                min_col = Some(j);
            }
        }
        min_col
    }

    /// Minimum ratio test. Ratios within tolerance of the minimum tie; ties
    /// go to the lowest row, or under Bland's rule to the lowest basic
    /// variable.
    fn leaving_row(&self, tableau: &Tableau, col: usize, bland: bool) -> Option<usize> {
        let candidates: Vec<(usize, f64)> = (0..tableau.n_rows())
            .filter_map(|i| {
                let a = tableau.data[i][col];
                (a > self.tolerance).then(|| (i, tableau.rhs(i).max(0.0) / a))
            })
            .collect();

        let min_ratio = candidates.iter().map(|&(_, r)| r).fold(f64::INFINITY, f64::min);
        let ties = candidates.into_iter().filter(|&(_, r)| r <= min_ratio + self.tolerance);
        if bland {
            ties.min_by_key(|&(i, _)| tableau.basic_vars[i]).map(|(i, _)| i)
        } else {
            ties.map(|(i, _)| i).next()
        }
    }

    fn dual_leaving_row(&self, tableau: &Tableau, bland: bool) -> Option<usize> {
        let infeasible = (0..tableau.n_rows()).filter(|&i| tableau.rhs(i) < -self.tolerance);
        if bland {
            return infeasible.min_by_key(|&i| tableau.basic_vars[i]);
        }

        let mut min_val = f64::INFINITY;
        let mut min_row = None;
        for i in infeasible {
            if tableau.rhs(i) < min_val {
                min_val = tableau.rhs(i);
                min_row = Some(i);
            }
        }
        min_row
    }

    /// Dual ratio test over the negative entries of `row`; ties go to the
    /// lowest column index.
    fn dual_entering_column(&self, tableau: &Tableau, row: usize, ignore_costs: bool) -> Option<(usize, f64)> {
        let costs = tableau.reduced_costs();
        let candidates: Vec<(usize, f64)> = tableau.data[row][..tableau.n_cols()]
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a < -self.tolerance)
            .map(|(j, &a)| {
                let d = if ignore_costs { 0.0 } else { costs[j].max(0.0) };
                (j, d / -a)
            })
            .collect();

        let min_ratio = candidates.iter().map(|&(_, r)| r).fold(f64::INFINITY, f64::min);
        candidates.into_iter().find(|&(_, r)| r <= min_ratio + self.tolerance)
    }
}

/// Dense simplex tableau over decision and slack columns.
///
/// Equality rows are stored as two opposite `<=` rows so every row owns a
/// slack. The last row holds reduced costs with `-z` in the rhs column.
struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    negated: bool,
    trace: Vec<IterationPoint>,
    degenerate_streak: usize,
}

impl Tableau {
    fn new(form: &StandardForm, tolerance: f64) -> Self {
        let n_vars = form.num_variables();
        let mut rows: Vec<(&[f64], f64, f64)> = Vec::new();
        for (a, &b) in form.a_ub.iter().zip(&form.b_ub) {
            rows.push((a.as_slice(), 1.0, b));
        }
        for (a, &b) in form.a_eq.iter().zip(&form.b_eq) {
            rows.push((a.as_slice(), 1.0, b));
            rows.push((a.as_slice(), -1.0, -b));
        }

        let n_rows = rows.len();
        let total_cols = n_vars + n_rows + 1;
        let mut data = vec![vec![0.0; total_cols]; n_rows + 1];
        let mut basic_vars = Vec::with_capacity(n_rows);

        for (i, (a, sign, b)) in rows.into_iter().enumerate() {
            for (j, &coef) in a.iter().enumerate() {
                data[i][j] = sign * coef;
            }
            data[i][n_vars + i] = 1.0;
            // Noise around zero must not read as infeasibility.
            data[i][total_cols - 1] = if b < 0.0 && b > -tolerance { 0.0 } else { b };
            basic_vars.push(n_vars + i);
        }

        data[n_rows][..n_vars].copy_from_slice(&form.cost);

        Self {
            data,
            basic_vars,
            n_vars,
            negated: form.negated,
            trace: Vec::new(),
            degenerate_streak: 0,
        }
    }

    fn n_rows(&self) -> usize {
        self.data.len() - 1
    }

    /// Number of variable columns (decision plus slack)
    fn n_cols(&self) -> usize {
        self.data[0].len() - 1
    }

    fn rhs(&self, row: usize) -> f64 {
        self.data[row][self.n_cols()]
    }

    fn reduced_costs(&self) -> &[f64] {
        &self.data[self.n_rows()][..self.n_cols()]
    }

    /// Internal (minimization) objective of the current basic solution
    fn objective(&self) -> f64 {
        -self.data[self.n_rows()][self.n_cols()]
    }

    fn is_primal_feasible(&self, tolerance: f64) -> bool {
        (0..self.n_rows()).all(|i| self.rhs(i) >= -tolerance)
    }

    fn is_dual_feasible(&self, tolerance: f64) -> bool {
        self.reduced_costs().iter().all(|&d| d >= -tolerance)
    }

    fn pivot(&mut self, row: usize, col: usize, degenerate: bool, tolerance: f64) {
        let n_rows = self.data.len();
        let n_cols = self.data[0].len();

        trace!(
            "pivot {}: x{} enters, x{} leaves (row {})",
            self.trace.len() + 1,
            col,
            self.basic_vars[row],
            row
        );
        self.basic_vars[row] = col;

        let pivot_val = self.data[row][col];
        for j in 0..n_cols {
            self.data[row][j] /= pivot_val;
        }

        let pivot_row = self.data[row].clone();
        for i in 0..n_rows {
            if i != row {
                let factor = self.data[i][col];
                if factor != 0.0 {
                    for j in 0..n_cols {
                        self.data[i][j] -= factor * pivot_row[j];
                    }
                }
            }
        }

        for i in 0..self.n_rows() {
            let rhs = &mut self.data[i][n_cols - 1];
            if *rhs < 0.0 && *rhs > -tolerance {
                *rhs = 0.0;
            }
        }

        self.degenerate_streak = if degenerate { self.degenerate_streak + 1 } else { 0 };

        let internal = self.objective();
        self.trace.push(IterationPoint {
            iteration: self.trace.len() + 1,
            objective_value: if self.negated { -internal } else { internal },
        });
    }

    fn values(&self, tolerance: f64) -> Vec<f64> {
        let mut values = vec![0.0; self.n_vars];
        for (i, &basic) in self.basic_vars.iter().enumerate() {
            if basic < self.n_vars {
                let v = self.rhs(i);
                values[basic] = if v.abs() <= tolerance { 0.0 } else { v };
            }
        }
        values
    }
}
