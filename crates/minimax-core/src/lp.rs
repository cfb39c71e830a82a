//! Linear programming boundary.
//!
//! The elicitation core never solves linear programs itself: it describes a
//! [`LinearProgram`] and hands it to an [`LpSolver`]. Solvers must be
//! stateless between calls, since PMR solves run concurrently.

use std::fmt::{self, Debug};

use thiserror::Error;
use tracing::trace;

/// Comparison operator of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComparisonOp {
    Le,
    Eq,
    Ge,
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOp::Le => write!(f, "≤"),
            ComparisonOp::Eq => write!(f, "="),
            ComparisonOp::Ge => write!(f, "≥"),
        }
    }
}

/// `Σ coefficients[i] * x_i  op  rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub coefficients: Vec<f64>,
    pub op: ComparisonOp,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(coefficients: Vec<f64>, op: ComparisonOp, rhs: f64) -> Self {
        LinearConstraint {
            coefficients,
            op,
            rhs,
        }
    }

    /// Returns true if `point` satisfies the constraint up to `tolerance`.
    pub fn is_satisfied_by(&self, point: &[f64], tolerance: f64) -> bool {
        let lhs: f64 = self
            .coefficients
            .iter()
            .zip(point)
            .map(|(c, x)| c * x)
            .sum();
        match self.op {
            ComparisonOp::Le => lhs <= self.rhs + tolerance,
            ComparisonOp::Eq => (lhs - self.rhs).abs() <= tolerance,
            ComparisonOp::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// A maximization problem over bounded real variables.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearProgram {
    /// `(lower, upper)` per variable; infinite bounds are allowed.
    pub bounds: Vec<(f64, f64)>,
    pub constraints: Vec<LinearConstraint>,
    /// Coefficient per variable of the maximized objective.
    pub objective: Vec<f64>,
}

impl LinearProgram {
    pub fn variable_count(&self) -> usize {
        self.bounds.len()
    }
}

/// Optimal value together with a point reaching it.
#[derive(Clone, Debug, PartialEq)]
pub struct LpSolution {
    pub objective: f64,
    pub point: Vec<f64>,
}

/// Failure reported by the LP layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LpError {
    #[error("problem is infeasible")]
    Infeasible,

    #[error("problem is unbounded")]
    Unbounded,

    #[error("solver failure: {0}")]
    Solver(String),
}

/// Black-box linear programming service.
pub trait LpSolver: Send + Sync + Debug {
    /// Maximizes `program.objective` subject to the constraints and bounds.
    fn maximize(&self, program: &LinearProgram) -> Result<LpSolution, LpError>;

    /// Minimizes `program.objective`.
    fn minimize(&self, program: &LinearProgram) -> Result<LpSolution, LpError> {
        let negated = LinearProgram {
            bounds: program.bounds.clone(),
            constraints: program.constraints.clone(),
            objective: program.objective.iter().map(|c| -c).collect(),
        };
        let solution = self.maximize(&negated)?;
        Ok(LpSolution {
            objective: -solution.objective,
            point: solution.point,
        })
    }
}

/// [`LpSolver`] backed by the `minilp` dense simplex.
///
/// A fresh `minilp::Problem` is built for every call, so one instance can be
/// shared freely across threads.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinilpSolver;

impl MinilpSolver {
    pub fn new() -> Self {
        MinilpSolver
    }
}

impl LpSolver for MinilpSolver {
    fn maximize(&self, program: &LinearProgram) -> Result<LpSolution, LpError> {
        let n = program.variable_count();
        if program.objective.len() != n {
            return Err(LpError::Solver(format!(
                "objective has {} coefficients for {} variables",
                program.objective.len(),
                n
            )));
        }

        let mut problem = minilp::Problem::new(minilp::OptimizationDirection::Maximize);
        let vars: Vec<minilp::Variable> = program
            .objective
            .iter()
            .zip(&program.bounds)
            .map(|(&c, &bounds)| problem.add_var(c, bounds))
            .collect();

        for constraint in &program.constraints {
            if constraint.coefficients.len() != n {
                return Err(LpError::Solver(format!(
                    "constraint has {} coefficients for {} variables",
                    constraint.coefficients.len(),
                    n
                )));
            }
            let mut expr = minilp::LinearExpr::empty();
            for (var, &coefficient) in vars.iter().zip(&constraint.coefficients) {
                if coefficient != 0.0 {
                    expr.add(*var, coefficient);
                }
            }
            let op = match constraint.op {
                ComparisonOp::Le => minilp::ComparisonOp::Le,
                ComparisonOp::Eq => minilp::ComparisonOp::Eq,
                ComparisonOp::Ge => minilp::ComparisonOp::Ge,
            };
            problem.add_constraint(expr, op, constraint.rhs);
        }

        // minilp can report an unbounded ray as an optimum of infinite value.
        match problem.solve() {
            Ok(solution) if !solution.objective().is_finite() => {
                trace!(event = "lp_unbounded", objective = solution.objective());
                Err(LpError::Unbounded)
            }
            Ok(solution) => {
                let point: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
                trace!(
                    event = "lp_solved",
                    objective = solution.objective(),
                    variables = n,
                );
                Ok(LpSolution {
                    objective: solution.objective(),
                    point,
                })
            }
            Err(minilp::Error::Infeasible) => Err(LpError::Infeasible),
            Err(minilp::Error::Unbounded) => Err(LpError::Unbounded),
            #[allow(unreachable_patterns)]
            Err(other) => Err(LpError::Solver(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximize_small_program() {
        // max x + 2y s.t. x + y <= 4, 2x + y >= 2, 0 <= x, 0 <= y <= 3
        let program = LinearProgram {
            bounds: vec![(0.0, f64::INFINITY), (0.0, 3.0)],
            constraints: vec![
                LinearConstraint::new(vec![1.0, 1.0], ComparisonOp::Le, 4.0),
                LinearConstraint::new(vec![2.0, 1.0], ComparisonOp::Ge, 2.0),
            ],
            objective: vec![1.0, 2.0],
        };
        let solution = MinilpSolver.maximize(&program).unwrap();
        assert!((solution.objective - 7.0).abs() < 1e-9);
        assert!((solution.point[0] - 1.0).abs() < 1e-9);
        assert!((solution.point[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimize() {
        let program = LinearProgram {
            bounds: vec![(0.0, 10.0)],
            constraints: vec![LinearConstraint::new(vec![1.0], ComparisonOp::Ge, 2.5)],
            objective: vec![1.0],
        };
        let solution = MinilpSolver.minimize(&program).unwrap();
        assert!((solution.objective - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        let program = LinearProgram {
            bounds: vec![(0.0, 1.0)],
            constraints: vec![LinearConstraint::new(vec![1.0], ComparisonOp::Ge, 2.0)],
            objective: vec![1.0],
        };
        assert_eq!(MinilpSolver.maximize(&program), Err(LpError::Infeasible));
    }

    #[test]
    fn test_unbounded() {
        let program = LinearProgram {
            bounds: vec![(0.0, f64::INFINITY)],
            constraints: vec![],
            objective: vec![1.0],
        };
        assert_eq!(MinilpSolver.maximize(&program), Err(LpError::Unbounded));
    }

    #[test]
    fn test_unbounded_cone() {
        // Gap ratio cone for four ranks: w4 = 0, d3 >= 0, convex gaps, d2 = 1.
        // d1 may grow without limit.
        let program = LinearProgram {
            bounds: vec![(0.0, f64::INFINITY); 4],
            constraints: vec![
                LinearConstraint::new(vec![0.0, 0.0, 0.0, 1.0], ComparisonOp::Eq, 0.0),
                LinearConstraint::new(vec![0.0, 0.0, 1.0, -1.0], ComparisonOp::Ge, 0.0),
                LinearConstraint::new(vec![1.0, -2.0, 1.0, 0.0], ComparisonOp::Ge, 0.0),
                LinearConstraint::new(vec![0.0, 1.0, -2.0, 1.0], ComparisonOp::Ge, 0.0),
                LinearConstraint::new(vec![0.0, 1.0, -1.0, 0.0], ComparisonOp::Eq, 1.0),
            ],
            objective: vec![1.0, -1.0, 0.0, 0.0],
        };
        assert_eq!(MinilpSolver.maximize(&program), Err(LpError::Unbounded));

        let lowest = MinilpSolver.minimize(&program).unwrap();
        assert!((lowest.objective - 1.0).abs() < 1e-9);
        assert!(lowest.objective.is_finite());
    }

    #[test]
    fn test_constraint_satisfaction() {
        let c = LinearConstraint::new(vec![1.0, -1.0], ComparisonOp::Ge, 0.0);
        assert!(c.is_satisfied_by(&[0.5, 0.5], 1e-9));
        assert!(!c.is_satisfied_by(&[0.4, 0.5], 1e-9));
    }
}
