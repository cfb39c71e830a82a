//! Feasible region of positional scoring rule weights.
//!
//! Variables are the weights `w_1..w_m`. Writing `d_i = w_i - w_{i+1}` for
//! the gap after rank `i`, the base region is
//!
//! - `w_1 = 1` and `w_m = 0` (normalization),
//! - `d_{m-1} >= 0`,
//! - `d_i >= d_{i+1}` for `1 <= i <= m - 2` (convexity).
//!
//! Convexity together with the last gap being non-negative makes every gap
//! non-negative. Each answered committee question then adds one
//! [`CommitteeConstraint`] `d_rank op lambda * d_{rank+1}`.
//!
//! Consecutive gaps may be equal and gaps may be zero: no separation margin
//! is imposed between `d_i` and `d_{i+1}`. Equal gaps (Borda) and flat tails
//! such as `(1, 0, 0)` stay feasible, and every constraint but `w_1 = 1`
//! stays homogeneous, which [`WeightPolytope::lambda_range`] relies on. As a
//! consequence a ratio `d_rank / d_{rank+1}` is undefined when the answers
//! force `d_{rank+1}` to 0, and weights with a zero gap cannot be pinned.

use std::fmt;

use tracing::debug;

use crate::error::{ElicitationError, Result};
use crate::lp::{ComparisonOp, LinearConstraint, LinearProgram, LpError, LpSolver};
use crate::weights::PsrWeights;

/// Gap below which a lambda range is considered settled.
pub const LAMBDA_RANGE_TOLERANCE: f64 = 1e-6;

/// Constraint `d_rank op lambda * d_{rank+1}` on two consecutive gaps.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitteeConstraint {
    rank: usize,
    op: ComparisonOp,
    lambda: f64,
}

impl CommitteeConstraint {
    /// # Errors
    ///
    /// [`ElicitationError::InvalidQuestion`] if `rank` is 0 or `lambda` is
    /// not a positive finite number.
    pub fn new(rank: usize, op: ComparisonOp, lambda: f64) -> Result<Self> {
        if rank == 0 {
            return Err(ElicitationError::InvalidQuestion("ranks start at 1".into()));
        }
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(ElicitationError::InvalidQuestion(format!(
                "lambda must be positive and finite, got {lambda}"
            )));
        }
        Ok(CommitteeConstraint { rank, op, lambda })
    }

    /// For parameters already validated by [`new`](Self::new).
    pub(crate) fn from_parts(rank: usize, op: ComparisonOp, lambda: f64) -> Self {
        CommitteeConstraint { rank, op, lambda }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    #[inline]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// The constraint over `w_1..w_m`.
    fn to_linear(self, rank_count: usize) -> LinearConstraint {
        let i = self.rank - 1;
        let mut coefficients = vec![0.0; rank_count];
        coefficients[i] = 1.0;
        coefficients[i + 1] = -1.0 - self.lambda;
        coefficients[i + 2] = self.lambda;
        LinearConstraint::new(coefficients, self.op, 0.0)
    }

    /// Returns true if the given weights satisfy this constraint.
    pub fn is_satisfied_by(&self, weights: &PsrWeights, tolerance: f64) -> bool {
        if self.rank + 2 > weights.len() {
            return false;
        }
        self.to_linear(weights.len())
            .is_satisfied_by(weights.as_slice(), tolerance)
    }
}

impl fmt::Display for CommitteeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "d{} {} {} × d{}",
            self.rank,
            self.op,
            self.lambda,
            self.rank + 1
        )
    }
}

/// Feasible values of the ratio `d_rank / d_{rank+1}`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LambdaRange {
    pub lower: f64,
    /// `None` when the ratio is unbounded above.
    pub upper: Option<f64>,
}

impl LambdaRange {
    /// Returns true if the ratio is known up to `tolerance`.
    pub fn is_settled(&self, tolerance: f64) -> bool {
        matches!(self.upper, Some(upper) if upper - self.lower <= tolerance)
    }

    /// The ratio splitting the range in two: the middle of a bounded range,
    /// twice the lower bound otherwise.
    pub fn split_point(&self) -> f64 {
        match self.upper {
            Some(upper) => (self.lower + upper) / 2.0,
            None => 2.0 * self.lower.max(1.0),
        }
    }
}

/// The polytope of weights consistent with everything learned so far.
///
/// Values are immutable: [`with_constraint`](Self::with_constraint) returns
/// a new polytope, so read-only queries can run concurrently while the owner
/// swaps in a larger constraint log between passes.
///
/// # Examples
///
/// ```
/// use minimax_core::{CommitteeConstraint, ComparisonOp, MinilpSolver, WeightPolytope};
///
/// let polytope = WeightPolytope::new(4);
/// let constraint = CommitteeConstraint::new(1, ComparisonOp::Ge, 2.0).unwrap();
/// let polytope = polytope.with_constraint(constraint).unwrap();
///
/// // Maximizing w_2 now gives d1 = 2 d2 = 2 d3, i.e. w = (1, 0.5, 0.25, 0).
/// let (value, weights) = polytope.maximize(&MinilpSolver, &[0.0, 1.0, 0.0, 0.0]).unwrap();
/// assert!((value - 0.5).abs() < 1e-6);
/// assert!((weights.weight_at_rank(3) - 0.25).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WeightPolytope {
    rank_count: usize,
    committee: Vec<CommitteeConstraint>,
}

impl WeightPolytope {
    /// Creates the base polytope for `rank_count` ranks.
    ///
    /// # Panics
    ///
    /// Panics if `rank_count` is 0.
    pub fn new(rank_count: usize) -> Self {
        assert!(rank_count >= 1, "a polytope needs at least one rank");
        WeightPolytope {
            rank_count,
            committee: Vec::new(),
        }
    }

    #[inline]
    pub fn rank_count(&self) -> usize {
        self.rank_count
    }

    /// Constraints added by committee answers, oldest first.
    pub fn committee_constraints(&self) -> &[CommitteeConstraint] {
        &self.committee
    }

    /// Returns this polytope intersected with `constraint`.
    ///
    /// Feasibility is not checked here; see
    /// [`check_feasible`](Self::check_feasible).
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidQuestion`] if the constraint refers to a
    /// gap that does not exist (`rank + 2 > rank_count`).
    pub fn with_constraint(&self, constraint: CommitteeConstraint) -> Result<Self> {
        if constraint.rank() + 2 > self.rank_count {
            return Err(ElicitationError::InvalidQuestion(format!(
                "rank {} has no following gap with {} ranks",
                constraint.rank(),
                self.rank_count
            )));
        }
        let mut committee = self.committee.clone();
        committee.push(constraint);
        Ok(WeightPolytope {
            rank_count: self.rank_count,
            committee,
        })
    }

    /// Coefficients of `d_rank` over `w_1..w_m`.
    fn gap(&self, rank: usize) -> Vec<f64> {
        let mut coefficients = vec![0.0; self.rank_count];
        coefficients[rank - 1] = 1.0;
        coefficients[rank] = -1.0;
        coefficients
    }

    /// Every constraint except `w_1 = 1`; all of them are homogeneous.
    fn homogeneous_constraints(&self) -> Vec<LinearConstraint> {
        let m = self.rank_count;
        let mut constraints = Vec::new();
        if m >= 2 {
            let mut last = vec![0.0; m];
            last[m - 1] = 1.0;
            constraints.push(LinearConstraint::new(last, ComparisonOp::Eq, 0.0));
            constraints.push(LinearConstraint::new(self.gap(m - 1), ComparisonOp::Ge, 0.0));
        }
        for i in 1..=m.saturating_sub(2) {
            // d_i - d_{i+1} >= 0
            let mut coefficients = vec![0.0; m];
            coefficients[i - 1] = 1.0;
            coefficients[i] = -2.0;
            coefficients[i + 1] = 1.0;
            constraints.push(LinearConstraint::new(coefficients, ComparisonOp::Ge, 0.0));
        }
        constraints.extend(self.committee.iter().map(|c| c.to_linear(m)));
        constraints
    }

    /// All constraints of the polytope over `w_1..w_m`.
    pub fn constraints(&self) -> Vec<LinearConstraint> {
        let mut first = vec![0.0; self.rank_count];
        first[0] = 1.0;
        let mut constraints = vec![LinearConstraint::new(first, ComparisonOp::Eq, 1.0)];
        constraints.extend(self.homogeneous_constraints());
        constraints
    }

    /// The program maximizing `objective` over this polytope.
    pub fn linear_program(&self, objective: &[f64]) -> LinearProgram {
        LinearProgram {
            bounds: vec![(0.0, 1.0); self.rank_count],
            constraints: self.constraints(),
            objective: objective.to_vec(),
        }
    }

    /// Maximizes a linear objective over the weights.
    ///
    /// Returns the optimal value and the weights reaching it.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidArgument`] if the objective has the wrong
    /// length, [`ElicitationError::InfeasibleConstraint`] if the polytope is
    /// empty, [`ElicitationError::LpSolver`] for any other solver failure.
    pub fn maximize(&self, solver: &dyn LpSolver, objective: &[f64]) -> Result<(f64, PsrWeights)> {
        if objective.len() != self.rank_count {
            return Err(ElicitationError::InvalidArgument(format!(
                "objective has {} coefficients for {} ranks",
                objective.len(),
                self.rank_count
            )));
        }
        let solution = solver
            .maximize(&self.linear_program(objective))
            .map_err(|e| match e {
                LpError::Infeasible => ElicitationError::InfeasibleConstraint(format!(
                    "weight polytope is empty: {}",
                    self.describe_committee()
                )),
                other => ElicitationError::LpSolver(other.to_string()),
            })?;
        Ok((solution.objective, PsrWeights::from_solver_point(&solution.point)))
    }

    /// Some point of the polytope.
    pub fn feasible_point(&self, solver: &dyn LpSolver) -> Result<PsrWeights> {
        self.maximize(solver, &vec![0.0; self.rank_count])
            .map(|(_, weights)| weights)
    }

    /// Fails with [`ElicitationError::InfeasibleConstraint`] if the polytope
    /// is empty.
    pub fn check_feasible(&self, solver: &dyn LpSolver) -> Result<()> {
        self.feasible_point(solver).map(|_| ())
    }

    /// Feasible range of `d_rank / d_{rank+1}`.
    ///
    /// Every constraint but `w_1 = 1` is homogeneous, so the ratio range is
    /// obtained on the cone with `d_{rank+1}` fixed to 1. Returns `None` when
    /// `d_{rank+1}` is forced to 0 and the ratio is undefined.
    pub fn lambda_range(&self, solver: &dyn LpSolver, rank: usize) -> Result<Option<LambdaRange>> {
        if rank == 0 || rank + 2 > self.rank_count {
            return Err(ElicitationError::InvalidArgument(format!(
                "no ratio d{} / d{} with {} ranks",
                rank,
                rank + 1,
                self.rank_count
            )));
        }
        let mut constraints = self.homogeneous_constraints();
        constraints.push(LinearConstraint::new(self.gap(rank + 1), ComparisonOp::Eq, 1.0));
        let program = LinearProgram {
            bounds: vec![(0.0, f64::INFINITY); self.rank_count],
            constraints,
            objective: self.gap(rank),
        };

        let lower = match solver.minimize(&program) {
            Ok(solution) if solution.objective.is_finite() => solution.objective,
            Ok(solution) => {
                return Err(ElicitationError::LpSolver(format!(
                    "non finite lower ratio {} for d{}",
                    solution.objective, rank
                )))
            }
            Err(LpError::Infeasible) => {
                debug!(event = "lambda_range_undefined", rank);
                return Ok(None);
            }
            Err(other) => return Err(ElicitationError::LpSolver(other.to_string())),
        };
        let upper = match solver.maximize(&program) {
            Ok(solution) if solution.objective.is_finite() => Some(solution.objective),
            Ok(_) | Err(LpError::Unbounded) => None,
            Err(other) => return Err(ElicitationError::LpSolver(other.to_string())),
        };
        Ok(Some(LambdaRange { lower, upper }))
    }

    /// Returns true if `weights` lies in the polytope up to `tolerance`.
    pub fn contains(&self, weights: &PsrWeights, tolerance: f64) -> bool {
        weights.len() == self.rank_count
            && self
                .constraints()
                .iter()
                .all(|c| c.is_satisfied_by(weights.as_slice(), tolerance))
    }

    fn describe_committee(&self) -> String {
        let parts: Vec<String> = self.committee.iter().map(|c| c.to_string()).collect();
        format!("[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests;
