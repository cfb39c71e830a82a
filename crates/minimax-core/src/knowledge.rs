//! Everything learned so far about the voters and the committee.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{ElicitationError, Result};
use crate::ids::{Alternative, Voter};
use crate::lp::{ComparisonOp, LpSolver, MinilpSolver};
use crate::polytope::{CommitteeConstraint, WeightPolytope};
use crate::preference::VoterPartialPreference;
use crate::question::{Answer, Question};
use crate::weights::{PsrWeights, WEIGHT_TOLERANCE};

/// Partial preferences of every voter plus the feasible weight polytope.
///
/// Knowledge only grows. It is mutated through
/// [`add_voter_preference`](Self::add_voter_preference) and
/// [`add_weight_constraint`](Self::add_weight_constraint) (or
/// [`update`](Self::update), which dispatches to them), and a failed
/// mutation leaves it unchanged.
///
/// Cloning is cheap enough for hypothetical updates: the LP solver handle is
/// shared, the orders and the constraint log are copied.
///
/// # Examples
///
/// ```
/// use minimax_core::{Alternative, Answer, PrefKnowledge, QuestionVoter, Voter};
///
/// let alts = Alternative::range(3);
/// let voters = Voter::range(2);
/// let mut knowledge = PrefKnowledge::new(&alts, &voters).unwrap();
///
/// let question = QuestionVoter::new(voters[0], alts[0], alts[2]).unwrap();
/// knowledge.update(&question.into(), Answer::Lower).unwrap();
///
/// let pref = knowledge.partial_preference(voters[0]).unwrap();
/// assert!(pref.prefers(alts[2], alts[0]));
/// ```
#[derive(Clone, Debug)]
pub struct PrefKnowledge {
    alternatives: Vec<Alternative>,
    voters: Vec<Voter>,
    profile: BTreeMap<Voter, VoterPartialPreference>,
    polytope: WeightPolytope,
    solver: Arc<dyn LpSolver>,
}

impl PrefKnowledge {
    /// Creates empty knowledge backed by [`MinilpSolver`].
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidArgument`] if there are no alternatives, no
    /// voters, or a duplicate in either list.
    pub fn new(alternatives: &[Alternative], voters: &[Voter]) -> Result<Self> {
        Self::with_solver(alternatives, voters, Arc::new(MinilpSolver))
    }

    /// Creates empty knowledge backed by the given LP solver.
    pub fn with_solver(
        alternatives: &[Alternative],
        voters: &[Voter],
        solver: Arc<dyn LpSolver>,
    ) -> Result<Self> {
        let alternatives = sorted_unique(alternatives, "alternative")?;
        let voters = sorted_unique(voters, "voter")?;
        let profile = voters
            .iter()
            .map(|&v| (v, VoterPartialPreference::new(&alternatives)))
            .collect();
        Ok(PrefKnowledge {
            polytope: WeightPolytope::new(alternatives.len()),
            alternatives,
            voters,
            profile,
            solver,
        })
    }

    /// Alternatives in id order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Voters in id order.
    pub fn voters(&self) -> &[Voter] {
        &self.voters
    }

    #[inline]
    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    pub fn partial_preference(&self, voter: Voter) -> Option<&VoterPartialPreference> {
        self.profile.get(&voter)
    }

    /// Iterates over every voter's partial preference in voter order.
    pub fn partial_preferences(&self) -> impl Iterator<Item = (Voter, &VoterPartialPreference)> {
        self.profile.iter().map(|(&v, pref)| (v, pref))
    }

    pub fn polytope(&self) -> &WeightPolytope {
        &self.polytope
    }

    pub fn solver(&self) -> &dyn LpSolver {
        self.solver.as_ref()
    }

    /// Records that `voter` prefers `winner` to `loser`.
    ///
    /// Returns `Ok(false)` if this was already implied.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidQuestion`] for an unknown voter or
    /// alternative, a self-comparison, or a contradiction with earlier
    /// answers.
    pub fn add_voter_preference(
        &mut self,
        voter: Voter,
        winner: Alternative,
        loser: Alternative,
    ) -> Result<bool> {
        let pref = self
            .profile
            .get_mut(&voter)
            .ok_or_else(|| ElicitationError::InvalidQuestion(format!("unknown voter {voter}")))?;
        let added = pref.add_preference(winner, loser)?;
        debug!(
            event = "voter_preference_added",
            voter = voter.id(),
            winner = winner.id(),
            loser = loser.id(),
            implied = !added,
        );
        Ok(added)
    }

    /// Intersects the weight polytope with `constraint`.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidQuestion`] if the constraint refers to a
    /// missing gap, [`ElicitationError::InfeasibleConstraint`] if it empties
    /// the polytope. The knowledge is unchanged on error.
    pub fn add_weight_constraint(&mut self, constraint: CommitteeConstraint) -> Result<()> {
        let polytope = self.polytope.with_constraint(constraint)?;
        polytope.check_feasible(self.solver.as_ref())?;
        self.polytope = polytope;
        debug!(
            event = "weight_constraint_added",
            constraint = %constraint,
            total = self.polytope.committee_constraints().len(),
        );
        Ok(())
    }

    /// Applies an answered question.
    pub fn update(&mut self, question: &Question, answer: Answer) -> Result<()> {
        match question {
            Question::Voter(q) => {
                let (winner, loser) = q.ordered_by(answer)?;
                self.add_voter_preference(q.voter(), winner, loser)?;
            }
            Question::Committee(q) => {
                self.add_weight_constraint(q.constraint_for(answer))?;
            }
        }
        Ok(())
    }

    /// Constrains the polytope to the single point `weights`.
    ///
    /// Every ratio `d_i / d_{i+1}` is fixed by an equality constraint, which
    /// together with `w_1 = 1` and `w_m = 0` leaves only `weights`.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidWeights`] if the length differs from the
    /// number of alternatives or the weights are not strictly decreasing,
    /// [`ElicitationError::InfeasibleConstraint`] if earlier constraints
    /// exclude them.
    pub fn pin_weights(&mut self, weights: &PsrWeights) -> Result<()> {
        let m = self.alternative_count();
        if weights.len() != m {
            return Err(ElicitationError::InvalidWeights(format!(
                "{} weights for {} alternatives",
                weights.len(),
                m
            )));
        }
        let mut polytope = self.polytope.clone();
        for rank in 1..=m.saturating_sub(2) {
            let next_gap = weights.difference(rank + 1);
            if next_gap <= WEIGHT_TOLERANCE {
                return Err(ElicitationError::InvalidWeights(format!(
                    "weights must be strictly decreasing to be pinned, gap after rank {} is {}",
                    rank + 1,
                    next_gap
                )));
            }
            let lambda = weights.difference(rank) / next_gap;
            polytope = polytope.with_constraint(CommitteeConstraint::new(
                rank,
                ComparisonOp::Eq,
                lambda,
            )?)?;
        }
        polytope.check_feasible(self.solver.as_ref())?;
        self.polytope = polytope;
        debug!(event = "weights_pinned", weights = %weights);
        Ok(())
    }
}

fn sorted_unique<T: Ord + Copy>(items: &[T], what: &str) -> Result<Vec<T>> {
    if items.is_empty() {
        return Err(ElicitationError::InvalidArgument(format!("no {what}s")));
    }
    let mut sorted = items.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != items.len() {
        return Err(ElicitationError::InvalidArgument(format!(
            "duplicate {what} in input"
        )));
    }
    Ok(sorted)
}
