//! Simulated respondent holding the true preferences.

use std::collections::BTreeMap;

use crate::error::{ElicitationError, Result};
use crate::ids::{Alternative, Voter};
use crate::question::{Answer, Question};
use crate::weights::{PsrWeights, WEIGHT_TOLERANCE};

/// True profile and true weights, used to answer questions automatically.
///
/// # Examples
///
/// ```
/// use minimax_core::{Alternative, Answer, Oracle, PsrWeights, QuestionVoter, Voter};
///
/// let a = Alternative::range(3);
/// let v = Voter::new(1);
/// let oracle = Oracle::new(
///     [(v, vec![a[2], a[0], a[1]])].into_iter().collect(),
///     PsrWeights::borda(3).unwrap(),
/// )
/// .unwrap();
///
/// let q = QuestionVoter::new(v, a[0], a[2]).unwrap();
/// assert_eq!(oracle.answer(&q.into()).unwrap(), Answer::Lower);
/// assert_eq!(oracle.winners(), vec![a[2]]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Oracle {
    /// Ranking per voter, best first.
    profile: BTreeMap<Voter, Vec<Alternative>>,
    /// Position of each alternative per voter, 1-based.
    ranks: BTreeMap<Voter, BTreeMap<Alternative, usize>>,
    weights: PsrWeights,
}

impl Oracle {
    /// # Errors
    ///
    /// [`ElicitationError::InvalidArgument`] if the profile is empty, a
    /// ranking repeats an alternative or rankings disagree on the set of
    /// alternatives; [`ElicitationError::InvalidWeights`] if the weights do
    /// not have one entry per alternative.
    pub fn new(profile: BTreeMap<Voter, Vec<Alternative>>, weights: PsrWeights) -> Result<Self> {
        let Some(first) = profile.values().next() else {
            return Err(ElicitationError::InvalidArgument("empty profile".into()));
        };
        let mut reference = first.clone();
        reference.sort_unstable();

        let mut ranks = BTreeMap::new();
        for (&voter, ranking) in &profile {
            let mut sorted = ranking.clone();
            sorted.sort_unstable();
            if sorted != reference {
                return Err(ElicitationError::InvalidArgument(format!(
                    "ranking of {voter} is not a permutation of the alternatives"
                )));
            }
            let positions: BTreeMap<Alternative, usize> =
                ranking.iter().enumerate().map(|(i, &a)| (a, i + 1)).collect();
            if positions.len() != ranking.len() {
                return Err(ElicitationError::InvalidArgument(format!(
                    "ranking of {voter} repeats an alternative"
                )));
            }
            ranks.insert(voter, positions);
        }
        if weights.len() != reference.len() {
            return Err(ElicitationError::InvalidWeights(format!(
                "{} weights for {} alternatives",
                weights.len(),
                reference.len()
            )));
        }
        Ok(Oracle {
            profile,
            ranks,
            weights,
        })
    }

    /// Alternatives in id order.
    pub fn alternatives(&self) -> Vec<Alternative> {
        let mut alternatives = self.profile.values().next().cloned().unwrap_or_default();
        alternatives.sort_unstable();
        alternatives
    }

    pub fn voters(&self) -> Vec<Voter> {
        self.profile.keys().copied().collect()
    }

    pub fn weights(&self) -> &PsrWeights {
        &self.weights
    }

    pub fn ranking(&self, voter: Voter) -> Option<&[Alternative]> {
        self.profile.get(&voter).map(Vec::as_slice)
    }

    /// Answers `question` truthfully.
    ///
    /// Committee answers use an absolute tolerance, so a ratio equal to
    /// `lambda` up to rounding is answered [`Answer::Equal`].
    pub fn answer(&self, question: &Question) -> Result<Answer> {
        match question {
            Question::Voter(q) => {
                let ranks = self.ranks.get(&q.voter()).ok_or_else(|| {
                    ElicitationError::InvalidQuestion(format!("unknown voter {}", q.voter()))
                })?;
                let rank_of = |a: Alternative| {
                    ranks.get(&a).copied().ok_or_else(|| {
                        ElicitationError::InvalidQuestion(format!("unknown alternative {a}"))
                    })
                };
                if rank_of(q.first())? < rank_of(q.second())? {
                    Ok(Answer::Greater)
                } else {
                    Ok(Answer::Lower)
                }
            }
            Question::Committee(q) => {
                if q.rank() + 2 > self.weights.len() {
                    return Err(ElicitationError::InvalidQuestion(format!(
                        "rank {} has no following gap with {} ranks",
                        q.rank(),
                        self.weights.len()
                    )));
                }
                let lhs = self.weights.difference(q.rank());
                let rhs = q.lambda() * self.weights.difference(q.rank() + 1);
                Ok(if (lhs - rhs).abs() <= WEIGHT_TOLERANCE {
                    Answer::Equal
                } else if lhs > rhs {
                    Answer::Greater
                } else {
                    Answer::Lower
                })
            }
        }
    }

    /// True score of `alternative`: the sum over voters of the weight of its
    /// rank.
    pub fn score(&self, alternative: Alternative) -> f64 {
        self.ranks
            .values()
            .filter_map(|ranks| ranks.get(&alternative))
            .map(|&rank| self.weights.weight_at_rank(rank))
            .sum()
    }

    pub fn scores(&self) -> BTreeMap<Alternative, f64> {
        self.alternatives()
            .into_iter()
            .map(|a| (a, self.score(a)))
            .collect()
    }

    /// Alternatives with the highest true score, in id order.
    pub fn winners(&self) -> Vec<Alternative> {
        let scores = self.scores();
        let best = scores.values().copied().fold(f64::NEG_INFINITY, f64::max);
        scores
            .into_iter()
            .filter(|&(_, s)| best - s <= WEIGHT_TOLERANCE)
            .map(|(a, _)| a)
            .collect()
    }
}
