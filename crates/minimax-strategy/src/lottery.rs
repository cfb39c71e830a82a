//! Predicted outcomes of a question and how to rank them.

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use minimax_config::LotteryPolicy;
use minimax_core::{Answer, PrefKnowledge, Question, Result};
use minimax_regret::{Parallelism, RegretComputer};

/// MMR after each of the two answers a question may receive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MmrLottery {
    pub if_greater: f64,
    pub if_lower: f64,
}

impl MmrLottery {
    pub fn new(if_greater: f64, if_lower: f64) -> Self {
        MmrLottery {
            if_greater,
            if_lower,
        }
    }

    /// Evaluates `question` against hypothetical copies of `knowledge`.
    pub fn evaluate(
        knowledge: &PrefKnowledge,
        question: &Question,
        epsilon: f64,
        parallelism: &Parallelism,
    ) -> Result<Self> {
        let mmr_after = |answer: Answer| -> Result<f64> {
            let mut hypothetical = knowledge.clone();
            hypothetical.update(question, answer)?;
            RegretComputer::new(&hypothetical)
                .with_parallelism(parallelism.clone())
                .regrets()?
                .minimal_max_regret(epsilon)
        };
        let lottery = MmrLottery::new(mmr_after(Answer::Greater)?, mmr_after(Answer::Lower)?);
        trace!(event = "lottery", question = %question, lottery = %lottery);
        Ok(lottery)
    }

    pub fn max(&self) -> f64 {
        self.if_greater.max(self.if_lower)
    }

    pub fn min(&self) -> f64 {
        self.if_greater.min(self.if_lower)
    }

    pub fn mean(&self) -> f64 {
        (self.if_greater + self.if_lower) / 2.0
    }
}

impl fmt::Display for MmrLottery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.if_greater, self.if_lower)
    }
}

/// Orders lotteries from most to least attractive.
///
/// Values closer than `epsilon` compare equal.
///
/// # Examples
///
/// ```
/// use minimax_config::LotteryPolicy;
/// use minimax_strategy::{LotteryComparator, MmrLottery};
/// use std::cmp::Ordering;
///
/// let pessimistic = LotteryComparator::new(LotteryPolicy::Max, 1e-6);
/// let safe = MmrLottery::new(0.5, 0.5);
/// let risky = MmrLottery::new(0.0, 0.6);
/// assert_eq!(pessimistic.compare(&safe, &risky), Ordering::Less);
///
/// let optimistic = LotteryComparator::new(LotteryPolicy::Min, 1e-6);
/// assert_eq!(optimistic.compare(&safe, &risky), Ordering::Greater);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LotteryComparator {
    policy: LotteryPolicy,
    epsilon: f64,
}

impl LotteryComparator {
    pub fn new(policy: LotteryPolicy, epsilon: f64) -> Self {
        LotteryComparator { policy, epsilon }
    }

    pub fn policy(&self) -> LotteryPolicy {
        self.policy
    }

    fn compare_values(&self, a: f64, b: f64) -> Ordering {
        if (a - b).abs() <= self.epsilon {
            Ordering::Equal
        } else {
            a.total_cmp(&b)
        }
    }

    /// `Less` when `a` is preferred.
    pub fn compare(&self, a: &MmrLottery, b: &MmrLottery) -> Ordering {
        match self.policy {
            LotteryPolicy::Max => self
                .compare_values(a.max(), b.max())
                .then_with(|| self.compare_values(a.min(), b.min())),
            LotteryPolicy::Min => self
                .compare_values(a.min(), b.min())
                .then_with(|| self.compare_values(a.max(), b.max())),
            LotteryPolicy::Mean => self.compare_values(a.mean(), b.mean()),
        }
    }

    /// Indices of the preferred lotteries, in input order.
    pub fn best_indices(&self, lotteries: &[MmrLottery]) -> Vec<usize> {
        let Some(best) = lotteries
            .iter()
            .min_by(|a, b| self.compare(a, b))
            .copied()
        else {
            return Vec::new();
        };
        lotteries
            .iter()
            .enumerate()
            .filter(|(_, l)| self.compare(l, &best) == Ordering::Equal)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimax_core::{Alternative, QuestionCommittee, QuestionVoter, Voter};
    use minimax_test::{empty_knowledge, with_edges};

    #[test]
    fn test_max_policy_breaks_ties_on_min() {
        let c = LotteryComparator::new(LotteryPolicy::Max, 1e-6);
        let a = MmrLottery::new(0.5, 0.2);
        let b = MmrLottery::new(0.1, 0.5);
        assert_eq!(c.compare(&b, &a), Ordering::Less);
        assert_eq!(c.compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_epsilon_ties() {
        let c = LotteryComparator::new(LotteryPolicy::Mean, 1e-3);
        let a = MmrLottery::new(0.5, 0.5);
        let b = MmrLottery::new(0.5004, 0.5);
        assert_eq!(c.compare(&a, &b), Ordering::Equal);

        let lotteries = [b, MmrLottery::new(0.9, 0.9), a];
        assert_eq!(c.best_indices(&lotteries), vec![0, 2]);
        assert!(c.best_indices(&[]).is_empty());
    }

    #[test]
    fn test_voter_question_lottery() {
        // Knowing a1 > a2 already, asking about a2 vs a3 completes the order
        // in one of the two branches.
        let k = with_edges(3, 1, &[(1, 1, 2)]);
        let q = QuestionVoter::new(Voter::new(1), Alternative::new(2), Alternative::new(3)).unwrap();
        let lottery = MmrLottery::evaluate(&k, &q.into(), 1e-6, &Parallelism::Sequential).unwrap();
        assert!(lottery.if_greater.abs() < 1e-6);
        assert!(lottery.if_lower >= 0.0);
    }

    #[test]
    fn test_committee_question_lottery_does_not_mutate_knowledge() {
        let k = empty_knowledge(4, 1);
        let q = QuestionCommittee::new(1, 2.0).unwrap();
        let lottery = MmrLottery::evaluate(&k, &q.into(), 1e-6, &Parallelism::Sequential).unwrap();
        assert!(lottery.max() <= 1.0 + 1e-6);
        assert!(k.polytope().committee_constraints().is_empty());
    }
}
