//! Minimax-regret driven question selection.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use minimax_config::{
    LimitedConfig, LotteryPolicy, PessimisticConfig, QuestioningConstraint, StrategyConfig,
};
use minimax_core::{ElicitationError, PrefKnowledge, Question, QuestionKind, Result};
use minimax_regret::{Parallelism, RegretComputer};

use super::Strategy;
use crate::candidates::{committee_candidates, voter_candidates};
use crate::lottery::{LotteryComparator, MmrLottery};
use crate::quota::QuestionQuota;

/// Asks the question whose answers leave the best MMR lottery.
///
/// Each candidate is scored by the MMR predicted after a `Greater` and after
/// a `Lower` answer; lotteries are ranked by a [`LotteryComparator`] and ties
/// are broken with a seeded generator, so a seed fixes the whole question
/// sequence for given answers.
#[derive(Debug)]
pub struct StrategyByMmr {
    comparator: LotteryComparator,
    quota: QuestionQuota,
    epsilon: f64,
    parallelism: Parallelism,
    rng: ChaCha8Rng,
    description: String,
}

impl StrategyByMmr {
    /// No sequencing constraint.
    pub fn pessimistic(lottery: LotteryPolicy, epsilon: f64, seed: u64) -> Self {
        let description = StrategyConfig::Pessimistic(PessimisticConfig { lottery }).describe();
        Self::build(lottery, Vec::new(), epsilon, seed, description)
    }

    /// Questions sequenced by `constraints`.
    pub fn limited(
        lottery: LotteryPolicy,
        constraints: Vec<QuestioningConstraint>,
        epsilon: f64,
        seed: u64,
    ) -> Self {
        let description = StrategyConfig::Limited(LimitedConfig {
            lottery,
            constraints: constraints.clone(),
        })
        .describe();
        Self::build(lottery, constraints, epsilon, seed, description)
    }

    fn build(
        lottery: LotteryPolicy,
        constraints: Vec<QuestioningConstraint>,
        epsilon: f64,
        seed: u64,
        description: String,
    ) -> Self {
        StrategyByMmr {
            comparator: LotteryComparator::new(lottery, epsilon),
            quota: QuestionQuota::new(constraints),
            epsilon,
            parallelism: Parallelism::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            description,
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn quota(&self) -> &QuestionQuota {
        &self.quota
    }
}

impl Strategy for StrategyByMmr {
    fn next_question(&mut self, knowledge: &PrefKnowledge) -> Result<Question> {
        let mmr = RegretComputer::new(knowledge)
            .with_parallelism(self.parallelism.clone())
            .regrets()?
            .minimal_max_regrets(self.epsilon)?;

        let voter = voter_candidates(knowledge, &mmr)?;
        let committee = committee_candidates(knowledge)?;
        let selected = self.quota.select(|kind| match kind {
            QuestionKind::Voter => !voter.is_empty(),
            QuestionKind::Committee => !committee.is_empty(),
        })?;

        let candidates: Vec<Question> = match selected {
            Some((_, QuestionKind::Voter)) => voter.into_iter().map(Question::from).collect(),
            Some((_, QuestionKind::Committee)) => {
                committee.into_iter().map(Question::from).collect()
            }
            None => voter
                .into_iter()
                .map(Question::from)
                .chain(committee.into_iter().map(Question::from))
                .collect(),
        };
        if candidates.is_empty() {
            return Err(ElicitationError::ExhaustedStrategy(format!(
                "no question can lower the minimal max regret {}",
                mmr.value()
            )));
        }

        let lotteries = candidates
            .iter()
            .map(|q| MmrLottery::evaluate(knowledge, q, self.epsilon, &self.parallelism))
            .collect::<Result<Vec<_>>>()?;
        let best = self.comparator.best_indices(&lotteries);
        let chosen = best[self.rng.random_range(0..best.len())];

        if let Some((phase, _)) = selected {
            self.quota.record(phase);
        }
        let question = candidates[chosen];
        debug!(
            event = "question_selected",
            question = %question,
            lottery = %lotteries[chosen],
            mmr = mmr.value(),
            candidates = candidates.len(),
            ties = best.len(),
        );
        Ok(question)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
