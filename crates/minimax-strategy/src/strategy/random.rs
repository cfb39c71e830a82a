//! Uniformly random question selection.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use minimax_core::{ElicitationError, PrefKnowledge, Question, Result};

use super::Strategy;
use crate::candidates::{committee_candidates, open_voter_questions};

/// Picks uniformly among every question whose answer is still unknown: open
/// voter pairs and unsettled committee ranks.
#[derive(Debug)]
pub struct StrategyRandom {
    rng: ChaCha8Rng,
}

impl StrategyRandom {
    pub fn new(seed: u64) -> Self {
        StrategyRandom {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Strategy for StrategyRandom {
    fn next_question(&mut self, knowledge: &PrefKnowledge) -> Result<Question> {
        let mut questions: Vec<Question> = open_voter_questions(knowledge)?
            .into_iter()
            .map(Question::from)
            .collect();
        questions.extend(committee_candidates(knowledge)?.into_iter().map(Question::from));
        if questions.is_empty() {
            return Err(ElicitationError::ExhaustedStrategy(
                "every question has been answered".into(),
            ));
        }
        let question = questions[self.rng.random_range(0..questions.len())];
        debug!(
            event = "question_selected",
            question = %question,
            candidates = questions.len(),
        );
        Ok(question)
    }

    fn describe(&self) -> String {
        "Random".to_string()
    }
}
