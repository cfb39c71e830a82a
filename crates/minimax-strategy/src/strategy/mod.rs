//! Strategies choosing the next question.

mod by_mmr;
mod random;

use std::fmt::Debug;

use minimax_core::{PrefKnowledge, Question, Result};

pub use by_mmr::StrategyByMmr;
pub use random::StrategyRandom;

/// Chooses the next question from the current knowledge.
///
/// Strategies may keep state between calls (a random generator, quota
/// counters); every returned question is assumed to be asked.
pub trait Strategy: Send + Debug {
    /// Returns the next question to ask.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::ExhaustedStrategy`](minimax_core::ElicitationError::ExhaustedStrategy)
    /// when no admissible question is left, or any error raised while
    /// computing regrets.
    fn next_question(&mut self, knowledge: &PrefKnowledge) -> Result<Question>;

    /// Short description, e.g. `Limited, constrained to [2c, ∞v]`.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests;
