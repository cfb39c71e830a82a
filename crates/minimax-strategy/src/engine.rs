//! Question/answer state machine around a strategy.

use tracing::{debug, info};

use minimax_core::{Answer, ElicitationError, PrefKnowledge, Question, Result};
use minimax_regret::{MinimalMaxRegrets, Parallelism, RegretComputer, Regrets};

use crate::strategy::Strategy;

/// Where the engine stands in the question/answer cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineState {
    AwaitingQuestion,
    AwaitingAnswer(Question),
}

/// Alternates between asking the strategy for a question and applying the
/// answer to the knowledge.
///
/// Calls out of order fail with [`ElicitationError::InvalidState`]. A failed
/// answer leaves the engine waiting for an answer to the same question.
///
/// # Examples
///
/// ```
/// use minimax_core::{Alternative, Answer, PrefKnowledge, Voter};
/// use minimax_strategy::{ElicitationEngine, EngineState, StrategyFactory};
///
/// let knowledge = PrefKnowledge::new(&Alternative::range(3), &Voter::range(1)).unwrap();
/// let factory = StrategyFactory::pessimistic(42);
/// let mut engine = ElicitationEngine::new(knowledge, factory.build(), factory.epsilon());
///
/// let question = engine.next_question().unwrap();
/// assert_eq!(engine.state(), EngineState::AwaitingAnswer(question));
/// assert!(engine.next_question().is_err());
///
/// engine.answer(Answer::Greater).unwrap();
/// assert_eq!(engine.state(), EngineState::AwaitingQuestion);
/// ```
#[derive(Debug)]
pub struct ElicitationEngine {
    knowledge: PrefKnowledge,
    strategy: Box<dyn Strategy>,
    state: EngineState,
    epsilon: f64,
    parallelism: Parallelism,
    answered: usize,
}

impl ElicitationEngine {
    pub fn new(knowledge: PrefKnowledge, strategy: Box<dyn Strategy>, epsilon: f64) -> Self {
        info!(
            event = "engine_start",
            strategy = %strategy.describe(),
            alternatives = knowledge.alternative_count(),
            voters = knowledge.voters().len(),
        );
        ElicitationEngine {
            knowledge,
            strategy,
            state: EngineState::AwaitingQuestion,
            epsilon,
            parallelism: Parallelism::default(),
            answered: 0,
        }
    }

    /// Scheduling used for the regret snapshots.
    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn knowledge(&self) -> &PrefKnowledge {
        &self.knowledge
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Number of answers applied so far.
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Asks the strategy for the next question.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::InvalidState`] while a question awaits its
    /// answer; otherwise whatever the strategy reports, notably
    /// [`ElicitationError::ExhaustedStrategy`].
    pub fn next_question(&mut self) -> Result<Question> {
        if let EngineState::AwaitingAnswer(pending) = self.state {
            return Err(ElicitationError::InvalidState(format!(
                "question {pending} has not been answered"
            )));
        }
        let question = self.strategy.next_question(&self.knowledge)?;
        self.state = EngineState::AwaitingAnswer(question);
        debug!(event = "question_asked", index = self.answered + 1, question = %question);
        Ok(question)
    }

    /// Applies `answer` to the pending question.
    pub fn answer(&mut self, answer: Answer) -> Result<()> {
        let EngineState::AwaitingAnswer(question) = self.state else {
            return Err(ElicitationError::InvalidState(
                "no question is awaiting an answer".into(),
            ));
        };
        self.knowledge.update(&question, answer)?;
        self.state = EngineState::AwaitingQuestion;
        self.answered += 1;
        debug!(event = "answer_applied", question = %question, answer = ?answer);
        Ok(())
    }

    /// Regrets of the current knowledge.
    pub fn regrets(&self) -> Result<Regrets> {
        RegretComputer::new(&self.knowledge)
            .with_parallelism(self.parallelism.clone())
            .regrets()
    }

    /// MMR selection of the current knowledge, with the engine's epsilon.
    pub fn minimal_max_regrets(&self) -> Result<MinimalMaxRegrets> {
        self.regrets()?.minimal_max_regrets(self.epsilon)
    }

    /// Gives back the knowledge gathered so far.
    pub fn into_knowledge(self) -> PrefKnowledge {
        self.knowledge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::StrategyFactory;
    use minimax_test::empty_knowledge;

    fn engine() -> ElicitationEngine {
        let factory = StrategyFactory::pessimistic(7);
        ElicitationEngine::new(empty_knowledge(3, 1), factory.build(), factory.epsilon())
            .with_parallelism(Parallelism::Sequential)
    }

    #[test]
    fn test_answer_before_question_is_invalid() {
        let mut engine = engine();
        assert!(matches!(
            engine.answer(Answer::Greater),
            Err(ElicitationError::InvalidState(_))
        ));
    }

    #[test]
    fn test_cycle() {
        let mut engine = engine();
        let before = engine.minimal_max_regrets().unwrap().value();

        let question = engine.next_question().unwrap();
        assert!(matches!(
            engine.next_question(),
            Err(ElicitationError::InvalidState(_))
        ));
        engine.answer(Answer::Lower).unwrap();
        assert_eq!(engine.answered(), 1);
        assert_eq!(engine.state(), EngineState::AwaitingQuestion);

        let after = engine.minimal_max_regrets().unwrap().value();
        assert!(after <= before + 1e-9);
        if let Question::Voter(q) = question {
            let pref = engine.knowledge().partial_preference(q.voter()).unwrap();
            assert!(pref.prefers(q.second(), q.first()));
        }
    }

    #[test]
    fn test_invalid_answer_keeps_question_pending() {
        let factory = StrategyFactory::random(1);
        let mut engine = ElicitationEngine::new(empty_knowledge(2, 1), factory.build(), 1e-6);
        let question = engine.next_question().unwrap();
        assert!(matches!(question, Question::Voter(_)));

        assert!(engine.answer(Answer::Equal).is_err());
        assert_eq!(engine.state(), EngineState::AwaitingAnswer(question));
        engine.answer(Answer::Greater).unwrap();
        assert_eq!(engine.answered(), 1);
    }
}
