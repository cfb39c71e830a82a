//! Simulated elicitation runs against an oracle.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use minimax_config::{ElicitationConfig, TerminationConfig};
use minimax_core::{Answer, ElicitationError, Oracle, PrefKnowledge, Question, Result};
use minimax_regret::{Parallelism, RegretComputer};

use crate::engine::ElicitationEngine;
use crate::factory::StrategyFactory;

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    QuestionLimit,
    TimeLimit,
    /// The minimal max regret reached zero, up to epsilon.
    ZeroRegret,
    /// The strategy had no question left to ask.
    Exhausted,
    /// A fixed question sequence was replayed to its end.
    Replayed,
}

impl fmt::Display for RunEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunEnd::QuestionLimit => "question limit",
            RunEnd::TimeLimit => "time limit",
            RunEnd::ZeroRegret => "zero regret",
            RunEnd::Exhausted => "strategy exhausted",
            RunEnd::Replayed => "replayed",
        };
        f.write_str(s)
    }
}

/// Record of one run: the questions, their answers and the MMR after each.
///
/// `mmr_history()[0]` is the MMR before any question and
/// `mmr_history()[k]` the MMR after the `k`-th answer.
#[derive(Clone, Debug)]
pub struct Run {
    description: String,
    questions: Vec<Question>,
    answers: Vec<Answer>,
    mmr_history: Vec<f64>,
    durations: Vec<Duration>,
    end: RunEnd,
}

impl Run {
    /// Asks `questions` to `oracle` in order, from empty knowledge.
    ///
    /// # Examples
    ///
    /// ```
    /// use minimax_core::{Alternative, Oracle, PsrWeights, QuestionVoter, Voter};
    /// use minimax_strategy::Run;
    /// use std::collections::BTreeMap;
    ///
    /// let (a1, a2, a3) = (Alternative::new(1), Alternative::new(2), Alternative::new(3));
    /// let v1 = Voter::new(1);
    /// let profile = BTreeMap::from([(v1, vec![a1, a2, a3])]);
    /// let oracle = Oracle::new(profile, PsrWeights::new(vec![1.0, 0.0, 0.0]).unwrap()).unwrap();
    ///
    /// let questions = [
    ///     QuestionVoter::new(v1, a1, a2).unwrap().into(),
    ///     QuestionVoter::new(v1, a2, a3).unwrap().into(),
    /// ];
    /// let run = Run::replay(&oracle, &questions, 1e-6).unwrap();
    /// let expected = [1.0, 1.0, 0.0];
    /// assert!(run.mmr_history().iter().zip(expected).all(|(a, b)| (a - b).abs() < 1e-6));
    /// ```
    pub fn replay(oracle: &Oracle, questions: &[Question], epsilon: f64) -> Result<Run> {
        let mut knowledge = knowledge_for(oracle)?;
        let mmr_of = |k: &PrefKnowledge| -> Result<f64> {
            RegretComputer::new(k)
                .with_parallelism(Parallelism::Sequential)
                .regrets()?
                .minimal_max_regret(epsilon)
        };
        let mut run = Run::start("Replay".to_string(), mmr_of(&knowledge)?);
        for question in questions {
            let started = Instant::now();
            let answer = oracle.answer(question)?;
            knowledge.update(question, answer)?;
            run.push(*question, answer, mmr_of(&knowledge)?, started.elapsed());
        }
        run.end = RunEnd::Replayed;
        Ok(run)
    }

    fn start(description: String, initial_mmr: f64) -> Self {
        Run {
            description,
            questions: Vec::new(),
            answers: Vec::new(),
            mmr_history: vec![initial_mmr],
            durations: Vec::new(),
            end: RunEnd::Replayed,
        }
    }

    fn push(&mut self, question: Question, answer: Answer, mmr: f64, duration: Duration) {
        self.questions.push(question);
        self.answers.push(answer);
        self.mmr_history.push(mmr);
        self.durations.push(duration);
    }

    /// Description of the strategy that asked the questions.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn mmr_history(&self) -> &[f64] {
        &self.mmr_history
    }

    /// Time spent on each question, selection and update included.
    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    pub fn total_duration(&self) -> Duration {
        self.durations.iter().sum()
    }

    pub fn end(&self) -> RunEnd {
        self.end
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn voter_question_count(&self) -> usize {
        self.questions.iter().filter(|q| q.as_voter().is_some()).count()
    }

    pub fn committee_question_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| q.as_committee().is_some())
            .count()
    }

    /// MMR after the last answer.
    pub fn final_mmr(&self) -> f64 {
        self.mmr_history.last().copied().unwrap_or(f64::INFINITY)
    }
}

/// Runs strategies against oracles under a termination policy.
///
/// # Examples
///
/// ```
/// use minimax_config::ElicitationConfig;
/// use minimax_core::{Alternative, Oracle, PsrWeights, Voter};
/// use minimax_strategy::{RunEnd, Runner};
/// use std::collections::BTreeMap;
///
/// let alternatives = Alternative::range(3);
/// let profile = BTreeMap::from([(Voter::new(1), alternatives.clone())]);
/// let oracle = Oracle::new(profile, PsrWeights::new(vec![1.0, 0.4, 0.0]).unwrap()).unwrap();
///
/// let config = ElicitationConfig::new().with_random_seed(1).with_question_limit(10);
/// let run = Runner::new(&config).unwrap().run(&oracle).unwrap();
///
/// assert_eq!(run.end(), RunEnd::ZeroRegret);
/// assert!(run.final_mmr() <= 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Runner {
    factory: StrategyFactory,
    termination: TerminationConfig,
}

impl Runner {
    pub fn new(config: &ElicitationConfig) -> Result<Self> {
        Ok(Runner {
            factory: StrategyFactory::from_config(config)?,
            termination: config.termination.clone(),
        })
    }

    pub fn from_factory(factory: StrategyFactory, termination: TerminationConfig) -> Self {
        Runner {
            factory,
            termination,
        }
    }

    pub fn factory(&self) -> &StrategyFactory {
        &self.factory
    }

    pub fn termination(&self) -> &TerminationConfig {
        &self.termination
    }

    /// Elicits from empty knowledge until a termination condition holds.
    ///
    /// An exhausted strategy ends the run normally with
    /// [`RunEnd::Exhausted`]; any other error aborts it.
    pub fn run(&self, oracle: &Oracle) -> Result<Run> {
        let epsilon = self.factory.epsilon();
        let knowledge = knowledge_for(oracle)?;
        let mut engine = ElicitationEngine::new(knowledge, self.factory.build(), epsilon)
            .with_parallelism(self.factory.parallelism().clone());

        let started = Instant::now();
        let mut run = Run::start(
            self.factory.describe(),
            engine.minimal_max_regrets()?.value(),
        );
        info!(
            event = "run_start",
            strategy = %run.description,
            seed = self.factory.seed(),
            alternatives = oracle.alternatives().len(),
            voters = oracle.voters().len(),
            mmr = run.final_mmr(),
        );

        run.end = loop {
            if let Some(end) = self.should_stop(&run, started.elapsed(), epsilon) {
                break end;
            }
            let question_started = Instant::now();
            let question = match engine.next_question() {
                Ok(q) => q,
                Err(ElicitationError::ExhaustedStrategy(reason)) => {
                    debug!(event = "strategy_exhausted", reason = %reason);
                    break RunEnd::Exhausted;
                }
                Err(e) => return Err(e),
            };
            let answer = oracle.answer(&question)?;
            engine.answer(answer)?;
            let mmr = engine.minimal_max_regrets()?.value();
            run.push(question, answer, mmr, question_started.elapsed());
            debug!(
                event = "question_answered",
                index = run.question_count(),
                question = %question,
                answer = ?answer,
                mmr,
            );
        };

        info!(
            event = "run_end",
            reason = %run.end,
            questions = run.question_count(),
            voter_questions = run.voter_question_count(),
            committee_questions = run.committee_question_count(),
            mmr = run.final_mmr(),
            duration_ms = started.elapsed().as_millis() as u64,
        );
        Ok(run)
    }

    fn should_stop(&self, run: &Run, elapsed: Duration, epsilon: f64) -> Option<RunEnd> {
        if self.termination.stop_at_zero_regret && run.final_mmr() <= epsilon {
            return Some(RunEnd::ZeroRegret);
        }
        if let Some(limit) = self.termination.question_limit {
            if run.question_count() >= limit {
                return Some(RunEnd::QuestionLimit);
            }
        }
        if let Some(limit) = self.termination.time_limit() {
            if elapsed >= limit {
                return Some(RunEnd::TimeLimit);
            }
        }
        None
    }
}

fn knowledge_for(oracle: &Oracle) -> Result<PrefKnowledge> {
    PrefKnowledge::new(&oracle.alternatives(), &oracle.voters())
}
