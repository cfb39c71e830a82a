//! Configuration system for minimax elicitation.
//!
//! Load elicitation settings (strategy family, sequencing constraints,
//! epsilon, termination) from TOML or YAML without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use minimax_config::{ElicitationConfig, StrategyConfig};
//!
//! let config = ElicitationConfig::from_toml_str(r#"
//!     random_seed = 7
//!     epsilon = 1e-9
//!
//!     [termination]
//!     question_limit = 30
//!
//!     [strategy]
//!     family = "limited"
//!     constraints = [
//!         { kind = "committee", number = 2 },
//!         { kind = "voter" },
//!     ]
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.termination.question_limit, Some(30));
//! assert_eq!(config.strategy.describe(), "Limited, constrained to [2c, ∞v]");
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use minimax_config::ElicitationConfig;
//!
//! let config = ElicitationConfig::load("elicitation.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use minimax_core::QuestionKind;

/// Epsilon used when none is configured.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main elicitation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ElicitationConfig {
    /// Random seed for reproducible question sequences.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Tolerance used when comparing regret values.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// Threads used for the PMR solves of one regret pass.
    #[serde(default)]
    pub regret_thread_count: ThreadCount,

    /// Strategy choosing the next question.
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// When a run stops.
    #[serde(default)]
    pub termination: TerminationConfig,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for ElicitationConfig {
    fn default() -> Self {
        ElicitationConfig {
            random_seed: None,
            epsilon: DEFAULT_EPSILON,
            regret_thread_count: ThreadCount::default(),
            strategy: StrategyConfig::default(),
            termination: TerminationConfig::default(),
        }
    }
}

impl ElicitationConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the maximal number of questions of a run.
    pub fn with_question_limit(mut self, limit: usize) -> Self {
        self.termination.question_limit = Some(limit);
        self
    }

    pub fn with_regret_thread_count(mut self, count: ThreadCount) -> Self {
        self.regret_thread_count = count;
        self
    }

    /// Checks values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "epsilon must be finite and non negative, got {}",
                self.epsilon
            )));
        }
        if self.regret_thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "regret_thread_count must be at least 1".into(),
            ));
        }
        if let StrategyConfig::Limited(limited) = &self.strategy {
            if let Some(c) = limited.constraints.iter().find(|c| c.number == Some(0)) {
                return Err(ConfigError::Invalid(format!(
                    "questioning constraint on {:?} questions allows none",
                    c.kind
                )));
            }
        }
        Ok(())
    }

    /// Returns the termination time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.time_limit()
    }
}

/// Thread count configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Rayon's global pool.
    #[default]
    Auto,

    /// Everything on the calling thread.
    None,

    /// Dedicated pool with a specific number of threads.
    Count(usize),
}

/// Termination configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum number of questions asked.
    #[serde(default)]
    pub question_limit: Option<usize>,

    /// Stop as soon as the minimal max regret reaches 0.
    #[serde(default = "default_true")]
    pub stop_at_zero_regret: bool,

    /// Maximum seconds spent asking.
    #[serde(default)]
    pub seconds_spent_limit: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl Default for TerminationConfig {
    fn default() -> Self {
        TerminationConfig {
            question_limit: None,
            stop_at_zero_regret: true,
            seconds_spent_limit: None,
        }
    }
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        self.seconds_spent_limit.map(Duration::from_secs)
    }
}

/// How two candidate lotteries are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LotteryPolicy {
    /// Pessimistic: smallest worst outcome, then smallest best outcome.
    #[default]
    Max,

    /// Optimistic: smallest best outcome, then smallest worst outcome.
    Min,

    /// Smallest average of both outcomes.
    Mean,
}

impl fmt::Display for LotteryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotteryPolicy::Max => write!(f, "Max"),
            LotteryPolicy::Min => write!(f, "Min"),
            LotteryPolicy::Mean => write!(f, "Mean"),
        }
    }
}

/// At most `number` questions of `kind`; `None` means no bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QuestioningConstraint {
    pub kind: QuestionKind,
    #[serde(default)]
    pub number: Option<usize>,
}

impl QuestioningConstraint {
    pub fn of(kind: QuestionKind, number: usize) -> Self {
        QuestioningConstraint {
            kind,
            number: Some(number),
        }
    }

    pub fn unbounded(kind: QuestionKind) -> Self {
        QuestioningConstraint { kind, number: None }
    }
}

impl fmt::Display for QuestioningConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number {
            Some(n) => write!(f, "{}{}", n, self.kind.tag()),
            None => write!(f, "∞{}", self.kind.tag()),
        }
    }
}

/// Strategy family.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Question minimizing the predicted MMR, no sequencing constraint.
    Pessimistic(PessimisticConfig),

    /// Like `Pessimistic`, with questions sequenced by kind.
    Limited(LimitedConfig),

    /// Uniformly random askable question.
    Random,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::Pessimistic(PessimisticConfig::default())
    }
}

impl StrategyConfig {
    /// Short description, without the seed.
    pub fn describe(&self) -> String {
        match self {
            StrategyConfig::Pessimistic(c) => format!("By MMR {}", c.lottery),
            StrategyConfig::Limited(c) => {
                let phases: Vec<String> = c.constraints.iter().map(|q| q.to_string()).collect();
                let lottery = match c.lottery {
                    LotteryPolicy::Max => String::new(),
                    other => format!(" {other}"),
                };
                format!("Limited{}, constrained to [{}]", lottery, phases.join(", "))
            }
            StrategyConfig::Random => "Random".to_string(),
        }
    }
}

/// Pessimistic strategy configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PessimisticConfig {
    #[serde(default)]
    pub lottery: LotteryPolicy,
}

/// Limited strategy configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LimitedConfig {
    #[serde(default)]
    pub lottery: LotteryPolicy,

    /// Phases, asked in order. Empty means unconstrained.
    #[serde(default)]
    pub constraints: Vec<QuestioningConstraint>,
}

impl LimitedConfig {
    /// `committee_questions` committee questions, then voter questions only.
    pub fn committee_then_voters(committee_questions: usize) -> Self {
        LimitedConfig {
            lottery: LotteryPolicy::Max,
            constraints: vec![
                QuestioningConstraint::of(QuestionKind::Committee, committee_questions),
                QuestioningConstraint::unbounded(QuestionKind::Voter),
            ],
        }
    }

    /// `voter_questions` voter questions, then committee questions only.
    pub fn voters_then_committee(voter_questions: usize) -> Self {
        LimitedConfig {
            lottery: LotteryPolicy::Max,
            constraints: vec![
                QuestioningConstraint::of(QuestionKind::Voter, voter_questions),
                QuestioningConstraint::unbounded(QuestionKind::Committee),
            ],
        }
    }

    pub fn with_lottery(mut self, lottery: LotteryPolicy) -> Self {
        self.lottery = lottery;
        self
    }
}
