//! Builds strategies from configuration.

use rand::Rng;
use tracing::debug;

use minimax_config::{ElicitationConfig, LimitedConfig, StrategyConfig, ThreadCount};
use minimax_core::{ElicitationError, Result};
use minimax_regret::Parallelism;

use crate::strategy::{Strategy, StrategyByMmr, StrategyRandom};

/// Creates fresh strategies sharing a family, a seed and an epsilon.
///
/// Every built strategy starts from the same seed, so two strategies from
/// one factory ask the same questions when given the same answers.
///
/// # Examples
///
/// ```
/// use minimax_config::{ElicitationConfig, LimitedConfig, StrategyConfig};
/// use minimax_strategy::{Strategy, StrategyFactory};
///
/// let config = ElicitationConfig::new()
///     .with_random_seed(3)
///     .with_strategy(StrategyConfig::Limited(LimitedConfig::committee_then_voters(2)));
/// let factory = StrategyFactory::from_config(&config).unwrap();
///
/// assert_eq!(factory.seed(), 3);
/// assert_eq!(factory.describe(), "Limited, constrained to [2c, ∞v]");
/// assert_eq!(factory.build().describe(), factory.describe());
/// ```
#[derive(Debug, Clone)]
pub struct StrategyFactory {
    config: StrategyConfig,
    seed: u64,
    epsilon: f64,
    parallelism: Parallelism,
}

impl StrategyFactory {
    /// Validates `config` and resolves its seed and thread count.
    ///
    /// Without a configured seed one is drawn from the OS.
    pub fn from_config(config: &ElicitationConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ElicitationError::InvalidArgument(e.to_string()))?;
        let seed = config.random_seed.unwrap_or_else(|| rand::rng().random());
        let parallelism = parallelism_for(&config.regret_thread_count)?;
        debug!(
            event = "strategy_factory",
            strategy = %config.strategy.describe(),
            seed,
            epsilon = config.epsilon,
        );
        Ok(StrategyFactory {
            config: config.strategy.clone(),
            seed,
            epsilon: config.epsilon,
            parallelism,
        })
    }

    pub fn new(config: StrategyConfig, seed: u64, epsilon: f64) -> Self {
        StrategyFactory {
            config,
            seed,
            epsilon,
            parallelism: Parallelism::default(),
        }
    }

    /// Pessimistic family with the default lottery.
    pub fn pessimistic(seed: u64) -> Self {
        Self::new(StrategyConfig::default(), seed, minimax_config::DEFAULT_EPSILON)
    }

    pub fn limited(seed: u64, config: LimitedConfig) -> Self {
        Self::new(
            StrategyConfig::Limited(config),
            seed,
            minimax_config::DEFAULT_EPSILON,
        )
    }

    pub fn random(seed: u64) -> Self {
        Self::new(StrategyConfig::Random, seed, minimax_config::DEFAULT_EPSILON)
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn parallelism(&self) -> &Parallelism {
        &self.parallelism
    }

    pub fn describe(&self) -> String {
        self.config.describe()
    }

    /// A new strategy in its initial state.
    pub fn build(&self) -> Box<dyn Strategy> {
        match &self.config {
            StrategyConfig::Pessimistic(c) => Box::new(
                StrategyByMmr::pessimistic(c.lottery, self.epsilon, self.seed)
                    .with_parallelism(self.parallelism.clone()),
            ),
            StrategyConfig::Limited(c) => Box::new(
                StrategyByMmr::limited(c.lottery, c.constraints.clone(), self.epsilon, self.seed)
                    .with_parallelism(self.parallelism.clone()),
            ),
            StrategyConfig::Random => Box::new(StrategyRandom::new(self.seed)),
        }
    }
}

/// Maps a configured thread count onto a rayon scheduling.
pub fn parallelism_for(count: &ThreadCount) -> Result<Parallelism> {
    match count {
        ThreadCount::Auto => Ok(Parallelism::Global),
        ThreadCount::None => Ok(Parallelism::Sequential),
        ThreadCount::Count(n) => Parallelism::with_threads(*n),
    }
}
