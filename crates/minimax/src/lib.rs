//! Minimax - Minimax-regret preference elicitation in Rust
//!
//! Elicits just enough of the voters' rankings and of the committee's
//! positional scoring weights to find an alternative whose worst-case loss
//! against the true winner is (close to) zero.
//!
//! # Example
//!
//! ```rust
//! use minimax::prelude::*;
//!
//! let oracle = Oracle::new(
//!     [(Voter::new(1), Alternative::range(3))].into_iter().collect(),
//!     PsrWeights::new(vec![1.0, 0.4, 0.0]).unwrap(),
//! )
//! .unwrap();
//!
//! let config = ElicitationConfig::new().with_random_seed(7).with_question_limit(10);
//! let run = minimax::elicit_with(&config, &oracle).unwrap();
//! assert!(run.final_mmr() <= 1e-6);
//! ```

use std::path::Path;

use tracing::warn;

pub use minimax_core::{
    Alternative, Answer, CommitteeConstraint, ComparisonOp, ElicitationError, LambdaRange,
    LpSolver, MinilpSolver, Oracle, PrefKnowledge, PsrWeights, Question, QuestionCommittee,
    QuestionKind, QuestionVoter, Result, Voter, VoterPartialPreference, WeightPolytope,
};
pub use minimax_config::{
    ConfigError, ElicitationConfig, LimitedConfig, LotteryPolicy, QuestioningConstraint,
    StrategyConfig, TerminationConfig, ThreadCount,
};
pub use minimax_regret::{
    MinimalMaxRegrets, PairwiseMaxRegret, Parallelism, RegretComputer, Regrets,
};
pub use minimax_strategy::{
    ElicitationEngine, EngineState, LotteryComparator, MmrLottery, QuestionQuota, Run, RunEnd,
    Runner, Strategy, StrategyByMmr, StrategyFactory, StrategyRandom,
};

#[cfg(feature = "console")]
pub mod console;

/// Configuration file read by [`elicit`].
pub const CONFIG_FILE: &str = "minimax.toml";

/// Runs an elicitation against `oracle` with the configuration in
/// [`CONFIG_FILE`], or the defaults when it cannot be read.
pub fn elicit(oracle: &Oracle) -> Result<Run> {
    let config = load_or_default(CONFIG_FILE);
    elicit_with(&config, oracle)
}

/// Runs an elicitation against `oracle` with `config`.
pub fn elicit_with(config: &ElicitationConfig, oracle: &Oracle) -> Result<Run> {
    #[cfg(feature = "console")]
    console::init();

    Runner::new(config)?.run(oracle)
}

fn load_or_default(path: impl AsRef<Path>) -> ElicitationConfig {
    let path = path.as_ref();
    if !path.exists() {
        return ElicitationConfig::default();
    }
    ElicitationConfig::load(path).unwrap_or_else(|e| {
        warn!(event = "config_fallback", path = %path.display(), error = %e);
        ElicitationConfig::default()
    })
}

pub mod prelude {
    pub use super::{
        Alternative, Answer, ElicitationConfig, ElicitationEngine, LimitedConfig, LotteryPolicy,
        Oracle, PrefKnowledge, PsrWeights, Question, RegretComputer, Run, Runner, Strategy,
        StrategyConfig, StrategyFactory, Voter,
    };
}
