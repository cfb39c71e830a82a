//! Question selection and the elicitation loop.
//!
//! This crate decides which question to ask next and drives runs:
//! - `StrategyByMmr`: the question whose worst answer leaves the smallest MMR
//! - `StrategyRandom`: a uniformly random askable question
//! - `QuestionQuota`: sequencing constraints such as "two committee
//!   questions, then voters only"
//! - `ElicitationEngine`: the question/answer state machine
//! - `Runner`: a single run against an [`Oracle`](minimax_core::Oracle)

pub mod candidates;
pub mod engine;
pub mod factory;
pub mod lottery;
pub mod quota;
pub mod runner;
pub mod strategy;

pub use engine::{ElicitationEngine, EngineState};
pub use factory::StrategyFactory;
pub use lottery::{LotteryComparator, MmrLottery};
pub use quota::QuestionQuota;
pub use runner::{Run, RunEnd, Runner};
pub use strategy::{Strategy, StrategyByMmr, StrategyRandom};
