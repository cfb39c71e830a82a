//! Regret computation for minimax-regret elicitation.
//!
//! This crate turns the [`PrefKnowledge`](minimax_core::PrefKnowledge)
//! gathered so far into regret figures:
//! - `PairwiseMaxRegret`: the worst-case loss of choosing `x` instead of `y`
//! - `RegretComputer`: rank bounds per voter and one LP solve per pair
//! - `Regrets`: the max regret of every alternative and the minimal max
//!   regret (MMR) selection with an explicit epsilon

pub mod computer;
pub mod pmr;
pub mod regrets;

pub use computer::{Parallelism, RegretComputer};
pub use pmr::PairwiseMaxRegret;
pub use regrets::{MinimalMaxRegrets, Regrets};
