//! Minimax Core - Data model for minimax-regret preference elicitation
//!
//! This crate provides the fundamental abstractions:
//! - Alternatives and voters
//! - Positional scoring rule weights and the polytope of feasible weights
//! - Per-voter partial strict orders
//! - The preference knowledge gathered during elicitation
//! - Questions, answers and the simulated oracle
//! - The linear programming boundary used to query the weight polytope

pub mod error;
pub mod ids;
pub mod knowledge;
pub mod lp;
pub mod oracle;
pub mod polytope;
pub mod preference;
pub mod question;
pub mod weights;

pub use error::{ElicitationError, Result};
pub use ids::{Alternative, Voter};
pub use knowledge::PrefKnowledge;
pub use lp::{
    ComparisonOp, LinearConstraint, LinearProgram, LpError, LpSolution, LpSolver, MinilpSolver,
};
pub use oracle::Oracle;
pub use polytope::{CommitteeConstraint, LambdaRange, WeightPolytope};
pub use preference::VoterPartialPreference;
pub use question::{Answer, Question, QuestionCommittee, QuestionKind, QuestionVoter};
pub use weights::PsrWeights;
