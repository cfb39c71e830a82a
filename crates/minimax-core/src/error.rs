//! Error types for minimax elicitation

use thiserror::Error;

/// Main error type for elicitation operations.
///
/// None of these conditions is transient: each one reveals a contradiction,
/// a misconfiguration or a solver failure, and is propagated to the driver.
#[derive(Debug, Error)]
pub enum ElicitationError {
    /// Malformed or contradictory voter question
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    /// A committee answer empties the weight polytope
    #[error("Infeasible constraint: {0}")]
    InfeasibleConstraint(String),

    /// Sequencing quotas leave no legal question
    #[error("Strategy exhausted: {0}")]
    ExhaustedStrategy(String),

    /// The linear programming layer failed
    #[error("LP solver error: {0}")]
    LpSolver(String),

    /// Weight vector violating the positional scoring rule invariants
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Argument outside its documented domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Regret values clustered too close for the configured epsilon
    #[error("Inconsistent regrets: {0}")]
    InconsistentRegrets(String),

    /// Invalid operation for the current engine state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for elicitation operations
pub type Result<T> = std::result::Result<T, ElicitationError>;
