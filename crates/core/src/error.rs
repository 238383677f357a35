use std::fmt;
use thiserror::Error;

/// Search phase that asked a choice policy for a decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Selection,
    Expansion,
    Simulation,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Selection => write!(f, "selection"),
            Phase::Expansion => write!(f, "expansion"),
            Phase::Simulation => write!(f, "simulation"),
        }
    }
}

/// Errors raised by the MCTS engine.
///
/// Apart from `InvalidMove`, every variant is a broken `Game` contract or a
/// misuse of the engine phases. None of them are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MctsError {
    #[error("game reported no scores for a finished board")]
    EmptyScoreSet,

    #[error("move {0} was already expanded from this node")]
    DuplicateMoveKey(String),

    #[error("{0} policy was asked to choose from no candidates")]
    EmptyChoiceSet(Phase),

    #[error("Invalid move: {0}")]
    InvalidMove(String),
}

/// Convenience Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MctsError>;
