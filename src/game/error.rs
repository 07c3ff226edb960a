use thiserror::Error;

use super::types::NightTurn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Malformed initial roster. Session creation must abort.
    #[error("invalid roster: {reason}")]
    InvalidRoster { reason: String },

    /// The driving loop handed the sequencer a turn that is not part of tonight's order.
    #[error("turn {turn} is not part of the night order for day {day}")]
    InvalidTurn { turn: NightTurn, day: u32 },

    #[error("no popup is pending")]
    EmptyQueue,

    #[error("action rejected: {reason}")]
    ActionRejected { reason: String },
}

impl GameError {
    pub fn invalid_roster(reason: impl Into<String>) -> Self {
        Self::InvalidRoster { reason: reason.into() }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::ActionRejected { reason: reason.into() }
    }

    /// Stable code sent to clients in error frames.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidRoster { .. } => "INVALID_ROSTER",
            GameError::InvalidTurn { .. } => "INVALID_TURN",
            GameError::EmptyQueue => "NO_POPUP",
            GameError::ActionRejected { .. } => "INVALID_ACTION",
        }
    }
}
