//! Error codes for match and tournament setup and execution

use thiserror::Error;

use crate::Action;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GameError {
    #[error("n_rounds must be greater than 0")]
    InvalidRounds,

    #[error("repetitions must be at least 1")]
    InvalidRepetitions,

    #[error("error probability {0} is outside [0, 1]")]
    InvalidErrorProbability(f64),

    #[error("game needs at least one action")]
    EmptyActionRange,

    #[error("tournament needs at least one participant")]
    NoParticipants,

    #[error("participant name `{0}` is used more than once")]
    DuplicateParticipant(String),

    #[error("strategy of `{participant}` chose action {action}, outside 0..{action_count}")]
    ActionOutOfRange {
        participant: String,
        action: Action,
        action_count: u8,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::InvalidConfig(err.to_string())
    }
}

/// Reject probabilities outside `[0, 1]`, NaN included.
pub(crate) fn check_probability(error: f64) -> Result<(), GameError> {
    if (0.0..=1.0).contains(&error) {
        Ok(())
    } else {
        Err(GameError::InvalidErrorProbability(error))
    }
}
