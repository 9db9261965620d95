//! Error types
//!
//! Nothing here is fatal. Configuration errors are corrected to defaults by the
//! caller, submission errors leave the match untouched.

use thiserror::Error;

use crate::moves::Slot;

/// Rejected match configuration input
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("target points {0:?} is not a number")]
    NotANumber(String),

    #[error("target points must be at least 1, got {0}")]
    NonPositive(i64),

    #[error("unknown game mode {0:?} (expected \"cpu\" or \"player\")")]
    UnknownMode(String),
}

/// Why a move submission was ignored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no match in progress, pick a game mode first")]
    NoActiveMatch,

    #[error("{0} has already chosen this round")]
    DuplicateSubmission(Slot),

    #[error("{0} is played by the CPU")]
    ReservedSlot(Slot),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown move {0:?} (expected rock, paper or scissors)")]
pub struct ParseMoveError(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown player slot {0:?} (expected \"one\" or \"two\")")]
pub struct ParseSlotError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_slot() {
        assert_eq!(
            SubmitError::DuplicateSubmission(Slot::One).to_string(),
            "Player One has already chosen this round"
        );
        assert_eq!(
            SubmitError::ReservedSlot(Slot::Two).to_string(),
            "Player Two is played by the CPU"
        );
    }

    #[test]
    fn test_config_messages() {
        assert_eq!(
            ConfigError::NonPositive(-5).to_string(),
            "target points must be at least 1, got -5"
        );
        assert!(ConfigError::NotANumber("ten".into()).to_string().contains("\"ten\""));
    }
}
