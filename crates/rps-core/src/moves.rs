//! Moves, player slots and round outcomes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseMoveError, ParseSlotError};

/// A hand shape thrown in a round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Every move, in the order the board shows them
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// The move this one defeats
    pub fn victim(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Scissors => Move::Paper,
            Move::Paper => Move::Rock,
        }
    }

    /// Whether this move wins against `other`
    pub fn beats(self, other: Move) -> bool {
        self.victim() == other
    }

    /// Lowercase name, as used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// Seat a move is submitted into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    /// The opposing seat
    pub fn other(self) -> Slot {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }

    /// Name used in announcements and history
    pub fn label(self) -> &'static str {
        match self {
            Slot::One => "Player One",
            Slot::Two => "Player Two",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" | "1" => Ok(Slot::One),
            "two" | "2" => Ok(Slot::Two),
            _ => Err(ParseSlotError(s.to_string())),
        }
    }
}

/// Result of a single round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundOutcome {
    PlayerOneWins,
    PlayerTwoWins,
    Tie,
}

impl RoundOutcome {
    /// Slot that takes the point; `None` on a tie
    pub fn winner(self) -> Option<Slot> {
        match self {
            RoundOutcome::PlayerOneWins => Some(Slot::One),
            RoundOutcome::PlayerTwoWins => Some(Slot::Two),
            RoundOutcome::Tie => None,
        }
    }

    /// Neither slot scores
    pub fn is_tie(self) -> bool {
        self == RoundOutcome::Tie
    }

    /// Line shown in the result overlay and read out by speech synthesis
    pub fn announcement(self) -> &'static str {
        match self {
            RoundOutcome::PlayerOneWins => "Player One wins!",
            RoundOutcome::PlayerTwoWins => "Player Two wins!",
            RoundOutcome::Tie => "It's a tie!",
        }
    }
}
