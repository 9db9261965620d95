//! Live match state owned by the round controller

use serde::{Deserialize, Serialize};

use crate::config::{MatchConfig, Mode};
use crate::ledger::{HistoryEntry, Score};
use crate::moves::{Move, RoundOutcome, Slot};

/// Where the match is in its round cycle.
///
/// `BothSubmitted` and `Resolved` are instantaneous: observers see them
/// announced, but the controller immediately moves on to `Settling` and to
/// `Clearing` or `MatchComplete` respectively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    AwaitingConfig,
    AwaitingMoves,
    BothSubmitted,
    Settling,
    Resolved,
    Clearing,
    MatchComplete,
}

/// Moves locked in for the current round
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMoves {
    pub one: Option<Move>,
    pub two: Option<Move>,
}

impl PendingMoves {
    /// Move locked in for `slot`, if any
    pub fn get(&self, slot: Slot) -> Option<Move> {
        match slot {
            Slot::One => self.one,
            Slot::Two => self.two,
        }
    }

    /// Whether `slot` has chosen this round
    pub fn is_filled(&self, slot: Slot) -> bool {
        self.get(slot).is_some()
    }

    /// Fill an empty slot; a slot's choice is final for the round
    pub fn fill(&mut self, slot: Slot, m: Move) -> bool {
        let target = match slot {
            Slot::One => &mut self.one,
            Slot::Two => &mut self.two,
        };
        if target.is_some() {
            return false;
        }
        *target = Some(m);
        true
    }

    /// Both moves once the round is full
    pub fn both(&self) -> Option<(Move, Move)> {
        Some((self.one?, self.two?))
    }

    /// Empty both slots
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One match from configuration to completion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSession {
    config: MatchConfig,
    score: Score,
    pending: PendingMoves,
    last_outcome: Option<RoundOutcome>,
    cpu_thinking: bool,
    rounds_played: u32,
}

impl MatchSession {
    /// Fresh match at 0-0 with no moves locked in
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            score: Score::default(),
            pending: PendingMoves::default(),
            last_outcome: None,
            cpu_thinking: false,
            rounds_played: 0,
        }
    }

    /// Mode and target this match was started with
    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// Points won so far
    pub fn score(&self) -> Score {
        self.score
    }

    /// Moves locked in for the round being played
    pub fn pending(&self) -> PendingMoves {
        self.pending
    }

    /// Outcome of the most recently resolved round
    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    /// The CPU has picked but not yet revealed
    pub fn cpu_thinking(&self) -> bool {
        self.cpu_thinking
    }

    /// Resolved rounds, ties included
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Whether `slot` is driven by the CPU rather than a person
    pub fn is_cpu_slot(&self, slot: Slot) -> bool {
        self.config.mode == Mode::Cpu && slot == Slot::Two
    }

    /// Either side has reached the target
    pub fn is_complete(&self) -> bool {
        self.config.is_complete(self.score)
    }

    pub(crate) fn fill(&mut self, slot: Slot, m: Move) -> bool {
        self.pending.fill(slot, m)
    }

    pub(crate) fn set_cpu_thinking(&mut self, thinking: bool) {
        self.cpu_thinking = thinking;
    }

    /// Score a resolved round
    pub(crate) fn apply(&mut self, outcome: RoundOutcome) {
        if let Some(winner) = outcome.winner() {
            self.score.award(winner);
        }
        self.last_outcome = Some(outcome);
        self.rounds_played += 1;
    }

    /// Open the next round; the last outcome stays visible until one replaces it
    pub(crate) fn clear_round(&mut self) {
        self.pending.clear();
    }
}

/// Everything the presentation layer needs to draw the board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: Phase,
    pub mode: Option<Mode>,
    pub target_points: Option<u32>,
    pub pending: PendingMoves,
    pub cpu_thinking: bool,
    pub last_outcome: Option<RoundOutcome>,
    pub score: Score,
    pub rounds_played: u32,
    pub history: Vec<HistoryEntry>,
}

impl Snapshot {
    /// Serialize in the shape the frontend reads
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
