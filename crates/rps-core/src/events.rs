//! Notifications from the controller to the presentation layer

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::identity::MatchSummary;
use crate::ledger::{HistoryEntry, Score};
use crate::moves::{Move, RoundOutcome, Slot};
use crate::session::{Phase, Snapshot};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameEvent {
    /// Full board state after any change
    StateChanged(Snapshot),
    PhaseChanged { phase: Phase },
    MoveSubmitted {
        slot: Slot,
        #[serde(rename = "move")]
        choice: Move,
    },
    /// The CPU has picked but not yet revealed
    CpuThinking,
    CpuRevealed {
        #[serde(rename = "move")]
        choice: Move,
    },
    RoundResolved {
        one: Move,
        two: Move,
        outcome: RoundOutcome,
        score: Score,
    },
    /// Text for the speech side channel
    Announce { text: String },
    MatchCompleted {
        winner: Slot,
        #[serde(rename = "finalScore")]
        final_score: Score,
    },
    HistoryAppended { entry: HistoryEntry },
    SummaryReady { summary: MatchSummary },
    /// Board returned to mode selection
    SessionReset,
}

/// Receives every event the controller emits, in emission order
pub trait Observer {
    fn notify(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> Observer for F {
    fn notify(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Buffers events for hosts that poll instead of reacting.
/// Clones share one buffer.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything buffered so far
    pub fn take(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl Observer for EventLog {
    fn notify(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_shares_buffer() {
        let log = EventLog::new();
        let mut writer = log.clone();
        writer.notify(&GameEvent::CpuThinking);
        writer.notify(&GameEvent::SessionReset);
        assert_eq!(log.len(), 2);
        assert_eq!(log.take(), vec![GameEvent::CpuThinking, GameEvent::SessionReset]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_closures_observe() {
        let mut seen = Vec::new();
        {
            let mut obs = |e: &GameEvent| seen.push(e.clone());
            obs.notify(&GameEvent::Announce { text: "It's a tie!".into() });
        }
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::MoveSubmitted { slot: Slot::Two, choice: Move::Paper };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "moveSubmitted", "slot": "two", "move": "paper" })
        );

        let json =
            serde_json::to_value(GameEvent::PhaseChanged { phase: Phase::Settling }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "phaseChanged", "phase": "settling" }));
    }
}
