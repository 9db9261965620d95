//! Rock-Paper-Scissors match engine
//!
//! Round resolution, CPU opponent, score tracking and match history for the
//! browser game. This crate is compiled to:
//! - Native (tests and any Rust host)
//! - WASM (the browser frontend, behind the `wasm` feature)

mod config;
mod controller;
mod error;
mod events;
mod identity;
mod ledger;
mod moves;
mod random;
mod session;
mod timeline;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::{MatchConfig, Mode, TargetPoints, Timings, DEFAULT_TARGET_POINTS};
pub use controller::RoundController;
pub use error::{ConfigError, ParseMoveError, ParseSlotError, SubmitError};
pub use events::{EventLog, GameEvent, Observer};
pub use identity::{IdentityProvider, MatchSummary, UserProfile, SUMMARY_FILE_NAME};
pub use ledger::{FixedClock, HistoryEntry, Ledger, Score, SystemClock, WallClock};
pub use moves::{Move, RoundOutcome, Slot};
pub use random::{MoveSource, RandMoves, ScriptedMoves, SeededRng};
pub use session::{MatchSession, PendingMoves, Phase, Snapshot};
pub use timeline::{Millis, Timeline, TimerId};

/// Outcome of a round given each slot's move
pub fn resolve(one: Move, two: Move) -> RoundOutcome {
    match (one, two) {
        (a, b) if a == b => RoundOutcome::Tie,
        (Move::Rock, Move::Scissors)
        | (Move::Scissors, Move::Paper)
        | (Move::Paper, Move::Rock) => RoundOutcome::PlayerOneWins,
        _ => RoundOutcome::PlayerTwoWins,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use proptest::prelude::*;
    use proptest::sample::select;

    use crate::Move;

    pub fn any_move() -> impl Strategy<Value = Move> {
        select(Move::ALL.to_vec())
    }

    /// Route `tracing` output to the test harness; RUST_LOG picks the level
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::test_support::any_move;

    #[test]
    fn test_outcome_table() {
        use crate::Move::*;
        use crate::RoundOutcome::*;

        assert_eq!(resolve(Rock, Scissors), PlayerOneWins);
        assert_eq!(resolve(Scissors, Paper), PlayerOneWins);
        assert_eq!(resolve(Paper, Rock), PlayerOneWins);

        assert_eq!(resolve(Scissors, Rock), PlayerTwoWins);
        assert_eq!(resolve(Paper, Scissors), PlayerTwoWins);
        assert_eq!(resolve(Rock, Paper), PlayerTwoWins);

        assert_eq!(resolve(Rock, Rock), Tie);
        assert_eq!(resolve(Paper, Paper), Tie);
        assert_eq!(resolve(Scissors, Scissors), Tie);
    }

    proptest! {
        #[test]
        fn prop_swapping_slots_swaps_winner(a in any_move(), b in any_move()) {
            let forward = resolve(a, b);
            let backward = resolve(b, a);
            prop_assert_eq!(forward.winner(), backward.winner().map(Slot::other));
        }

        #[test]
        fn prop_agrees_with_dominance(a in any_move(), b in any_move()) {
            let expected = if a == b {
                RoundOutcome::Tie
            } else if a.beats(b) {
                RoundOutcome::PlayerOneWins
            } else {
                RoundOutcome::PlayerTwoWins
            };
            prop_assert_eq!(resolve(a, b), expected);
        }
    }
}
