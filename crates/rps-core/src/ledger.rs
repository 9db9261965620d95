//! Match score and the history of completed matches

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::moves::Slot;

/// Points won by each slot in the current match
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "playerOne")]
    pub one: u32,
    #[serde(rename = "playerTwo")]
    pub two: u32,
}

impl Score {
    pub fn get(&self, slot: Slot) -> u32 {
        match slot {
            Slot::One => self.one,
            Slot::Two => self.two,
        }
    }

    pub fn award(&mut self, slot: Slot) {
        match slot {
            Slot::One => self.one += 1,
            Slot::Two => self.two += 1,
        }
    }

    pub fn leading_points(&self) -> u32 {
        self.one.max(self.two)
    }

    /// Slot strictly ahead, if any
    pub fn leader(&self) -> Option<Slot> {
        if self.one > self.two {
            Some(Slot::One)
        } else if self.two > self.one {
            Some(Slot::Two)
        } else {
            None
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.one, self.two)
    }
}

/// Source of history timestamps
pub trait WallClock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl WallClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// One completed match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "date", with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "winner")]
    pub winner_label: String,
    #[serde(rename = "score")]
    pub final_score: String,
}

impl HistoryEntry {
    /// `2024-05-01T12:30:00.000Z`
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Append-only record of completed matches
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: Vec<HistoryEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive a finished match and return its entry.
    ///
    /// A match ends on the round that pushes one side to the target, and every
    /// decisive round scores for exactly one side, so the final score always
    /// has a strict leader.
    pub fn record(
        &mut self,
        final_score: Score,
        config: &MatchConfig,
        at: DateTime<Utc>,
    ) -> &HistoryEntry {
        debug_assert!(
            config.is_complete(final_score),
            "match {} recorded before reaching {}",
            final_score,
            config.target_points
        );
        let winner = final_score
            .leader()
            .unwrap_or_else(|| panic!("completed match tied at {}", final_score));

        self.entries.push(HistoryEntry {
            timestamp: at,
            winner_label: winner.label().to_string(),
            final_score: final_score.to_string(),
        });
        tracing::info!(
            winner = winner.label(),
            score = %final_score,
            mode = %config.mode,
            matches = self.entries.len(),
            "match archived"
        );
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Matches won by `slot`
    pub fn wins_for(&self, slot: Slot) -> usize {
        self.entries.iter().filter(|e| e.winner_label == slot.label()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, TargetPoints};
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn config(target: i64) -> MatchConfig {
        MatchConfig::new(Mode::Player, TargetPoints::new(target).unwrap())
    }

    #[test]
    fn test_score_award_and_display() {
        let mut score = Score::default();
        score.award(Slot::One);
        score.award(Slot::One);
        score.award(Slot::Two);
        assert_eq!(score, Score { one: 2, two: 1 });
        assert_eq!(score.to_string(), "2-1");
        assert_eq!(score.get(Slot::Two), 1);
        assert_eq!(score.leader(), Some(Slot::One));
        assert_eq!(Score::default().leader(), None);
    }

    #[test]
    fn test_record_player_one() {
        let mut ledger = Ledger::new();
        let entry = ledger.record(Score { one: 2, two: 0 }, &config(2), at()).clone();
        assert_eq!(entry.winner_label, "Player One");
        assert_eq!(entry.final_score, "2-0");
        assert_eq!(entry.iso_timestamp(), "2024-05-01T12:30:00.000Z");
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_record_player_two_and_tally() {
        let mut ledger = Ledger::new();
        ledger.record(Score { one: 1, two: 3 }, &config(3), at());
        ledger.record(Score { one: 3, two: 2 }, &config(3), at());
        ledger.record(Score { one: 0, two: 3 }, &config(3), at());
        assert_eq!(ledger.wins_for(Slot::Two), 2);
        assert_eq!(ledger.wins_for(Slot::One), 1);
        assert_eq!(ledger.last().unwrap().final_score, "0-3");
        let order: Vec<_> = ledger.entries().iter().map(|e| e.final_score.as_str()).collect();
        assert_eq!(order, ["1-3", "3-2", "0-3"]);
    }

    #[test]
    #[should_panic(expected = "tied")]
    fn test_tied_completion_is_an_invariant_violation() {
        let mut ledger = Ledger::new();
        ledger.record(Score { one: 2, two: 2 }, &config(2), at());
    }

    #[test]
    fn test_entry_json_shape() {
        let mut ledger = Ledger::new();
        ledger.record(Score { one: 2, two: 1 }, &config(2), at());
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "date": "2024-05-01T12:30:00.000Z",
                "winner": "Player One",
                "score": "2-1"
            }])
        );

        let back: Ledger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn test_score_json_shape() {
        let json = serde_json::to_value(Score { one: 4, two: 1 }).unwrap();
        assert_eq!(json, serde_json::json!({ "playerOne": 4, "playerTwo": 1 }));
    }
}
