//! Match configuration and phase timings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ledger::Score;

/// Target used whenever the requested one is unusable
pub const DEFAULT_TARGET_POINTS: u32 = 10;

/// Who sits in slot two
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Cpu,
    Player,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Cpu => "cpu",
            Mode::Player => "player",
        }
    }

    /// Shown as "Playing vs ..." in the header
    pub fn opponent_label(self) -> &'static str {
        match self {
            Mode::Cpu => "CPU",
            Mode::Player => "Player",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Mode::Cpu),
            "player" => Ok(Mode::Player),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Points needed to win a match, always at least 1
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct TargetPoints(u32);

impl TargetPoints {
    pub fn new(points: i64) -> Result<Self, ConfigError> {
        if points < 1 {
            return Err(ConfigError::NonPositive(points));
        }
        Ok(Self(u32::try_from(points).unwrap_or(u32::MAX)))
    }

    /// Parse form input. Fractions round up: a whole-number score reaches
    /// 2.5 exactly when it reaches 3.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber(raw.to_string()))?;
        if !value.is_finite() {
            return Err(ConfigError::NotANumber(raw.to_string()));
        }
        Self::new(value.ceil() as i64)
    }

    /// Like [`TargetPoints::new`], falling back to the default
    pub fn coerce(points: i64) -> Self {
        Self::new(points).unwrap_or_else(Self::corrected)
    }

    /// Like [`TargetPoints::parse`], falling back to the default
    pub fn coerce_str(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(Self::corrected)
    }

    fn corrected(err: ConfigError) -> Self {
        tracing::warn!(%err, default = DEFAULT_TARGET_POINTS, "target points corrected to default");
        Self::default()
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_reached(self, score: Score) -> bool {
        score.leading_points() >= self.0
    }
}

impl Default for TargetPoints {
    fn default() -> Self {
        Self(DEFAULT_TARGET_POINTS)
    }
}

impl TryFrom<i64> for TargetPoints {
    type Error = ConfigError;

    fn try_from(points: i64) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<TargetPoints> for u32 {
    fn from(target: TargetPoints) -> u32 {
        target.0
    }
}

impl fmt::Display for TargetPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings fixed for the lifetime of one match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub mode: Mode,
    pub target_points: TargetPoints,
}

impl MatchConfig {
    pub fn new(mode: Mode, target_points: TargetPoints) -> Self {
        Self { mode, target_points }
    }

    /// Whether `score` ends the match
    pub fn is_complete(&self, score: Score) -> bool {
        self.target_points.is_reached(score)
    }
}

/// Delays between phases, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timings {
    /// CPU "thinking" before its move lands in slot two
    pub cpu_think_ms: u64,
    /// Suspense between both moves locking in and the result
    pub settle_ms: u64,
    /// Result display before the next round opens
    pub clear_ms: u64,
    /// Final result display before the board returns to mode selection
    pub reset_ms: u64,
}

impl Timings {
    /// Pacing of the browser game
    pub fn standard() -> Self {
        Self { cpu_think_ms: 1000, settle_ms: 2000, clear_ms: 2000, reset_ms: 2000 }
    }

    /// Every transition fires on the next `advance`
    pub fn instant() -> Self {
        Self { cpu_think_ms: 0, settle_ms: 0, clear_ms: 0, reset_ms: 0 }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rejects_non_positive() {
        assert_eq!(TargetPoints::new(0), Err(ConfigError::NonPositive(0)));
        assert_eq!(TargetPoints::new(-5), Err(ConfigError::NonPositive(-5)));
        assert_eq!(TargetPoints::new(3).map(TargetPoints::get), Ok(3));
    }

    #[test]
    fn test_target_coerces_to_default() {
        assert_eq!(TargetPoints::coerce(0).get(), 10);
        assert_eq!(TargetPoints::coerce(-5).get(), 10);
        assert_eq!(TargetPoints::coerce_str("-5").get(), 10);
        assert_eq!(TargetPoints::coerce_str("0").get(), 10);
        assert_eq!(TargetPoints::coerce_str("abc").get(), 10);
        assert_eq!(TargetPoints::coerce_str("").get(), 10);
        assert_eq!(TargetPoints::coerce_str("NaN").get(), 10);
        assert_eq!(TargetPoints::coerce_str(" 7 ").get(), 7);
    }

    #[test]
    fn test_target_parse_rounds_fractions_up() {
        assert_eq!(TargetPoints::parse("2.5").map(TargetPoints::get), Ok(3));
        assert_eq!(TargetPoints::parse("0.4").map(TargetPoints::get), Ok(1));
        assert!(matches!(TargetPoints::parse("ten"), Err(ConfigError::NotANumber(_))));
    }

    #[test]
    fn test_target_saturates_large_values() {
        assert_eq!(TargetPoints::coerce(i64::MAX).get(), u32::MAX);
    }

    #[test]
    fn test_target_serde_validates() {
        let t: TargetPoints = serde_json::from_str("5").unwrap();
        assert_eq!(t.get(), 5);
        assert!(serde_json::from_str::<TargetPoints>("0").is_err());
        assert_eq!(serde_json::to_string(&t).unwrap(), "5");
    }

    #[test]
    fn test_is_reached() {
        let target = TargetPoints::new(2).unwrap();
        assert!(!target.is_reached(Score { one: 1, two: 1 }));
        assert!(target.is_reached(Score { one: 2, two: 0 }));
        assert!(target.is_reached(Score { one: 0, two: 2 }));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("cpu".parse::<Mode>(), Ok(Mode::Cpu));
        assert_eq!("Player".parse::<Mode>(), Ok(Mode::Player));
        assert_eq!("robot".parse::<Mode>(), Err(ConfigError::UnknownMode("robot".into())));
        assert_eq!(Mode::Cpu.opponent_label(), "CPU");
    }

    #[test]
    fn test_timings_presets() {
        let t = Timings::standard();
        assert_eq!((t.cpu_think_ms, t.settle_ms, t.clear_ms, t.reset_ms), (1000, 2000, 2000, 2000));
        assert_eq!(Timings::default(), t);
        assert_eq!(Timings::instant().settle_ms, 0);
    }

    #[test]
    fn test_timings_partial_json() {
        let t: Timings = serde_json::from_str(r#"{"settleMs": 500}"#).unwrap();
        assert_eq!(t.settle_ms, 500);
        assert_eq!(t.cpu_think_ms, 1000);
    }
}
