//! Signed-in player context and the match summary export

use serde::{Deserialize, Serialize};

use crate::ledger::Score;

/// File name the summary document is saved under
pub const SUMMARY_FILE_NAME: &str = "game-summary.pdf";

/// The player the login screen let through
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// Data URL or link to the profile picture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), portrait: None }
    }

    pub fn with_portrait(mut self, portrait: impl Into<String>) -> Self {
        self.portrait = Some(portrait.into());
        self
    }
}

/// Read-only view of whoever is signed in
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserProfile>;
}

impl IdentityProvider for UserProfile {
    fn current_user(&self) -> Option<UserProfile> {
        Some(self.clone())
    }
}

impl IdentityProvider for Option<UserProfile> {
    fn current_user(&self) -> Option<UserProfile> {
        self.clone()
    }
}

/// Everything the summary document prints
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub player_name: String,
    pub target_points: u32,
    pub final_score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<String>,
}

impl MatchSummary {
    pub fn new(user: UserProfile, target_points: u32, final_score: Score) -> Self {
        Self {
            player_name: user.name,
            target_points,
            final_score,
            portrait: user.portrait,
        }
    }

    /// Text lines of the document, title first
    pub fn lines(&self) -> Vec<String> {
        vec![
            "Game Summary".to_string(),
            format!("Player: {}", self.player_name),
            format!("Target Points: {}", self.target_points),
            format!("Final Score: {}", self.final_score),
        ]
    }

    pub fn file_name(&self) -> &'static str {
        SUMMARY_FILE_NAME
    }
}
