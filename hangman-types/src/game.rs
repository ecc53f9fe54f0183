use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{GameError, SessionId, StatUpdate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic, // No deadline
    Timed,   // Fixed wall-clock deadline
}

impl GameMode {
    /// Tag stored in the `game_history.game_mode` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Timed => "timed",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "timed" => Ok(GameMode::Timed),
            other => Err(GameError::UnknownGameMode {
                mode: other.to_string(),
            }),
        }
    }
}

/// One row of the word bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub category: String,
    pub hint: Option<String>,
}

/// Word and hint drawn for a new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnWord {
    pub word: String,
    pub hint: Option<String>,
}

/// Append-only record of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player1: String,
    pub player2: Option<String>,
    pub word: String,
    pub winner: Option<String>,
    pub mode: GameMode,
}

/// Everything the stats recorder needs to persist a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub record: GameRecord,
    pub stat_updates: Vec<StatUpdate>,
}

/// One line of a player's recent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub word: String,
    pub mode: String,
    pub winner: Option<String>,
}

impl HistoryEntry {
    pub fn won_by(&self, username: &str) -> bool {
        self.winner.as_deref() == Some(username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active, // Guessing in progress
    Won,    // Finished with a winner
    Lost,   // Finished without a winner
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Solved,
    OutOfMistakes,
    TimeExpired,
}

/// Render snapshot of a session. The target word is only included once
/// the session is over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: SessionId,
    pub display_word: String,
    pub revealed_word: Option<String>,
    pub mode: GameMode,
    pub category: Option<String>,
    pub current_player: String,
    pub mistakes: u32,
    pub mistake_limit: u32,
    pub status: SessionStatus,
    pub end_reason: Option<EndReason>,
    pub winner: Option<String>,
    pub hint_available: bool,
    pub seconds_remaining: Option<u64>,
}
