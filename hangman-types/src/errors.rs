use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum GameError {
    #[error("Session is still active")]
    SessionStillActive,
    #[error("Session result already recorded")]
    AlreadyRecorded,
    #[error("Unknown game mode: {mode}")]
    UnknownGameMode { mode: String },
}
