use serde::{Deserialize, Serialize};

/// Account as exposed to callers. The password hash never leaves the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub games_played: i32,
    pub games_won: i32,
}

impl User {
    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            games_played: self.games_played,
            games_won: self.games_won,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: i32,
    pub games_won: i32,
}

impl PlayerStats {
    pub fn games_lost(&self) -> i32 {
        self.games_played - self.games_won
    }

    /// Percentage of games won, `0.0` when nothing has been played yet.
    pub fn win_rate(&self) -> f64 {
        if self.games_played > 0 {
            f64::from(self.games_won) / f64::from(self.games_played) * 100.0
        } else {
            0.0
        }
    }
}

/// Counter change applied to one account after a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatUpdate {
    pub username: String,
    pub won: bool,
}
