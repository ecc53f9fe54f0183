use tracing::{info, warn};

use crate::config::Config;
use crate::error::ServiceError;
use crate::export::StatsReport;
use hangman_core::{Session, SessionSetup};
use hangman_persistence::DatabaseManager;
use hangman_persistence::repositories::{HistoryRepository, UserRepository, WordRepository};
use hangman_types::{HistoryEntry, PlayerStats, User};

/// Name used for the second seat of a local two-player game.
pub fn second_player_name(username: &str) -> String {
    format!("{}_2", username)
}

/// Ties the session engine to accounts, the word bank and game history.
pub struct GameService {
    users: UserRepository,
    words: WordRepository,
    history: HistoryRepository,
    password_min_length: usize,
    history_limit: u64,
}

impl GameService {
    pub fn new(db: &DatabaseManager, config: &Config) -> Self {
        Self {
            users: db.users(),
            words: db.words(),
            history: db.history(),
            password_min_length: config.password_min_length,
            history_limit: config.history_limit,
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), ServiceError> {
        let username = check_fields(username, password)?;
        if password.chars().count() < self.password_min_length {
            return Err(ServiceError::PasswordTooShort {
                min: self.password_min_length,
            });
        }

        if self.users.register(username, password).await? {
            Ok(())
        } else {
            Err(ServiceError::DuplicateUser {
                username: username.to_string(),
            })
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let username = check_fields(username, password)?;
        if !self.users.authenticate(username, password).await? {
            warn!("Failed login for {}", username);
            return Err(ServiceError::InvalidCredentials);
        }

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        info!("User {} logged in", username);
        Ok(user)
    }

    pub async fn stats(&self, username: &str) -> Result<PlayerStats, ServiceError> {
        Ok(self.users.get_stats(username).await?)
    }

    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.words.list_categories().await?)
    }

    /// Draw a word and start a session. Fails with
    /// [`ServiceError::NoWordAvailable`] when the bank or category is empty.
    pub async fn start_session(&self, setup: SessionSetup) -> Result<Session, ServiceError> {
        let drawn = self
            .words
            .pick_random(setup.category.as_deref())
            .await?
            .ok_or_else(|| ServiceError::NoWordAvailable {
                category: setup.category.clone(),
            })?;

        Ok(Session::new(setup, drawn))
    }

    /// Persist a finished session: one history row plus the stat update of
    /// every named player. The session is only marked recorded once the
    /// write succeeded. Returns the history row id.
    pub async fn finalize_and_record(&self, session: &mut Session) -> Result<i32, ServiceError> {
        let outcome = session.outcome()?;
        let id = self.history.record_game(&outcome).await?;
        session.mark_recorded();
        Ok(id)
    }

    pub async fn recent_history(&self, username: &str) -> Result<Vec<HistoryEntry>, ServiceError> {
        Ok(self
            .history
            .recent_history(username, self.history_limit)
            .await?)
    }

    pub async fn stats_report(&self, username: &str) -> Result<StatsReport, ServiceError> {
        Ok(StatsReport {
            username: username.to_string(),
            stats: self.stats(username).await?,
            history: self.recent_history(username).await?,
        })
    }
}

fn check_fields<'a>(username: &'a str, password: &str) -> Result<&'a str, ServiceError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ServiceError::MissingField { field: "username" });
    }
    if password.is_empty() {
        return Err(ServiceError::MissingField { field: "password" });
    }
    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_player_name() {
        assert_eq!(second_player_name("ala"), "ala_2");
    }

    #[test]
    fn test_check_fields() {
        assert_eq!(check_fields("  ala ", "x").unwrap(), "ala");
        assert!(matches!(
            check_fields("   ", "x"),
            Err(ServiceError::MissingField { field: "username" })
        ));
        assert!(matches!(
            check_fields("ala", ""),
            Err(ServiceError::MissingField { field: "password" })
        ));
    }
}
