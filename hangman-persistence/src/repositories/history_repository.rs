use anyhow::Result;
use sea_orm::{
    ActiveValue, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::info;

use super::user_repository::apply_outcome;
use crate::entities::{game_history, prelude::*};
use hangman_types::{GameOutcome, HistoryEntry};

pub const DEFAULT_HISTORY_LIMIT: u64 = 10;

/// Finished games and the stat updates that go with them.
pub struct HistoryRepository {
    db: DatabaseConnection,
}

impl HistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append the history row and apply every stat update in one
    /// transaction. Returns the id of the new history row.
    pub async fn record_game(&self, outcome: &GameOutcome) -> Result<i32> {
        let record = &outcome.record;
        let history_model = game_history::ActiveModel {
            id: ActiveValue::NotSet,
            player1: ActiveValue::Set(record.player1.clone()),
            player2: ActiveValue::Set(record.player2.clone()),
            word: ActiveValue::Set(record.word.clone()),
            winner: ActiveValue::Set(record.winner.clone()),
            game_mode: ActiveValue::Set(record.mode.as_str().to_string()),
        };

        let txn = self.db.begin().await?;

        let inserted = GameHistory::insert(history_model).exec(&txn).await?;
        for update in &outcome.stat_updates {
            apply_outcome(&txn, &update.username, update.won).await?;
        }

        txn.commit().await?;

        info!(
            "Recorded game {}: word={}, mode={}, winner={:?}",
            inserted.last_insert_id, record.word, record.mode, record.winner
        );

        Ok(inserted.last_insert_id)
    }

    /// Newest games `username` took part in, as either player.
    pub async fn recent_history(&self, username: &str, limit: u64) -> Result<Vec<HistoryEntry>> {
        let rows = GameHistory::find()
            .filter(
                Condition::any()
                    .add(game_history::Column::Player1.eq(username))
                    .add(game_history::Column::Player2.eq(username)),
            )
            .order_by_desc(game_history::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| HistoryEntry {
                word: row.word,
                mode: row.game_mode,
                winner: row.winner,
            })
            .collect())
    }

    pub async fn count_games(&self) -> Result<u64> {
        Ok(GameHistory::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::password::PasswordHasher;
    use crate::repositories::UserRepository;
    use hangman_types::{GameMode, GameRecord, StatUpdate};
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> (HistoryRepository, UserRepository) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (
            HistoryRepository::new(db.clone()),
            UserRepository::with_hasher(db, PasswordHasher::new(1_000)),
        )
    }

    fn outcome(word: &str, player2: Option<&str>, winner: Option<&str>) -> GameOutcome {
        let mut stat_updates = vec![StatUpdate {
            username: "ala".to_string(),
            won: winner == Some("ala"),
        }];
        if let Some(player2) = player2 {
            stat_updates.push(StatUpdate {
                username: player2.to_string(),
                won: winner == Some(player2),
            });
        }

        GameOutcome {
            record: GameRecord {
                player1: "ala".to_string(),
                player2: player2.map(str::to_string),
                word: word.to_string(),
                winner: winner.map(str::to_string),
                mode: GameMode::Classic,
            },
            stat_updates,
        }
    }

    #[tokio::test]
    async fn test_record_game_updates_stats() {
        let (history, users) = setup_test_db().await;
        users.register("ala", "kotek").await.unwrap();
        users.register("ola", "kotek").await.unwrap();

        history
            .record_game(&outcome("KOT", Some("ola"), Some("ola")))
            .await
            .unwrap();
        history
            .record_game(&outcome("PIES", None, Some("ala")))
            .await
            .unwrap();

        assert_eq!(history.count_games().await.unwrap(), 2);

        let ala = users.get_stats("ala").await.unwrap();
        assert_eq!((ala.games_played, ala.games_won), (2, 1));

        let ola = users.get_stats("ola").await.unwrap();
        assert_eq!((ola.games_played, ola.games_won), (1, 1));
    }

    #[tokio::test]
    async fn test_recent_history_newest_first() {
        let (history, _users) = setup_test_db().await;

        for word in ["A1", "A2", "A3"] {
            history.record_game(&outcome(word, None, None)).await.unwrap();
        }
        history
            .record_game(&outcome("B1", Some("ola"), Some("ola")))
            .await
            .unwrap();

        let entries = history.recent_history("ala", 10).await.unwrap();
        let words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["B1", "A3", "A2", "A1"]);
        assert_eq!(entries[0].mode, "classic");

        let entries = history.recent_history("ola", 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].won_by("ola"));

        let limited = history.recent_history("ala", 2).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].word, "B1");
    }

    #[tokio::test]
    async fn test_recent_history_unknown_user() {
        let (history, _users) = setup_test_db().await;
        history.record_game(&outcome("KOT", None, None)).await.unwrap();

        let entries = history
            .recent_history("nobody", DEFAULT_HISTORY_LIMIT)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
