use anyhow::Result;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr,
};
use tracing::{debug, info, warn};

use crate::entities::{prelude::*, users};
use crate::password::PasswordHasher;
use hangman_types::{PlayerStats, User};

/// Accounts, credentials and per-user counters.
pub struct UserRepository {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_hasher(db, PasswordHasher::default())
    }

    pub fn with_hasher(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            username: model.username,
            games_played: model.games_played,
            games_won: model.games_won,
        }
    }

    async fn find_model(&self, username: &str) -> Result<Option<users::Model>> {
        let model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.find_model(username).await?.map(Self::model_to_user))
    }

    /// Create an account with zeroed counters. Returns `false` when the
    /// username is already taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<bool> {
        if self.find_model(username).await?.is_some() {
            debug!("Registration rejected, user {} exists", username);
            return Ok(false);
        }

        let password_hash = self.hasher.hash(password);
        let user_model = users::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(username.to_string()),
            password_hash: ActiveValue::Set(password_hash),
            games_played: ActiveValue::Set(0),
            games_won: ActiveValue::Set(0),
        };

        match Users::insert(user_model).exec(&self.db).await {
            Ok(_) => {
                info!("Registered user {}", username);
                Ok(true)
            }
            // Lost a race with another insert of the same name
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!("Registration rejected, user {} exists", username);
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// `true` only when the user exists and the password matches.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let Some(model) = self.find_model(username).await? else {
            debug!("Authentication failed, unknown user {}", username);
            return Ok(false);
        };

        match self.hasher.verify(password, &model.password_hash) {
            Ok(matched) => {
                if !matched {
                    debug!("Authentication failed for {}", username);
                }
                Ok(matched)
            }
            Err(e) => {
                warn!("Stored password hash for {} is unusable: {}", username, e);
                Ok(false)
            }
        }
    }

    /// Counters for `username`, zero for unknown users.
    pub async fn get_stats(&self, username: &str) -> Result<PlayerStats> {
        Ok(self
            .find_by_username(username)
            .await?
            .map(|user| user.stats())
            .unwrap_or_default())
    }

    pub async fn record_outcome(&self, username: &str, won: bool) -> Result<()> {
        apply_outcome(&self.db, username, won).await?;
        Ok(())
    }
}

/// Bump the counters of one user in a single `UPDATE`, so concurrent or
/// interrupted writes never lose an increment. Unknown users are skipped.
pub(crate) async fn apply_outcome<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    won: bool,
) -> Result<(), DbErr> {
    let result = Users::update_many()
        .col_expr(
            users::Column::GamesPlayed,
            Expr::col(users::Column::GamesPlayed).add(1),
        )
        .col_expr(
            users::Column::GamesWon,
            Expr::col(users::Column::GamesWon).add(if won { 1 } else { 0 }),
        )
        .filter(users::Column::Username.eq(username))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        debug!("No account named {}, stats not updated", username);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::PaginatorTrait;

    async fn setup_test_db() -> UserRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::with_hasher(db, PasswordHasher::new(1_000))
    }

    #[tokio::test]
    async fn test_register_and_find_user() {
        let repo = setup_test_db().await;

        assert!(repo.register("ala", "kotek").await.unwrap());

        let user = repo.find_by_username("ala").await.unwrap().unwrap();
        assert_eq!(user.username, "ala");
        assert_eq!(user.games_played, 0);
        assert_eq!(user.games_won, 0);

        let model = repo.find_model("ala").await.unwrap().unwrap();
        assert_ne!(model.password_hash, "kotek");
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let repo = setup_test_db().await;

        assert!(repo.register("ala", "kotek").await.unwrap());
        assert!(!repo.register("ala", "inne").await.unwrap());

        let count = Users::find()
            .filter(users::Column::Username.eq("ala"))
            .count(&repo.db)
            .await
            .unwrap();
        assert_eq!(count, 1);

        // Original password still works
        assert!(repo.authenticate("ala", "kotek").await.unwrap());
        assert!(!repo.authenticate("ala", "inne").await.unwrap());
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let repo = setup_test_db().await;

        assert!(repo.register("ala", "kotek").await.unwrap());
        assert!(repo.register("Ala", "kotek").await.unwrap());
        assert!(!repo.authenticate("ALA", "kotek").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let repo = setup_test_db().await;
        repo.register("ala", "kotek").await.unwrap();

        assert!(repo.authenticate("ala", "kotek").await.unwrap());
        assert!(!repo.authenticate("ala", "Kotek").await.unwrap());
        assert!(!repo.authenticate("ola", "kotek").await.unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_with_corrupt_hash() {
        let repo = setup_test_db().await;

        let model = users::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set("legacy".to_string()),
            password_hash: ActiveValue::Set("plaintext".to_string()),
            games_played: ActiveValue::Set(0),
            games_won: ActiveValue::Set(0),
        };
        Users::insert(model).exec(&repo.db).await.unwrap();

        assert!(!repo.authenticate("legacy", "plaintext").await.unwrap());
    }

    #[tokio::test]
    async fn test_record_outcome() {
        let repo = setup_test_db().await;
        repo.register("ala", "kotek").await.unwrap();

        repo.record_outcome("ala", true).await.unwrap();
        repo.record_outcome("ala", false).await.unwrap();
        repo.record_outcome("ala", true).await.unwrap();

        let stats = repo.get_stats("ala").await.unwrap();
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.games_won, 2);
    }

    #[tokio::test]
    async fn test_stats_for_unknown_user() {
        let repo = setup_test_db().await;

        let stats = repo.get_stats("nobody").await.unwrap();
        assert_eq!(stats, PlayerStats::default());

        // Recording for an unknown user is a no-op
        repo.record_outcome("nobody", true).await.unwrap();
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }
}
