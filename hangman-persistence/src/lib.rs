pub mod connection;
pub mod entities;
pub mod password;
pub mod repositories;

use sea_orm::{DatabaseConnection, DbErr};

use crate::password::PasswordHasher;
use crate::repositories::{HistoryRepository, UserRepository, WordRepository};

/// Owns the database connection and hands out repositories over it.
pub struct DatabaseManager {
    connection: DatabaseConnection,
    hasher: PasswordHasher,
}

impl DatabaseManager {
    /// Connect, create missing tables and seed the word bank.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let connection = connection::connect_and_migrate(database_url).await?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self {
            connection,
            hasher: PasswordHasher::default(),
        }
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::with_hasher(self.connection.clone(), self.hasher.clone())
    }

    pub fn words(&self) -> WordRepository {
        WordRepository::new(self.connection.clone())
    }

    pub fn history(&self) -> HistoryRepository {
        HistoryRepository::new(self.connection.clone())
    }

    pub async fn close(self) -> Result<(), DbErr> {
        self.connection.close().await
    }
}
