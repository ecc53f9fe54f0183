use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::repositories::WordRepository;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hangman.db?mode=rwc";

pub async fn connect_to_memory_database() -> Result<DatabaseConnection, DbErr> {
    Database::connect("sqlite::memory:").await
}

/// Create missing tables and seed the word bank if it is empty.
/// Safe to run on every start.
pub async fn initialize(db: &DatabaseConnection) -> anyhow::Result<()> {
    Migrator::up(db, None).await?;

    let seeded = WordRepository::new(db.clone()).seed_defaults().await?;
    if seeded > 0 {
        info!("Seeded word bank with {} words", seeded);
    }

    Ok(())
}

pub async fn connect_and_migrate(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("Connecting to database at {}", database_url);
    let db = Database::connect(database_url).await?;
    initialize(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::WordRepository;

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let db = connect_to_memory_database().await.unwrap();

        initialize(&db).await.unwrap();
        let words = WordRepository::new(db.clone());
        let first = words.count().await.unwrap();
        assert_eq!(first, 14);

        initialize(&db).await.unwrap();
        assert_eq!(words.count().await.unwrap(), first);
    }
}
