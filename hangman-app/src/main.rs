use anyhow::Result;
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hangman_app::{config::Config, console::Console, game_service::GameService};
use hangman_persistence::{DatabaseManager, password::PasswordHasher};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();

    // Logs go to stderr so they stay out of the game screen
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter(rust_log.as_deref())?)
        .with_writer(io::stderr)
        .init();

    info!("Starting hangman with database {}", config.database_url);

    let db = DatabaseManager::connect(&config.database_url)
        .await?
        .with_hasher(PasswordHasher::new(config.hash_iterations));
    let service = GameService::new(&db, &config);

    Console::new(&service, &config, io::stdin().lock(), io::stdout())
        .run()
        .await?;

    db.close().await?;
    info!("Bye");
    Ok(())
}
