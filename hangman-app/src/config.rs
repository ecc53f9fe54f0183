use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use hangman_persistence::connection::DEFAULT_DATABASE_URL;
use hangman_persistence::password::DEFAULT_ITERATIONS;
use hangman_persistence::repositories::DEFAULT_HISTORY_LIMIT;
use hangman_types::GameMode;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub log_level: String,
    pub history_limit: u64,
    pub export_dir: PathBuf,
    pub password_min_length: usize,
    pub hash_iterations: u32,
    pub display: DisplayConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source; unset keys fall back to
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);
        EnvFilter::try_new(&log_level)
            .with_context(|| format!("Invalid LOG_LEVEL: {:?}", log_level))?;

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            log_level,
            history_limit: parse_var(&lookup, "HISTORY_LIMIT", defaults.history_limit)?,
            export_dir: lookup("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            password_min_length: parse_var(
                &lookup,
                "PASSWORD_MIN_LENGTH",
                defaults.password_min_length,
            )?,
            hash_iterations: parse_var(&lookup, "HASH_ITERATIONS", defaults.hash_iterations)?,
            display: defaults.display,
        })
    }
}

impl Config {
    /// Filter for the log subscriber: `rust_log` (the `RUST_LOG` value) when
    /// set, otherwise the configured level.
    pub fn log_filter(&self, rust_log: Option<&str>) -> Result<EnvFilter> {
        match rust_log.filter(|directives| !directives.trim().is_empty()) {
            Some(directives) => EnvFilter::try_new(directives)
                .with_context(|| format!("Invalid {}: {:?}", EnvFilter::DEFAULT_ENV, directives)),
            None => EnvFilter::try_new(&self.log_level)
                .with_context(|| format!("Invalid LOG_LEVEL: {:?}", self.log_level)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_level: "warn".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            export_dir: PathBuf::from("."),
            password_min_length: 4,
            hash_iterations: DEFAULT_ITERATIONS,
            display: DisplayConfig::default(),
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Presentation constants, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: String,
    pub placeholder_spacing: bool, // Print "_ _ _" instead of "___"
    pub classic_label: String,
    pub timed_label: String,
}

impl DisplayConfig {
    pub fn mode_label(&self, mode: GameMode) -> &str {
        match mode {
            GameMode::Classic => &self.classic_label,
            GameMode::Timed => &self.timed_label,
        }
    }

    pub fn format_word(&self, display_word: &str) -> String {
        if self.placeholder_spacing {
            display_word
                .chars()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            display_word.to_string()
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Hangman".to_string(),
            placeholder_spacing: true,
            classic_label: "Classic".to_string(),
            timed_label: "Timed".to_string(),
        }
    }
}
