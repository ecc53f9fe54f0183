use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use hangman_types::{HistoryEntry, PlayerStats};

/// Read-only snapshot of one player's totals and recent games.
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub username: String,
    pub stats: PlayerStats,
    pub history: Vec<HistoryEntry>,
}

impl StatsReport {
    /// Render as CSV: a totals block, a blank line, then one row per game.
    pub fn to_csv(&self) -> String {
        let mut rows: Vec<Vec<String>> = vec![
            vec![
                "User".to_string(),
                "Games played".to_string(),
                "Games won".to_string(),
                "Win rate".to_string(),
            ],
            vec![
                self.username.clone(),
                self.stats.games_played.to_string(),
                self.stats.games_won.to_string(),
                format!("{:.1}%", self.stats.win_rate()),
            ],
            vec![],
            vec!["Word".to_string(), "Mode".to_string(), "Result".to_string()],
        ];

        for entry in &self.history {
            let result = if entry.won_by(&self.username) {
                "Win"
            } else {
                "Loss"
            };
            rows.push(vec![entry.word.clone(), entry.mode.clone(), result.to_string()]);
        }

        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|field| csv_field(field))
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .map(|line| line + "\n")
            .collect()
    }

    pub fn file_name(&self, at: DateTime<Local>) -> String {
        let safe_name: String = self
            .username
            .chars()
            .map(|ch| {
                if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        format!("stats_{}_{}.csv", safe_name, at.format("%Y%m%d_%H%M%S"))
    }

    /// Write the report into `dir` and return the created file's path.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(Local::now()));
        fs::write(&path, self.to_csv())?;
        info!("Exported stats for {} to {}", self.username, path.display());
        Ok(path)
    }
}

fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}
