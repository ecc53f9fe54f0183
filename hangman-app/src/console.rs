//! Line-based front end.
//!
//! Every line read is one input event. Timed sessions are polled through
//! [`Session::time_remaining`] before each render and before each guess is
//! applied, so a deadline is noticed on the next input at the latest.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::error::ServiceError;
use crate::game_service::{GameService, second_player_name};
use hangman_core::{Session, SessionSetup};
use hangman_types::{EndReason, GameMode, User};

pub struct Console<'a, R, W> {
    service: &'a GameService,
    config: &'a Config,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(service: &'a GameService, config: &'a Config, input: R, output: W) -> Self {
        Self {
            service,
            config,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "=== {} ===", self.config.display.title)?;

        loop {
            writeln!(self.output, "[1] Log in  [2] Register  [q] Quit")?;
            let Some(choice) = self.prompt("> ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => {
                    let (username, password) = self.ask_credentials()?;
                    match self.service.login(&username, &password).await {
                        Ok(user) => self.main_menu(&user).await?,
                        Err(e) => self.report(e)?,
                    }
                }
                "2" => {
                    let (username, password) = self.ask_credentials()?;
                    match self.service.register(&username, &password).await {
                        Ok(()) => writeln!(self.output, "Account created. You can log in now.")?,
                        Err(e) => self.report(e)?,
                    }
                }
                "q" => return Ok(()),
                _ => writeln!(self.output, "Unknown option")?,
            }
        }
    }

    async fn main_menu(&mut self, user: &User) -> Result<()> {
        writeln!(self.output, "Logged in as {}", user.username)?;

        loop {
            writeln!(
                self.output,
                "[1] Single player  [2] Two players  [3] Statistics  [4] Export  [l] Log out"
            )?;
            let Some(choice) = self.prompt("> ")? else {
                return Ok(());
            };

            match choice.as_str() {
                "1" => self.play(user, false).await?,
                "2" => self.play(user, true).await?,
                "3" => {
                    let stats = self.service.stats(&user.username).await?;
                    writeln!(
                        self.output,
                        "Played: {}, won: {} ({:.1}%)",
                        stats.games_played,
                        stats.games_won,
                        stats.win_rate()
                    )?;
                }
                "4" => {
                    let report = self.service.stats_report(&user.username).await?;
                    let path = report.write_to_dir(&self.config.export_dir)?;
                    writeln!(self.output, "Statistics saved to {}", path.display())?;
                }
                "l" => return Ok(()),
                _ => writeln!(self.output, "Unknown option")?,
            }
        }
    }

    async fn play(&mut self, user: &User, two_players: bool) -> Result<()> {
        let mode = match self.prompt("Mode [c]lassic / [t]imed: ")? {
            Some(choice) if choice.eq_ignore_ascii_case("t") => GameMode::Timed,
            _ => GameMode::Classic,
        };

        let categories = self.service.categories().await?;
        writeln!(self.output, "Categories: {}", categories.join(", "))?;
        let category = self
            .prompt("Category (empty for any): ")?
            .filter(|c| !c.is_empty());

        let mut setup = if two_players {
            SessionSetup::two_player(&user.username, second_player_name(&user.username), mode)
        } else {
            SessionSetup::single(&user.username, mode)
        };
        setup.category = category;

        let mut session = match self.service.start_session(setup).await {
            Ok(session) => session,
            Err(e) => return self.report(e),
        };

        loop {
            let remaining = session.time_remaining();
            if session.is_over() {
                break;
            }
            self.render(&session, remaining)?;

            let Some(line) = self.prompt("Letter (? hint, ! menu): ")? else {
                return Ok(());
            };
            match line.as_str() {
                "!" => {
                    writeln!(self.output, "Game abandoned")?;
                    return Ok(());
                }
                "?" => match session.use_hint() {
                    Some(hint) => writeln!(self.output, "Hint: {}", hint)?,
                    None => writeln!(self.output, "No hint left")?,
                },
                _ => {
                    let Some(letter) = line.chars().next() else {
                        continue;
                    };
                    session.time_remaining();
                    if session.is_over() {
                        break;
                    }
                    if session.guess_letter(letter) {
                        writeln!(self.output, "Hit!")?;
                    } else {
                        writeln!(self.output, "Miss.")?;
                    }
                }
            }
        }

        self.render_result(&session)?;
        self.service.finalize_and_record(&mut session).await?;
        Ok(())
    }

    fn render(&mut self, session: &Session, remaining: Option<u64>) -> io::Result<()> {
        let view = session.view();
        let display = &self.config.display;

        writeln!(self.output)?;
        writeln!(self.output, "  {}", display.format_word(&view.display_word))?;

        let mut info = format!(
            "Mistakes: {}/{} | Mode: {}",
            view.mistakes,
            view.mistake_limit,
            display.mode_label(view.mode)
        );
        if session.player2().is_some() {
            info.push_str(&format!(" | Player: {}", view.current_player));
        }
        if let Some(seconds) = remaining {
            info.push_str(&format!(" | Time: {}s", seconds));
        }
        writeln!(self.output, "{}", info)?;

        let letters: Vec<String> = session
            .available_letters()
            .into_iter()
            .map(String::from)
            .collect();
        writeln!(self.output, "Letters: {}", letters.join(" "))
    }

    fn render_result(&mut self, session: &Session) -> io::Result<()> {
        if session.end_reason() == Some(EndReason::TimeExpired) {
            writeln!(self.output, "Time's up!")?;
        }
        match session.winner() {
            Some(winner) => writeln!(self.output, "Winner: {}!", winner),
            None => writeln!(self.output, "You lost! The word was: {}", session.word()),
        }
    }

    /// Print a recoverable error; storage failures end the program.
    fn report(&mut self, error: ServiceError) -> Result<()> {
        if !error.is_recoverable() {
            return Err(error.into());
        }
        writeln!(self.output, "{}", error)?;
        Ok(())
    }

    fn ask_credentials(&mut self) -> io::Result<(String, String)> {
        let username = self.prompt("Username: ")?.unwrap_or_default();
        // Passwords keep surrounding spaces
        let password = self.read_line("Password: ")?.unwrap_or_default();
        Ok((username, password))
    }

    /// Read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        Ok(self.read_line(label)?.map(|line| line.trim().to_string()))
    }

    fn read_line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
