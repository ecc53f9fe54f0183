use hangman_types::{
    DrawnWord, EndReason, GameError, GameMode, GameOutcome, GameRecord, SessionId, SessionStatus,
    SessionView, StatUpdate,
};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{ALPHABET, normalize_letter};

/// Wrong guesses allowed before the session is lost.
pub const MISTAKE_LIMIT: u32 = 6;

/// Deadline applied to timed sessions.
pub const TIMED_MODE_LIMIT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player1,
    Player2,
}

impl Seat {
    fn other(self) -> Self {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }
}

/// Who plays, how, and from which category the word is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    pub player1: String,
    pub player2: Option<String>,
    pub mode: GameMode,
    pub category: Option<String>,
}

impl SessionSetup {
    pub fn single(player: impl Into<String>, mode: GameMode) -> Self {
        Self {
            player1: player.into(),
            player2: None,
            mode,
            category: None,
        }
    }

    pub fn two_player(
        player1: impl Into<String>,
        player2: impl Into<String>,
        mode: GameMode,
    ) -> Self {
        Self {
            player1: player1.into(),
            player2: Some(player2.into()),
            mode,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A single hangman play-through.
///
/// The session is a plain owned value driven by its caller: guesses are fed
/// in through [`Session::guess_letter`] and, in timed mode, the deadline is
/// only noticed when the caller polls [`Session::time_remaining`].
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    player1: String,
    player2: Option<String>,
    turn: Seat,
    mode: GameMode,
    category: Option<String>,
    word: String, // Uppercased, fixed for the session lifetime
    hint: Option<String>,
    hint_used: bool,
    guessed: HashSet<char>,
    mistakes: u32,
    mistake_limit: u32,
    game_over: bool,
    end_reason: Option<EndReason>,
    winner: Option<String>,
    started_at: Instant,
    time_limit: Option<Duration>,
    recorded: bool,
}

impl Session {
    pub fn new(setup: SessionSetup, drawn: DrawnWord) -> Self {
        Self::started_at(setup, drawn, Instant::now())
    }

    /// Build a session whose clock started at `started_at`.
    pub fn started_at(setup: SessionSetup, drawn: DrawnWord, started_at: Instant) -> Self {
        let time_limit = match setup.mode {
            GameMode::Timed => Some(TIMED_MODE_LIMIT),
            GameMode::Classic => None,
        };

        let session = Self {
            id: Uuid::new_v4(),
            player1: setup.player1,
            player2: setup.player2,
            turn: Seat::Player1,
            mode: setup.mode,
            category: setup.category,
            word: drawn.word.to_uppercase(),
            hint: drawn.hint,
            hint_used: false,
            guessed: HashSet::new(),
            mistakes: 0,
            mistake_limit: MISTAKE_LIMIT,
            game_over: false,
            end_reason: None,
            winner: None,
            started_at,
            time_limit,
            recorded: false,
        };

        info!(
            "Session {} started: mode={}, category={:?}, players={}, word_length={}",
            session.id,
            session.mode,
            session.category,
            if session.player2.is_some() { 2 } else { 1 },
            session.word.chars().count()
        );

        session
    }

    /// Guess one letter. Returns `true` when the letter occurs in the word.
    ///
    /// Any character is accepted; it is uppercased and evaluated like a
    /// letter. Repeated guesses and guesses after the session ended leave
    /// the session untouched and return `false`.
    pub fn guess_letter(&mut self, letter: char) -> bool {
        if self.game_over {
            debug!("Session {}: guess after game over ignored", self.id);
            return false;
        }

        let letter = normalize_letter(letter);
        if !self.guessed.insert(letter) {
            return false;
        }

        let hit = self.word.contains(letter);
        if !hit {
            self.mistakes += 1;
            // Turn passes only on a miss
            if self.player2.is_some() {
                self.turn = self.turn.other();
            }
        }

        if self.mistakes >= self.mistake_limit {
            let winner = self
                .player2
                .is_some()
                .then(|| self.current_player().to_string());
            self.finish(EndReason::OutOfMistakes, winner);
        } else if self.is_word_guessed() {
            let winner = Some(self.current_player().to_string());
            self.finish(EndReason::Solved, winner);
        }

        hit
    }

    fn finish(&mut self, reason: EndReason, winner: Option<String>) {
        debug_assert!(!self.game_over, "session finished twice");
        self.game_over = true;
        self.end_reason = Some(reason);
        self.winner = winner;
        info!(
            "Session {} over: reason={:?}, winner={:?}, mistakes={}/{}",
            self.id, reason, self.winner, self.mistakes, self.mistake_limit
        );
    }

    pub fn is_word_guessed(&self) -> bool {
        self.word.chars().all(|ch| self.guessed.contains(&ch))
    }

    /// The word with every unguessed position replaced by `_`.
    pub fn display_word(&self) -> String {
        self.word
            .chars()
            .map(|ch| if self.guessed.contains(&ch) { ch } else { '_' })
            .collect()
    }

    /// Keyboard letters that have not been guessed yet.
    pub fn available_letters(&self) -> Vec<char> {
        ALPHABET
            .chars()
            .filter(|ch| !self.guessed.contains(ch))
            .collect()
    }

    /// Time left at `now`, without changing the session.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.time_limit.map(|limit| {
            let elapsed = now.saturating_duration_since(self.started_at);
            limit.saturating_sub(elapsed)
        })
    }

    /// Whole seconds left at `now`. Ends an active session with no winner
    /// once the deadline has passed.
    pub fn tick_at(&mut self, now: Instant) -> Option<u64> {
        let remaining = self.remaining_at(now)?;
        if remaining.is_zero() && !self.game_over {
            self.finish(EndReason::TimeExpired, None);
        }
        Some(remaining.as_secs())
    }

    /// Whole seconds left, or `None` for an untimed session.
    ///
    /// This query drives the deadline: an expired timed session only ends
    /// when this (or [`Session::tick_at`]) is called, so callers poll it
    /// once per frame.
    pub fn time_remaining(&mut self) -> Option<u64> {
        self.tick_at(Instant::now())
    }

    /// Reveal the hint. Only the first call returns it.
    pub fn use_hint(&mut self) -> Option<String> {
        if self.hint_used {
            return None;
        }
        self.hint_used = true;
        self.hint.clone()
    }

    /// History record and stat changes of a finished session.
    ///
    /// Fails while the session is active or once it has been recorded.
    /// Nothing changes until [`Session::mark_recorded`] is called, so a
    /// failed write can be retried.
    pub fn outcome(&self) -> Result<GameOutcome, GameError> {
        if !self.game_over {
            return Err(GameError::SessionStillActive);
        }
        if self.recorded {
            return Err(GameError::AlreadyRecorded);
        }

        let winner = self.winner.as_deref();
        let player1_won = winner == Some(self.player1.as_str());
        let mut stat_updates = vec![StatUpdate {
            username: self.player1.clone(),
            won: player1_won,
        }];
        if let Some(player2) = &self.player2 {
            stat_updates.push(StatUpdate {
                username: player2.clone(),
                won: !player1_won && winner == Some(player2.as_str()),
            });
        }

        Ok(GameOutcome {
            record: GameRecord {
                player1: self.player1.clone(),
                player2: self.player2.clone(),
                word: self.word.clone(),
                winner: self.winner.clone(),
                mode: self.mode,
            },
            stat_updates,
        })
    }

    pub fn mark_recorded(&mut self) {
        self.recorded = true;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id,
            display_word: self.display_word(),
            revealed_word: self.game_over.then(|| self.word.clone()),
            mode: self.mode,
            category: self.category.clone(),
            current_player: self.current_player().to_string(),
            mistakes: self.mistakes,
            mistake_limit: self.mistake_limit,
            status: self.status(),
            end_reason: self.end_reason,
            winner: self.winner.clone(),
            hint_available: !self.hint_used,
            seconds_remaining: self.remaining_at(Instant::now()).map(|d| d.as_secs()),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match (self.game_over, &self.winner) {
            (false, _) => SessionStatus::Active,
            (true, Some(_)) => SessionStatus::Won,
            (true, None) => SessionStatus::Lost,
        }
    }

    pub fn current_player(&self) -> &str {
        match (self.turn, &self.player2) {
            (Seat::Player2, Some(player2)) => player2,
            _ => &self.player1,
        }
    }

    pub fn current_seat(&self) -> Seat {
        self.turn
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn player1(&self) -> &str {
        &self.player1
    }

    pub fn player2(&self) -> Option<&str> {
        self.player2.as_deref()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    pub fn guessed_letters(&self) -> &HashSet<char> {
        &self.guessed
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn mistake_limit(&self) -> u32 {
        self.mistake_limit
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn(word: &str) -> DrawnWord {
        DrawnWord {
            word: word.to_string(),
            hint: Some("hint".to_string()),
        }
    }

    #[test]
    fn test_session_creation() {
        let session = Session::new(SessionSetup::single("ala", GameMode::Classic), drawn("kot"));

        assert_eq!(session.word(), "KOT");
        assert_eq!(session.current_player(), "ala");
        assert_eq!(session.current_seat(), Seat::Player1);
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.mistake_limit(), MISTAKE_LIMIT);
        assert!(session.guessed_letters().is_empty());
        assert!(!session.hint_used());
        assert!(!session.is_over());
        assert_eq!(session.status(), SessionStatus::Active);
        assert_eq!(session.time_limit(), None);
    }

    #[test]
    fn test_timed_session_has_limit() {
        let session = Session::new(SessionSetup::single("ala", GameMode::Timed), drawn("kot"));
        assert_eq!(session.time_limit(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_lowercase_guess_matches() {
        let mut session = Session::new(SessionSetup::single("ala", GameMode::Classic), drawn("KOT"));
        assert!(session.guess_letter('k'));
        assert!(!session.guess_letter('K'));
        assert_eq!(session.display_word(), "K__");
    }

    #[test]
    fn test_guess_after_game_over_is_ignored() {
        let mut session = Session::new(SessionSetup::single("ala", GameMode::Classic), drawn("KOT"));
        for letter in ['A', 'B', 'C', 'D', 'E', 'F'] {
            session.guess_letter(letter);
        }
        assert!(session.is_over());

        assert!(!session.guess_letter('K'));
        assert!(!session.guess_letter('G'));
        assert_eq!(session.mistakes(), 6);
        assert!(!session.guessed_letters().contains(&'K'));
        assert_eq!(session.winner(), None);
    }

    #[test]
    fn test_outcome_requires_finished_session() {
        let mut session = Session::new(SessionSetup::single("ala", GameMode::Classic), drawn("KOT"));
        assert_eq!(session.outcome(), Err(GameError::SessionStillActive));

        for letter in ['K', 'O', 'T'] {
            session.guess_letter(letter);
        }
        assert!(session.outcome().is_ok());
        assert!(!session.is_recorded());

        session.mark_recorded();
        assert!(session.is_recorded());
        assert_eq!(session.outcome(), Err(GameError::AlreadyRecorded));
    }

    #[test]
    fn test_view_hides_word_until_over() {
        let mut session = Session::new(SessionSetup::single("ala", GameMode::Classic), drawn("KOT"));
        session.guess_letter('O');

        let view = session.view();
        assert_eq!(view.display_word, "_O_");
        assert_eq!(view.revealed_word, None);
        assert!(view.hint_available);
        assert_eq!(view.seconds_remaining, None);

        session.guess_letter('K');
        session.guess_letter('T');
        let view = session.view();
        assert_eq!(view.revealed_word.as_deref(), Some("KOT"));
        assert_eq!(view.status, SessionStatus::Won);
        assert_eq!(view.end_reason, Some(EndReason::Solved));
    }

    #[test]
    fn test_available_letters_shrink() {
        let mut session = Session::new(SessionSetup::single("ala", GameMode::Classic), drawn("SŁOŃ"));
        let before = session.available_letters().len();
        session.guess_letter('ł');
        let after = session.available_letters();
        assert_eq!(after.len(), before - 1);
        assert!(!after.contains(&'Ł'));
        assert_eq!(session.display_word(), "_Ł__");
    }
}
