#![allow(dead_code)]

use hangman_core::{Session, SessionSetup};
use hangman_types::{DrawnWord, GameMode};
use std::time::Instant;

/// Creates a drawn word with a fixed hint
pub fn create_drawn_word(word: &str) -> DrawnWord {
    DrawnWord {
        word: word.to_string(),
        hint: Some(format!("Hint for {}", word)),
    }
}

/// Creates a single-player classic session for the given word
pub fn create_single_session(word: &str) -> Session {
    Session::new(
        SessionSetup::single("ala", GameMode::Classic),
        create_drawn_word(word),
    )
}

/// Creates a two-player classic session for the given word
pub fn create_two_player_session(word: &str) -> Session {
    Session::new(
        SessionSetup::two_player("ala", "ala_2", GameMode::Classic),
        create_drawn_word(word),
    )
}

/// Creates a timed single-player session whose clock started at `started_at`
pub fn create_timed_session(word: &str, started_at: Instant) -> Session {
    Session::started_at(
        SessionSetup::single("ala", GameMode::Timed),
        create_drawn_word(word),
        started_at,
    )
}

/// Feeds every letter of `letters` into the session
pub fn guess_all(session: &mut Session, letters: &str) -> Vec<bool> {
    letters.chars().map(|ch| session.guess_letter(ch)).collect()
}

/// Asserts the basic session invariants
pub fn assert_invariants(session: &Session) {
    assert!(
        session.mistakes() <= session.mistake_limit(),
        "mistakes {} over limit {}",
        session.mistakes(),
        session.mistake_limit()
    );
    assert_eq!(
        session.display_word().chars().count(),
        session.word().chars().count()
    );
    if session.winner().is_some() {
        assert!(session.is_over());
    }
}
