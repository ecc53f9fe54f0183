pub mod prelude;

pub mod game_history;
pub mod users;
pub mod words;
