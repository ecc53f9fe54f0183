pub use super::game_history::Entity as GameHistory;
pub use super::users::Entity as Users;
pub use super::words::Entity as Words;
