pub mod history_repository;
pub mod user_repository;
pub mod word_repository;

pub use history_repository::{HistoryRepository, DEFAULT_HISTORY_LIMIT};
pub use user_repository::UserRepository;
pub use word_repository::WordRepository;
