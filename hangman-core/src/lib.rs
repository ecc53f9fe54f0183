pub mod session;
pub mod word_list;

// Re-export main components
pub use session::*;
pub use word_list::*;
