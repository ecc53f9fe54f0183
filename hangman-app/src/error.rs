use hangman_types::GameError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Please fill in the {field}")]
    MissingField { field: &'static str },
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("User {username} already exists")]
    DuplicateUser { username: String },
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("No word available in category {}", .category.as_deref().unwrap_or("<any>"))]
    NoWordAvailable { category: Option<String> },
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Persistence failure: {0}")]
    Persistence(#[from] anyhow::Error),
    #[error("Failed to write report: {0}")]
    Export(#[from] std::io::Error),
}

impl ServiceError {
    /// Errors the user can fix and retry, as opposed to storage failures.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ServiceError::Persistence(_) | ServiceError::Export(_))
    }
}
