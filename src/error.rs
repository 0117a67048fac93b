use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Conversation {0} has an unanswered message")]
    AwaitingReply(String),

    #[error("Completion provider error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Could not generate a unique conversation id after {0} attempts")]
    IdSpaceExhausted(usize),
}

impl ChatError {
    /// Stable code reported in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::NotFound(_) => "NOT_FOUND",
            ChatError::AwaitingReply(_) => "CONFLICT",
            ChatError::Upstream(_) => "UPSTREAM_ERROR",
            ChatError::Configuration(_) | ChatError::IdSpaceExhausted(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
