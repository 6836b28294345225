//! Error types for the completion provider and the group chat

use thiserror::Error;

/// Failures reported by a completion provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Completion request failed: {0}")]
    Network(String),

    #[error("Completion request timed out: {0}")]
    Timeout(String),

    #[error("Provider rejected the credentials: {0}")]
    Auth(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider returned error status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Failures of a single group chat run
#[derive(Debug, Error)]
pub enum GroupChatError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Group chat produced no turns")]
    EmptyConversation,

    #[error("Malformed turn: {0}")]
    MalformedTurn(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
}

pub type GroupChatResult<T> = Result<T, GroupChatError>;
