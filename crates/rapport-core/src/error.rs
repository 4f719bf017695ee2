//! Failures recovered inside the context cache

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Message was empty or whitespace only
    #[error("message is empty")]
    EmptyMessage,

    #[error("conversation id must not be empty")]
    InvalidConversationId,
}

pub type Result<T> = std::result::Result<T, ContextError>;
