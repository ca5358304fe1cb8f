//! Error types for quill-core

use crate::session::{Node, SessionId};
use thiserror::Error;

/// Result type for quill-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for quill-core
#[derive(Error, Debug)]
pub enum Error {
    /// The generation capability failed or returned a schema-invalid result
    #[error("Generation error: {0}")]
    Generation(String),

    /// A research lookup failed
    #[error("Search error for '{query}': {message}")]
    Search { query: String, message: String },

    /// Resume attempted on a session that already finalized
    #[error("Session already finalized: {0}")]
    SessionAlreadyTerminal(SessionId),

    /// Resume value could not be applied at the current suspension point
    #[error("Invalid input for session {session}: {reason}")]
    InvalidResumeInput { session: SessionId, reason: String },

    /// No checkpoint is recorded for the session
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Resume attempted while the session is not waiting for input
    #[error("Session {session} is not waiting for input (next node: {node})")]
    NotSuspended { session: SessionId, node: Node },

    /// Refinement round limit reached
    #[error("Session {session} reached the limit of {limit} refinement rounds")]
    RoundLimitReached { session: SessionId, limit: u32 },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a search error for the given query
    pub fn search(query: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Search {
            query: query.into(),
            message: message.into(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
