//! Unified error types for postboard.
//!
//! Every variant carries a stable code string that the HTTP layer
//! exposes to clients alongside the message.

use tokio_rusqlite::rusqlite;

/// Unified error types for the postboard core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request parameters failed validation (e.g., text too long).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Neither an admin identity nor a matching edit token was supplied.
    #[error("UNAUTHORIZED: not allowed to modify this post")]
    Unauthorized,

    /// Admin login failed.
    #[error("INVALID_CREDENTIALS")]
    InvalidCredentials,

    /// The post does not exist (or was purged).
    #[error("POST_NOT_FOUND: {0}")]
    PostNotFound(i64),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Password hashing or session signing failed.
    #[error("SESSION_ERROR: {0}")]
    Session(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Unauthorized => "UNAUTHORIZED",
            Error::InvalidCredentials => "INVALID_CREDENTIALS",
            Error::PostNotFound(_) => "POST_NOT_FOUND",
            Error::Database(_) | Error::MigrationFailed(_) => "STORE_ERROR",
            Error::Session(_) => "SESSION_ERROR",
        }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
