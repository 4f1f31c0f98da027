//! Domain-level error types.

use thiserror::Error;

use crate::ports::{HashError, TokenError};

/// Credential-service errors - the flat set of failure kinds returned to
/// callers.
///
/// `UserExists`, `UserNotFound`, `InvalidCredentials`, `InvalidToken` and
/// `ExpiredToken` are the domain kinds; `Internal`, `Hashing` and `Repo` form
/// the unclassified internal-failure channel that the transport layer maps to
/// a generic failure response.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    ExpiredToken,

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => AuthError::InvalidToken,
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Duplicate key: {0}")]
    Duplicate(String),
}
