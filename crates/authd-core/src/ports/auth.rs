//! Token signing and password hashing ports.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Discriminator carried in every token payload so a token of one kind is
/// never accepted where the other is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Token validation and signing errors.
///
/// Malformed structure, bad signature, unexpected algorithm and wrong kind all
/// collapse into `Invalid` so validation never leaks which check failed.
/// `Expired` is reported only for a token that is well-formed, correctly
/// signed and of the right kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("token expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Token service trait for signed, self-contained credentials.
///
/// Implementations hold no mutable state; a single instance is shared across
/// all concurrent callers.
pub trait TokenService: Send + Sync {
    /// Issue a short-lived access token for a user.
    fn generate_access_token(&self, user_id: Uuid) -> Result<String, TokenError>;

    /// Issue a long-lived refresh token for a user.
    fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, TokenError>;

    /// Verify an access token and return the subject user id.
    fn validate_access_token(&self, token: &str) -> Result<Uuid, TokenError>;

    /// Verify a refresh token and return the subject user id.
    fn validate_refresh_token(&self, token: &str) -> Result<Uuid, TokenError>;

    /// Access-token lifetime in seconds, reported to callers as `expires_in`.
    fn access_token_ttl_seconds(&self) -> i64;
}

/// Password hashing failure - an internal fault, never a credential error.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(pub String);

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a slow, salted one-way function.
    fn hash(&self, password: &str) -> Result<String, HashError>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
