//! Credential orchestration over the store, token, and password ports.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::User;
use crate::error::{AuthError, RepoError};
use crate::ports::{PasswordService, TokenService, UserRepository};

/// Registration input. Shape rules (email format, password length) are
/// enforced at the transport edge before this type is constructed.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login input.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Result of a successful register, login, or refresh.
///
/// `refresh_token` is present on register and login only; the refresh flow
/// issues a new access token without rotating the refresh token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
    pub expires_in: i64,
}

/// Register, login, refresh and validate - the business operations combining
/// the credential store and the token service.
///
/// Holds no mutable state beyond its port handles; one instance serves all
/// concurrent callers.
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl CredentialService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Register a new user and issue both tokens.
    pub async fn register(&self, req: RegisterRequest) -> Result<Authenticated, AuthError> {
        if self.users.get_by_email(&req.email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.passwords.hash(&req.password)?;

        let user = User::new(
            req.email,
            req.username,
            req.first_name,
            req.last_name,
            password_hash,
        );

        // Two concurrent registrations can both pass the existence check
        // above; the store's unique constraint is the backstop, so a
        // duplicate at write time is the same conflict.
        let user = match self.users.create(user).await {
            Ok(user) => user,
            Err(RepoError::Duplicate(_)) => return Err(AuthError::UserExists),
            Err(e) => return Err(e.into()),
        };

        self.issue(user, true)
    }

    /// Authenticate by email and password and issue both tokens.
    pub async fn login(&self, req: LoginRequest) -> Result<Authenticated, AuthError> {
        // "No such user" and "wrong password" are deliberately the same error
        // so a caller cannot probe for registered emails.
        let Some(mut user) = self.users.get_by_email(&req.email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(&req.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        user.last_login_at = Some(now);
        user.updated_at = now;

        // Best effort: a failed last-login write must never fail the login.
        let user = match self.users.update(user.clone()).await {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "failed to record last login");
                user
            }
        };

        self.issue(user, true)
    }

    /// Exchange a valid refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated; the returned response carries
    /// no refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Authenticated, AuthError> {
        let user_id = self.tokens.validate_refresh_token(refresh_token)?;

        let Some(user) = self.users.get_by_id(user_id).await? else {
            return Err(AuthError::UserNotFound);
        };

        self.issue(user, false)
    }

    /// Resolve an access token to the current profile.
    ///
    /// This is the call downstream services use to authenticate bearer
    /// requests.
    pub async fn validate_token(&self, access_token: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.validate_access_token(access_token)?;

        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    fn issue(&self, user: User, with_refresh: bool) -> Result<Authenticated, AuthError> {
        let access_token = self.tokens.generate_access_token(user.id)?;
        let refresh_token = if with_refresh {
            Some(self.tokens.generate_refresh_token(user.id)?)
        } else {
            None
        };

        Ok(Authenticated {
            access_token,
            refresh_token,
            user,
            expires_in: self.tokens.access_token_ttl_seconds(),
        })
    }
}
