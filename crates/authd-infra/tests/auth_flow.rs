//! End-to-end credential flows over the real JWT and Argon2 adapters with the
//! in-memory store.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use uuid::Uuid;

use authd_core::error::AuthError;
use authd_core::ports::{TokenService, UserRepository};
use authd_core::service::{CredentialService, LoginRequest, RegisterRequest};
use authd_infra::{Argon2PasswordService, InMemoryUserRepository, JwtConfig, JwtTokenService};

const SECRET: &str = "flow-test-secret";

struct Harness {
    service: CredentialService,
    users: Arc<InMemoryUserRepository>,
    tokens: Arc<JwtTokenService>,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_ttl_secs: 3600,
    }));
    let service = CredentialService::new(
        users.clone(),
        tokens.clone(),
        Arc::new(Argon2PasswordService::new()),
    );

    Harness {
        service,
        users,
        tokens,
    }
}

fn register_request(email: &str, username: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: "correct horse battery staple".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Craft a token with arbitrary claims, signed with the harness secret.
fn craft_token(user_id: Uuid, kind: &str, exp: i64) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: String,
        kind: &'a str,
        iat: i64,
        exp: i64,
    }

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: user_id.to_string(),
            kind,
            iat: Utc::now().timestamp(),
            exp,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn register_returns_tokens_that_validate_to_the_new_id() {
    let h = harness();

    let auth = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    assert!(!auth.user.id.is_nil());
    assert_eq!(auth.user.email, "ada@example.com");
    assert_eq!(auth.user.username, "ada");
    assert_eq!(auth.expires_in, 3600);

    let from_access = h.tokens.validate_access_token(&auth.access_token).unwrap();
    let from_refresh = h
        .tokens
        .validate_refresh_token(auth.refresh_token.as_deref().unwrap())
        .unwrap();

    assert_eq!(from_access, auth.user.id);
    assert_eq!(from_refresh, auth.user.id);
}

#[tokio::test]
async fn second_registration_conflicts_and_leaves_one_record() {
    let h = harness();

    let first = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    let err = h
        .service
        .register(register_request("ada@example.com", "countess"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserExists));

    let stored = h
        .users
        .get_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.user.id);
    assert!(h.users.get_by_username("countess").await.unwrap().is_none());
}

#[tokio::test]
async fn login_verifies_the_stored_argon2_hash() {
    let h = harness();
    h.service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    let ok = h
        .service
        .login(login_request(
            "ada@example.com",
            "correct horse battery staple",
        ))
        .await
        .unwrap();
    assert!(ok.refresh_token.is_some());
    assert!(ok.user.last_login_at.is_some());

    let wrong = h
        .service
        .login(login_request("ada@example.com", "tr0ub4dor&3"))
        .await
        .unwrap_err();
    assert!(matches!(wrong, AuthError::InvalidCredentials));

    let unknown = h
        .service
        .login(login_request(
            "nobody@example.com",
            "correct horse battery staple",
        ))
        .await
        .unwrap_err();
    assert!(matches!(unknown, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn refresh_issues_a_fresh_access_token_only() {
    let h = harness();
    let registered = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    let refreshed = h
        .service
        .refresh_token(registered.refresh_token.as_deref().unwrap())
        .await
        .unwrap();

    assert!(refreshed.refresh_token.is_none());
    assert_eq!(
        h.tokens
            .validate_access_token(&refreshed.access_token)
            .unwrap(),
        registered.user.id
    );
}

#[tokio::test]
async fn refresh_with_an_access_token_is_invalid() {
    let h = harness();
    let registered = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    let err = h
        .service
        .refresh_token(&registered.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}

#[tokio::test]
async fn refresh_for_a_deleted_user_is_not_found() {
    let h = harness();
    let registered = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    h.users.delete(registered.user.id).await.unwrap();

    let err = h
        .service
        .refresh_token(registered.refresh_token.as_deref().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}

#[tokio::test]
async fn expired_refresh_token_fails_before_the_store_is_consulted() {
    let h = harness();
    let registered = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    // Deleted user AND expired token: expiry must win, proving the store is
    // never reached.
    h.users.delete(registered.user.id).await.unwrap();
    let expired = craft_token(
        registered.user.id,
        "refresh",
        (Utc::now() - TimeDelta::hours(1)).timestamp(),
    );

    let err = h.service.refresh_token(&expired).await.unwrap_err();
    assert!(matches!(err, AuthError::ExpiredToken));
}

#[tokio::test]
async fn token_signed_with_another_secret_is_invalid_not_expired() {
    let h = harness();
    let foreign = JwtTokenService::new(JwtConfig {
        secret: "someone-elses-secret".to_string(),
        access_ttl_secs: -3600,
    });

    let token = foreign.generate_access_token(Uuid::new_v4()).unwrap();

    let err = h.service.validate_token(&token).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken));
}

#[tokio::test]
async fn validate_token_returns_the_current_profile() {
    let h = harness();
    let registered = h
        .service
        .register(register_request("ada@example.com", "ada"))
        .await
        .unwrap();

    let user = h
        .service
        .validate_token(&registered.access_token)
        .await
        .unwrap();
    assert_eq!(user.id, registered.user.id);
    assert!(user.is_active);

    h.users.delete(registered.user.id).await.unwrap();
    let err = h
        .service
        .validate_token(&registered.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}
