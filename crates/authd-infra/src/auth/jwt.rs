//! JWT token service implementation.

use std::collections::HashSet;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authd_core::ports::{TokenError, TokenKind, TokenService};

/// Refresh tokens always live this long; only the access TTL is configurable.
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_ttl_secs: 3600,
        }
    }
}

/// Wire-format claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    kind: TokenKind,
    iat: i64, // issued at
    exp: i64, // expiration timestamp
}

/// HS256-signed, self-contained access and refresh tokens.
///
/// Validation order is signature, then kind, then expiry: an expired refresh
/// token presented as an access token reports invalid, not expired.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            access_ttl_secs: config.access_ttl_secs,
        }
    }

    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "change-me-in-production".to_string());

        // Warn if using default secret in production
        if secret == "change-me-in-production" {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        let config = JwtConfig {
            secret,
            access_ttl_secs: std::env::var("JWT_ACCESS_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        };
        Self::new(config)
    }

    fn generate(&self, user_id: Uuid, kind: TokenKind, ttl: TimeDelta) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn validate(&self, token: &str, kind: TokenKind) -> Result<Uuid, TokenError> {
        // Only HS256 is accepted; a header naming any other algorithm fails
        // decoding. Expiry is checked by hand after the kind check so that a
        // kind mismatch is reported even when the token is also expired.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|_| TokenError::Invalid)?;

        if data.claims.kind != kind {
            return Err(TokenError::Invalid);
        }

        if data.claims.exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        data.claims.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

impl TokenService for JwtTokenService {
    fn generate_access_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.generate(
            user_id,
            TokenKind::Access,
            TimeDelta::seconds(self.access_ttl_secs),
        )
    }

    fn generate_refresh_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.generate(
            user_id,
            TokenKind::Refresh,
            TimeDelta::days(REFRESH_TOKEN_TTL_DAYS),
        )
    }

    fn validate_access_token(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate(token, TokenKind::Access)
    }

    fn validate_refresh_token(&self, token: &str) -> Result<Uuid, TokenError> {
        self.validate(token, TokenKind::Refresh)
    }

    fn access_token_ttl_seconds(&self) -> i64 {
        self.access_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            access_ttl_secs: 3600,
        })
    }

    /// TTL in the past makes every issued access token already expired.
    fn expired_service() -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            access_ttl_secs: -60,
        })
    }

    #[test]
    fn access_token_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.generate_access_token(user_id).unwrap();
        assert!(!token.is_empty());

        assert_eq!(service.validate_access_token(&token).unwrap(), user_id);
    }

    #[test]
    fn refresh_token_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.generate_refresh_token(user_id).unwrap();

        assert_eq!(service.validate_refresh_token(&token).unwrap(), user_id);
    }

    #[test]
    fn kind_mismatch_is_invalid_both_ways() {
        let service = service();
        let user_id = Uuid::new_v4();

        let access = service.generate_access_token(user_id).unwrap();
        let refresh = service.generate_refresh_token(user_id).unwrap();

        assert_eq!(
            service.validate_refresh_token(&access).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            service.validate_access_token(&refresh).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let service = expired_service();

        let token = service.generate_access_token(Uuid::new_v4()).unwrap();

        assert_eq!(
            service.validate_access_token(&token).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn expired_token_of_the_wrong_kind_is_invalid() {
        let service = expired_service();

        let token = service.generate_access_token(Uuid::new_v4()).unwrap();

        // Kind is checked before expiry.
        assert_eq!(
            service.validate_refresh_token(&token).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn foreign_secret_is_invalid_regardless_of_expiry() {
        let ours = service();
        let theirs = JwtTokenService::new(JwtConfig {
            secret: "some-other-secret".to_string(),
            access_ttl_secs: -60,
        });

        let token = theirs.generate_access_token(Uuid::new_v4()).unwrap();

        assert_eq!(
            ours.validate_access_token(&token).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn garbage_is_invalid() {
        let service = service();

        assert_eq!(
            service.validate_access_token("not-a-token").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn unexpected_algorithm_is_invalid() {
        let service = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            kind: TokenKind::Access,
            iat: now.timestamp(),
            exp: (now + TimeDelta::hours(1)).timestamp(),
        };

        // Same secret, different HMAC variant in the header.
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap();

        assert_eq!(
            service.validate_access_token(&token).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn access_ttl_is_reported() {
        assert_eq!(service().access_token_ttl_seconds(), 3600);
    }
}
