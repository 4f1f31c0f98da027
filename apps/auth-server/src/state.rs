//! Application state - shared across all handlers.

use std::sync::Arc;

use authd_core::CredentialService;
use authd_core::ports::{PasswordService, TokenService, UserRepository};
use authd_infra::{Argon2PasswordService, DatabaseConfig, InMemoryUserRepository, JwtTokenService};

#[cfg(feature = "postgres")]
use authd_infra::PostgresUserRepository;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let users: Arc<dyn UserRepository> = match db_config {
            Some(config) => match authd_infra::database::connect(config).await {
                Ok(conn) => Arc::new(PostgresUserRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryUserRepository::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryUserRepository::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let users: Arc<dyn UserRepository> = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repository");
            Arc::new(InMemoryUserRepository::new())
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        tracing::info!("Application state initialized");

        Self {
            credentials: Arc::new(CredentialService::new(users, tokens, passwords)),
        }
    }
}
