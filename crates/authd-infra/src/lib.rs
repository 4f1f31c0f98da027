//! # Authd Infrastructure
//!
//! Concrete implementations of the ports defined in `authd-core`:
//! JWT token signing, Argon2 password hashing, and the credential store
//! backends.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL credential store via SeaORM; without
//!   it only the in-memory store is available.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::PostgresUserRepository;
