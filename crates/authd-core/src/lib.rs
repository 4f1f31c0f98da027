//! # Authd Core
//!
//! The domain layer of the authd token service.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the user entity, the ports for token signing / password hashing / the
//! credential store, and the credential orchestration service.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{AuthError, RepoError};
pub use service::CredentialService;
