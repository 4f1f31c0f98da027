//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod repository;

pub use auth::{HashError, PasswordService, TokenError, TokenKind, TokenService};
pub use repository::UserRepository;
