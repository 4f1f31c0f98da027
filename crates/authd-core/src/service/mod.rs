//! Business services composed from the ports.

mod credentials;

pub use credentials::{Authenticated, CredentialService, LoginRequest, RegisterRequest};
