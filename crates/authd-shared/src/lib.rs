//! # Authd Shared
//!
//! Wire types shared between the auth server and its clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
