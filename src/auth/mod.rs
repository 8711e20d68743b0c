//! Bearer-token identification and role gating.

pub mod gate;
pub mod jwt;

pub use gate::*;
pub use jwt::*;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("No token, auth denied")]
    MissingToken,
    #[error("Token is invalid")]
    InvalidToken(String),
    #[error("User not found: {0}")]
    UnknownUser(String),
    #[error("Admin resources access denied")]
    NotAdmin,
    #[error("Token could not be signed: {0}")]
    Signing(String),
    #[error("User lookup failed: {0}")]
    Lookup(String),
}
