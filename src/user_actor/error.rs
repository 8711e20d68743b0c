use thiserror::Error;

use crate::actor_framework::{FrameworkError, StoreError};

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("Users are read-only: {0}")]
    ReadOnly(&'static str),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError<UserError>> for UserError {
    fn from(err: StoreError<UserError>) -> Self {
        match err {
            StoreError::Domain(e) => e,
            StoreError::Framework(FrameworkError::NotFound(id)) => UserError::NotFound(id),
            StoreError::Framework(e) => UserError::ActorCommunicationError(e.to_string()),
        }
    }
}
