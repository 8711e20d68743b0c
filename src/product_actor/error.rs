use thiserror::Error;

use crate::actor_framework::{FrameworkError, StoreError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Catalog is read-only: {0}")]
    ReadOnly(&'static str),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<StoreError<ProductError>> for ProductError {
    fn from(err: StoreError<ProductError>) -> Self {
        match err {
            StoreError::Domain(e) => e,
            StoreError::Framework(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            StoreError::Framework(e) => ProductError::ActorCommunicationError(e.to_string()),
        }
    }
}
