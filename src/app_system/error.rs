use thiserror::Error;

use super::{ConfigError, SeedError};
use crate::auth::AuthError;
use crate::payment::{MailError, ProcessorError};

/// Failures while starting, running or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("payment processor setup failed: {0}")]
    Processor(#[from] ProcessorError),
    #[error("mailer setup failed: {0}")]
    Mail(#[from] MailError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("user {0} is not in the seed data")]
    UnknownUser(uuid::Uuid),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
    #[error("actor task failed: {0}")]
    ActorTask(String),
}
