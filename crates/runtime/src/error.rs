//! Errors surfaced by the content runtime.

use thiserror::Error;

use game_core::RegistrationError;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("host has already started")]
    AlreadyStarted,
}
