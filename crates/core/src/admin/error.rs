use thiserror::Error;

use crate::cache::KeyDerivationError;
use crate::storage::{repository_error_to_status_code, RepositoryError};

/// Errors surfaced by admin operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<KeyDerivationError> for AdminError {
    fn from(_: KeyDerivationError) -> Self {
        AdminError::Unauthorized
    }
}

/// Maps an [`AdminError`] to an HTTP status code.
pub fn admin_error_to_status_code(error: &AdminError) -> u16 {
    match error {
        AdminError::Unauthorized => 401,
        AdminError::Forbidden => 403,
        AdminError::InvalidInput(_) => 400,
        AdminError::Repository(err) => repository_error_to_status_code(err),
    }
}
