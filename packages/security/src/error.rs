use storefront_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecurityError {
    /// Login failed. Deliberately says nothing about which field was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Admin '{0}' already exists")]
    AdminExists(String),

    #[error("Admin '{0}' not found")]
    AdminNotFound(String),

    #[error("Invalid {field}: {message}")]
    InvalidInput {
        field: &'static str,
        message: String,
    },

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for SecurityError {
    fn from(err: sqlx::Error) -> Self {
        SecurityError::Storage(StorageError::Sqlx(err))
    }
}

pub type SecurityResult<T> = Result<T, SecurityError>;
