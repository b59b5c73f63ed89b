use thiserror::Error;

use crate::validation::FieldErrors;

/// Application-wide error types for Naviplus.
#[derive(Error, Debug)]
pub enum AppError {
    /// One or more payload fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Request was well-formed but rejected (missing signup fields, taken username, bad JSON).
    #[error("{0}")]
    BadRequest(String),

    /// Missing, malformed, or unknown token.
    #[error("{0}")]
    Unauthorized(String),

    /// Login credentials did not check out. Deliberately carries no detail.
    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    /// Row does not exist or is outside the caller's scope.
    #[error("{0}")]
    NotFound(String),

    /// Password hashing or verification failed for a reason other than a mismatch.
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// The generic "not found" error used for missing and out-of-scope rows alike.
    pub fn not_found() -> Self {
        AppError::NotFound("Not found.".to_string())
    }

    /// Returns true if the error is the caller's fault and safe to describe in a response.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::BadRequest(_)
                | AppError::Unauthorized(_)
                | AppError::InvalidCredentials
                | AppError::NotFound(_)
        )
    }
}
