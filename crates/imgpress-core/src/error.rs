//! Error types module
//!
//! All failures that cross a crate boundary are unified under `AppError`.
//! Each variant carries enough metadata (status code, machine-readable code,
//! log level) for the HTTP layer to render a consistent response without
//! matching on variants itself.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code this error should be rendered as.
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => 500,
            AppError::ImageProcessing(_) => 422,
            AppError::InvalidInput(_) | AppError::BadRequest(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Unauthorized(_) => 401,
            AppError::Conflict(_) => 409,
        }
    }

    /// Machine-readable error code for clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::ImageProcessing(_) => "IMAGE_PROCESSING_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// How loudly to log this error. Client mistakes stay at debug.
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_)
            | AppError::BadRequest(_)
            | AppError::NotFound(_)
            | AppError::PayloadTooLarge(_)
            | AppError::Unauthorized(_)
            | AppError::Conflict(_) => LogLevel::Debug,
            AppError::ImageProcessing(_) => LogLevel::Warn,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
