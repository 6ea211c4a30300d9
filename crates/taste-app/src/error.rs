use taste_media::MediaError;
use taste_store::StoreError;
use thiserror::Error;

/// Errors surfaced to the presentation layer.
///
/// Storage failures are reported by the facades as-is; the auth flows
/// translate the ones with a user-facing meaning (duplicate email, blank
/// fields) one level up, per the propagation policy.
#[derive(Error, Debug)]
pub enum AppError {
    /// Failure inside the SQLite store.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Failure copying or locating an image file.
    #[error("Image error: {0}")]
    Media(#[from] MediaError),

    /// Session-slot or directory I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session-slot serialization failure.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Registration hit the unique-email constraint.
    #[error("Registration failed: that email is already registered")]
    EmailTaken,

    /// A required field was blank.
    #[error("{0}")]
    Validation(String),

    /// A background storage task was cancelled or panicked.
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
