//! Error types for the p2ds binary

use thiserror::Error;

use crate::scanner::ScanError;

/// Errors that end a run
#[derive(Debug, Error)]
pub enum AppError {
    /// Demo directory missing or unreadable
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Single-attempt mode found nothing usable
    #[error("No valid demo data found in {0}")]
    NoDemoData(String),

    /// Configuration errors
    #[error(transparent)]
    Common(#[from] p2ds_common::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Scan(_) => 2,
            AppError::NoDemoData(_) => 3,
            _ => 1,
        }
    }
}

/// Result type alias for p2ds operations
pub type Result<T> = std::result::Result<T, AppError>;
