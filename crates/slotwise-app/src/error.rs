// Rust guideline compliant 2026-10-12

//! Error handling for Slotwise application services.

use serde::Serialize;
use slotwise_core::Error as CoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for application-level operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Stable error codes for tool and command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The requested provider, service, slot or booking was not found.
    NotFound,
    /// Input validation failed.
    ValidationError,
    /// The interval overlaps committed slots or bookings.
    SchedulingConflict,
    /// The actor does not control the resource.
    Unauthorized,
    /// The requested booking status change is not allowed.
    InvalidTransition,
    /// The slot is already booked.
    AlreadyBooked,
    /// A booked slot cannot be deleted.
    SlotBooked,
    /// Storage or locking is unavailable.
    Unavailable,
    /// IO failure while reading or writing repository data.
    IoError,
    /// JSON serialization or parsing failed.
    JsonError,
    /// The repository has not been initialized.
    RepoNotInitialized,
    /// The request included invalid inputs.
    InvalidInput,
}

impl ErrorCode {
    /// Returns true for codes caused by infrastructure rather than the request.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            ErrorCode::Unavailable | ErrorCode::IoError | ErrorCode::JsonError
        )
    }
}

/// Application-level errors with stable mapping to error codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Repository is missing or not initialized.
    #[error("Slotwise repository not initialized at {path}. Run 'swt init' first.")]
    RepoNotInitialized {
        /// Path where `.slotwise` was expected.
        path: PathBuf,
    },

    /// Invalid input was provided by the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error from core library operations.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error not represented by core errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a stable error code for the error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::RepoNotInitialized { .. } => ErrorCode::RepoNotInitialized,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => ErrorCode::NotFound,
                CoreError::Validation(_) => ErrorCode::ValidationError,
                CoreError::SchedulingConflict(_) => ErrorCode::SchedulingConflict,
                CoreError::Unauthorized { .. } => ErrorCode::Unauthorized,
                CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
                CoreError::AlreadyBooked(_) => ErrorCode::AlreadyBooked,
                CoreError::SlotBooked(_) => ErrorCode::SlotBooked,
                CoreError::Unavailable(_) => ErrorCode::Unavailable,
                CoreError::Io(_) => ErrorCode::IoError,
                CoreError::Json(_) => ErrorCode::JsonError,
            },
        }
    }

    /// Returns structured details for errors that benefit from extra context.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AppError::RepoNotInitialized { path } => Some(serde_json::json!({
                "path": path,
            })),
            AppError::InvalidInput(_) => None,
            AppError::Io(_) => None,
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => Some(serde_json::json!({
                    "entity": entity,
                    "id": id,
                })),
                CoreError::SchedulingConflict(conflicts) => Some(serde_json::json!({
                    "conflicts": conflicts,
                })),
                CoreError::Unauthorized { actor, resource } => Some(serde_json::json!({
                    "actor": actor,
                    "resource": resource,
                })),
                CoreError::InvalidTransition { from, to } => Some(serde_json::json!({
                    "from": from,
                    "to": to,
                })),
                CoreError::AlreadyBooked(slot_id) | CoreError::SlotBooked(slot_id) => {
                    Some(serde_json::json!({ "slot_id": slot_id }))
                }
                _ => None,
            },
        }
    }
}
