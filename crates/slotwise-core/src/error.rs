// Rust guideline compliant 2026-10-12

//! Error types for the Slotwise core library.

use crate::interval::Conflict;
use crate::models::BookingStatus;
use thiserror::Error;

/// Result type alias for Slotwise operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Slotwise operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed input, rejected before any state mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced provider, service, slot or booking does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record that was looked up.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Candidate interval overlaps committed state.
    #[error("Scheduling conflict: {}", describe_conflicts(.0))]
    SchedulingConflict(Vec<Conflict>),

    /// Actor does not own or control the targeted resource.
    #[error("Not authorized: {actor} cannot access {resource}")]
    Unauthorized {
        /// Acting identity, rendered as `role:id`.
        actor: String,
        /// Targeted resource, rendered as `kind id`.
        resource: String,
    },

    /// Booking status change not reachable for the requesting actor.
    #[error("Invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: BookingStatus,
        /// Attempted status.
        to: BookingStatus,
    },

    /// Slot is already marked booked.
    #[error("Slot is already booked: {0}")]
    AlreadyBooked(String),

    /// Slot cannot be removed while booked.
    #[error("Cannot delete a booked slot: {0}")]
    SlotBooked(String),

    /// Persistence or locking layer is not available.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl Error {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns true for domain errors the caller can act on.
    ///
    /// Infrastructure failures (`Io`, `Json`, `Unavailable`) return false.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Json(_) | Error::Unavailable(_))
    }
}

fn describe_conflicts(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return "interval overlaps existing commitments".to_string();
    }
    let parts: Vec<String> = conflicts.iter().map(ToString::to_string).collect();
    format!(
        "interval conflicts with existing commitments: {}",
        parts.join(", ")
    )
}
