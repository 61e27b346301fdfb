// Rust guideline compliant 2026-10-12

//! Booking state machine.
//!
//! Transitions are keyed by the current status and the role of the acting
//! party:
//!
//! - Pending → Confirmed (provider)
//! - Confirmed → InProgress (provider)
//! - InProgress → Completed (provider)
//! - Pending, Confirmed → Cancelled (either party)
//! - InProgress → Cancelled (provider)
//!
//! Completed and Cancelled are terminal and reject every transition.

use crate::models::{Actor, Booking, BookingStatus, Cancellation, Role};
use crate::{Error, Result};
use chrono::NaiveDateTime;

impl BookingStatus {
    /// Returns true for Completed and Cancelled.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Returns true while a booking in this status occupies its interval.
    ///
    /// Only cancellation releases the interval; a completed booking still
    /// counts against the provider's calendar.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != BookingStatus::Cancelled
    }

    /// Returns the statuses the given role may move a booking to.
    #[must_use]
    pub fn allowed_targets(&self, role: Role) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match (self, role) {
            (Pending, Role::Provider) => &[Confirmed, Cancelled],
            (Pending, Role::Customer) => &[Cancelled],
            (Confirmed, Role::Provider) => &[InProgress, Cancelled],
            (Confirmed, Role::Customer) => &[Cancelled],
            (InProgress, Role::Provider) => &[Completed, Cancelled],
            (InProgress, Role::Customer) => &[],
            (Completed, _) | (Cancelled, _) => &[],
        }
    }

    /// Checks if the role may move a booking from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` naming both states when the pair is not
    /// in the transition table for the role.
    pub fn can_transition_to(&self, target: BookingStatus, role: Role) -> Result<()> {
        if self.allowed_targets(role).contains(&target) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }
}

/// A requested status change with its optional payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    /// Status to move to.
    pub target: BookingStatus,
    /// Cancellation reason, required when cancelling.
    pub reason: Option<String>,
    /// Explicit actual start, used instead of the clock when starting.
    pub actual_start: Option<NaiveDateTime>,
    /// Explicit actual end, used instead of the clock when completing.
    pub actual_end: Option<NaiveDateTime>,
    /// Replacement notes.
    pub notes: Option<String>,
}

impl StatusChange {
    /// A bare change to `target`.
    #[must_use]
    pub fn to(target: BookingStatus) -> Self {
        Self {
            target,
            reason: None,
            actual_start: None,
            actual_end: None,
            notes: None,
        }
    }

    /// A cancellation with the given reason.
    pub fn cancel(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            ..Self::to(BookingStatus::Cancelled)
        }
    }
}

/// Requires the actor to be the booking's customer or its provider.
///
/// Identity is compared, not just the role name.
///
/// # Errors
///
/// Returns `Unauthorized` naming the actor and the booking.
pub fn authorize(booking: &Booking, actor: &Actor) -> Result<()> {
    if booking.involves(actor) {
        Ok(())
    } else {
        Err(Error::Unauthorized {
            actor: actor.to_string(),
            resource: format!("booking {}", booking.id),
        })
    }
}

/// Applies a status change to a booking.
///
/// All checks run before the booking is touched, so a rejected change
/// leaves it unmodified.
///
/// # Arguments
///
/// * `booking` - Booking to update in place
/// * `actor` - Party requesting the change
/// * `change` - Target status and payload
/// * `now` - Current time, used for auto-stamps
///
/// # Returns
///
/// The status the booking had before the change.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is neither the booking's customer nor its provider
/// - The transition is not in the table for the actor's role
/// - A cancellation carries no reason
/// - The resulting actual end precedes the actual start
pub fn apply_transition(
    booking: &mut Booking,
    actor: &Actor,
    change: StatusChange,
    now: NaiveDateTime,
) -> Result<BookingStatus> {
    authorize(booking, actor)?;
    let from = booking.status;
    from.can_transition_to(change.target, actor.role)?;

    let cancellation = if change.target == BookingStatus::Cancelled {
        let reason = change
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::Validation("Cancellation reason is required".to_string()))?;
        Some(Cancellation {
            reason: reason.to_string(),
            cancelled_by: actor.role,
            cancelled_at: now,
        })
    } else {
        None
    };

    let mut actual_start = booking.actual_start;
    let mut actual_end = booking.actual_end;
    match change.target {
        BookingStatus::InProgress => {
            actual_start = Some(change.actual_start.unwrap_or(now));
        }
        BookingStatus::Completed => {
            if change.actual_start.is_some() {
                actual_start = change.actual_start;
            }
            actual_end = Some(change.actual_end.unwrap_or(now));
        }
        _ => {}
    }
    if let (Some(start), Some(end)) = (actual_start, actual_end) {
        if end < start {
            return Err(Error::Validation(
                "Actual end cannot be before actual start".to_string(),
            ));
        }
    }

    if cancellation.is_some() {
        booking.cancellation = cancellation;
    }
    booking.actual_start = actual_start;
    booking.actual_end = actual_end;
    if let Some(notes) = change.notes {
        booking.notes = Some(notes);
    }
    booking.status = change.target;
    booking.updated_at = now;

    tracing::info!(
        booking_id = %booking.id,
        actor = %actor,
        from = %from,
        to = %booking.status,
        "booking status changed"
    );
    Ok(from)
}
