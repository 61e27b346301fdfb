// Rust guideline compliant 2026-10-12

//! Support for the rating subsystem.
//!
//! Ratings themselves live outside the core. The core answers whether a
//! booking may be rated and derives averages on read.

use crate::models::{Booking, BookingStatus};
use crate::{Error, Result};

/// Checks that `customer_id` may rate the booking.
///
/// # Errors
///
/// Returns `Unauthorized` if the customer did not make the booking and a
/// validation error if the booking is not completed or already rated.
pub fn check_ratable(booking: &Booking, customer_id: &str, already_rated: bool) -> Result<()> {
    if booking.customer_id != customer_id {
        return Err(Error::Unauthorized {
            actor: format!("customer:{}", customer_id),
            resource: format!("booking {}", booking.id),
        });
    }
    if booking.status != BookingStatus::Completed {
        return Err(Error::Validation(format!(
            "Only completed bookings can be rated, booking {} is {}",
            booking.id, booking.status
        )));
    }
    if already_rated {
        return Err(Error::Validation(format!(
            "Booking {} has already been rated",
            booking.id
        )));
    }
    Ok(())
}

/// Average of the given scores rounded to two decimals, `None` when empty.
#[must_use]
pub fn average(scores: &[u8]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let mean = sum as f64 / scores.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}
