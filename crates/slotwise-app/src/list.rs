// Rust guideline compliant 2026-10-12

//! Listing and filtering helpers for bookings.

use chrono::NaiveDateTime;
use rayon::prelude::*;
use slotwise_core::{Booking, BookingStatus};

/// List options for filtering and sorting bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingListOptions {
    /// Filter by status.
    pub status: Option<BookingStatus>,
    /// Filter by service.
    pub service_id: Option<String>,
    /// Filter by scheduled_at >= time.
    pub scheduled_after: Option<NaiveDateTime>,
    /// Filter by scheduled_at <= time.
    pub scheduled_before: Option<NaiveDateTime>,
    /// Keep only bookings that still occupy their interval.
    pub active_only: bool,
    /// Sort field override.
    pub sort: Option<String>,
}

/// Filters and sorts bookings based on `BookingListOptions`.
///
/// Without a sort override, bookings are ordered newest scheduled first.
///
/// # Arguments
///
/// * `bookings` - Bookings to filter and sort
/// * `options` - List options
#[must_use]
pub fn list_bookings(bookings: Vec<Booking>, options: &BookingListOptions) -> Vec<Booking> {
    let mut bookings = apply_filters(bookings, options);
    match options.sort.as_deref() {
        Some(field) => sort_bookings(&mut bookings, field),
        None => bookings.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at)),
    }
    bookings
}

fn apply_filters(bookings: Vec<Booking>, options: &BookingListOptions) -> Vec<Booking> {
    const PARALLEL_THRESHOLD: usize = 1_000;

    let predicate = |b: &Booking| {
        if let Some(status) = options.status {
            if b.status != status {
                return false;
            }
        }
        if let Some(ref service_id) = options.service_id {
            if b.service_id != *service_id {
                return false;
            }
        }
        if let Some(after) = options.scheduled_after {
            if b.scheduled_at < after {
                return false;
            }
        }
        if let Some(before) = options.scheduled_before {
            if b.scheduled_at > before {
                return false;
            }
        }
        !options.active_only || b.is_active()
    };

    if bookings.len() >= PARALLEL_THRESHOLD {
        bookings.into_par_iter().filter(|b| predicate(b)).collect()
    } else {
        bookings.into_iter().filter(predicate).collect()
    }
}

fn sort_bookings(bookings: &mut [Booking], field: &str) {
    match field {
        "id" => bookings.sort_by(|a, b| a.id.cmp(&b.id)),
        "scheduled_at" => bookings.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at)),
        "created_at" => bookings.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        "updated_at" => bookings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        "status" => bookings.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
        "price" => bookings.sort_by(|a, b| a.total_price_cents.cmp(&b.total_price_cents)),
        _ => bookings.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at)),
    }
}
