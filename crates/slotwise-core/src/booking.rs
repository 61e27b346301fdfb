// Rust guideline compliant 2026-10-12

//! Booking service: creation, status changes, rescheduling and queries.
//!
//! Creation and every change to a booking's interval run inside the
//! provider lock, so at most one of several overlapping requests for the
//! same provider can succeed.

use crate::fsm::{apply_transition, authorize, StatusChange};
use crate::geo::GeoPoint;
use crate::identity::{generate_id, BOOKING_PREFIX};
use crate::interval::{booking_conflicts, ensure_free, Interval};
use crate::models::{Actor, Booking, BookingStatus, Role, Slot};
use crate::rating::check_ratable;
use crate::repository::Repository;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Input for a new booking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingRequest {
    /// Service being booked.
    pub service_id: String,
    /// Requested start.
    pub scheduled_at: Option<NaiveDateTime>,
    /// Slot to hold, if the customer picked one from search.
    pub slot_id: Option<String>,
    /// Customer notes.
    pub notes: Option<String>,
    /// Where the service is delivered.
    pub customer_address: Option<String>,
    /// Customer location.
    pub customer_location: Option<GeoPoint>,
}

/// Booking counts for one provider, derived on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Every booking ever made.
    pub total: usize,
    /// Bookings not yet completed or cancelled.
    pub active: usize,
    /// Completed bookings.
    pub completed: usize,
    /// Cancelled bookings.
    pub cancelled: usize,
}

/// Booking operations over a repository.
pub struct BookingService<'a, R: Repository> {
    repo: &'a R,
    default_duration_minutes: u32,
}

impl<'a, R: Repository> BookingService<'a, R> {
    /// Creates a service. `default_duration_minutes` applies to services
    /// without a declared duration.
    pub fn new(repo: &'a R, default_duration_minutes: u32) -> Self {
        Self {
            repo,
            default_duration_minutes,
        }
    }

    /// Creates a pending booking.
    ///
    /// The service price and duration are copied onto the booking. The
    /// conflict check and the insert happen under one provider lock.
    ///
    /// # Arguments
    ///
    /// * `customer` - Booking customer; must act in the customer role
    /// * `request` - Service, start time and optional details
    /// * `now` - Current time
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not a customer
    /// - The start time is missing or not in the future
    /// - The service is unknown or inactive, or its provider is unavailable
    /// - The interval overlaps an active booking (`SchedulingConflict`)
    /// - A named slot is not the provider's, is booked or does not cover the interval
    pub fn create(&self, customer: &Actor, request: BookingRequest, now: NaiveDateTime) -> Result<Booking> {
        customer.require_customer()?;
        let scheduled_at = request
            .scheduled_at
            .ok_or_else(|| Error::Validation("Scheduled time is required".to_string()))?;
        ensure_future(scheduled_at, now)?;
        if let Some(location) = &request.customer_location {
            location.validate()?;
        }

        let service = self.repo.service(&request.service_id)?;
        if !service.active {
            return Err(Error::Validation(format!(
                "Service {} is not active",
                service.id
            )));
        }
        let provider = self.repo.provider(&service.provider_id)?;
        if !provider.available {
            return Err(Error::Validation(format!(
                "Provider {} is not accepting bookings",
                provider.id
            )));
        }

        let duration = service
            .duration_minutes
            .unwrap_or(self.default_duration_minutes);
        let interval = Interval::starting_at(scheduled_at, i64::from(duration))?;

        let seed = format!("{}:{}:{}", customer.id, service.id, scheduled_at);
        let booking = Booking {
            id: generate_id(BOOKING_PREFIX, &seed, now.and_utc().timestamp()),
            customer_id: customer.id.clone(),
            provider_id: provider.id.clone(),
            service_id: service.id.clone(),
            slot_id: request.slot_id.clone(),
            scheduled_at: interval.start,
            estimated_end: interval.end,
            actual_start: None,
            actual_end: None,
            status: BookingStatus::Pending,
            total_price_cents: service.price_cents,
            duration_minutes: duration,
            notes: request.notes,
            customer_address: request.customer_address,
            customer_location: request.customer_location,
            cancellation: None,
            created_at: now,
            updated_at: now,
        };
        booking.validate()?;

        self.repo.with_provider_lock(&provider.id, || {
            let mut bookings = self.repo.bookings_for(&provider.id)?;
            let conflicts = booking_conflicts(&bookings, &interval, None);
            if !conflicts.is_empty() {
                tracing::info!(
                    provider_id = %provider.id,
                    interval = %interval,
                    conflicts = conflicts.len(),
                    "booking rejected: overlaps active bookings"
                );
            }
            ensure_free(conflicts)?;

            let held_slots = match &request.slot_id {
                Some(slot_id) => {
                    let mut slots = self.repo.slots_for(&provider.id)?;
                    hold_slot(&mut slots, slot_id, &provider.id, &interval)?;
                    Some(slots)
                }
                None => None,
            };

            let previous = bookings.clone();
            bookings.push(booking.clone());
            self.commit(&provider.id, &previous, &bookings, || match &held_slots {
                Some(slots) => self.repo.replace_slots(&provider.id, slots),
                None => Ok(()),
            })?;
            tracing::info!(
                booking_id = %booking.id,
                provider_id = %provider.id,
                customer_id = %booking.customer_id,
                interval = %interval,
                "booking created"
            );
            Ok(booking.clone())
        })
    }

    /// Applies a status change requested by `actor`.
    ///
    /// Cancelling a booking that holds a slot releases the slot.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Unauthorized`, `InvalidTransition` or a
    /// validation error; see [`apply_transition`].
    pub fn transition(
        &self,
        booking_id: &str,
        actor: &Actor,
        change: StatusChange,
        now: NaiveDateTime,
    ) -> Result<Booking> {
        let located = self.repo.locate_booking(booking_id)?;
        authorize(&located, actor)?;
        let provider_id = located.provider_id;

        self.repo.with_provider_lock(&provider_id, || {
            let mut bookings = self.repo.bookings_for(&provider_id)?;
            let previous = bookings.clone();
            let booking = bookings
                .iter_mut()
                .find(|b| b.id == booking_id)
                .ok_or_else(|| Error::not_found("Booking", booking_id))?;
            apply_transition(booking, actor, change, now)?;
            let updated = booking.clone();

            self.commit(&provider_id, &previous, &bookings, || {
                match (&updated.status, &updated.slot_id) {
                    (BookingStatus::Cancelled, Some(slot_id)) => self.release_slot(&provider_id, slot_id),
                    _ => Ok(()),
                }
            })?;
            Ok(updated)
        })
    }

    /// Provider accepts a pending booking.
    pub fn confirm(&self, booking_id: &str, actor: &Actor, now: NaiveDateTime) -> Result<Booking> {
        self.transition(booking_id, actor, StatusChange::to(BookingStatus::Confirmed), now)
    }

    /// Provider starts a confirmed booking, stamping the actual start.
    pub fn start(&self, booking_id: &str, actor: &Actor, now: NaiveDateTime) -> Result<Booking> {
        self.transition(booking_id, actor, StatusChange::to(BookingStatus::InProgress), now)
    }

    /// Provider completes a booking in progress, stamping the actual end.
    pub fn complete(&self, booking_id: &str, actor: &Actor, now: NaiveDateTime) -> Result<Booking> {
        self.transition(booking_id, actor, StatusChange::to(BookingStatus::Completed), now)
    }

    /// Either party cancels a booking with a reason.
    pub fn cancel(
        &self,
        booking_id: &str,
        actor: &Actor,
        reason: &str,
        now: NaiveDateTime,
    ) -> Result<Booking> {
        self.transition(booking_id, actor, StatusChange::cancel(reason), now)
    }

    /// Moves a pending or confirmed booking to a new start.
    ///
    /// Only the booking's customer may reschedule. The duration is kept and
    /// the new interval is checked against the provider's other active
    /// bookings. A held slot is released, since the booking no longer sits
    /// inside it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not the booking's customer
    /// - The booking is not pending or confirmed
    /// - The new start is not in the future
    /// - The new interval overlaps another active booking
    pub fn reschedule(
        &self,
        booking_id: &str,
        customer: &Actor,
        new_start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Booking> {
        let located = self.repo.locate_booking(booking_id)?;
        if customer.role != Role::Customer || !located.involves(customer) {
            return Err(Error::Unauthorized {
                actor: customer.to_string(),
                resource: format!("booking {}", booking_id),
            });
        }
        ensure_future(new_start, now)?;
        let provider_id = located.provider_id;

        self.repo.with_provider_lock(&provider_id, || {
            let mut bookings = self.repo.bookings_for(&provider_id)?;
            let previous = bookings.clone();
            let booking = bookings
                .iter_mut()
                .find(|b| b.id == booking_id)
                .ok_or_else(|| Error::not_found("Booking", booking_id))?;
            if !matches!(booking.status, BookingStatus::Pending | BookingStatus::Confirmed) {
                return Err(Error::Validation(format!(
                    "Cannot reschedule a booking in status {}",
                    booking.status
                )));
            }

            let interval = Interval::starting_at(new_start, i64::from(booking.duration_minutes))?;
            let booking_id = booking.id.clone();
            let held_slot = booking.slot_id.take();
            booking.scheduled_at = interval.start;
            booking.estimated_end = interval.end;
            booking.updated_at = now;
            let updated = booking.clone();

            ensure_free(booking_conflicts(&bookings, &interval, Some(&booking_id)))?;
            self.commit(&provider_id, &previous, &bookings, || match &held_slot {
                Some(slot_id) => self.release_slot(&provider_id, slot_id),
                None => Ok(()),
            })?;
            tracing::info!(booking_id = %booking_id, interval = %interval, "booking rescheduled");
            Ok(updated)
        })
    }

    /// Reads a booking. Only its customer or provider may read it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Unauthorized`.
    pub fn get(&self, booking_id: &str, actor: &Actor) -> Result<Booking> {
        let booking = self.repo.locate_booking(booking_id)?;
        authorize(&booking, actor)?;
        Ok(booking)
    }

    /// Lists a customer's bookings, newest scheduled first.
    pub fn for_customer(&self, customer_id: &str, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        let bookings = self
            .repo
            .all_bookings()?
            .into_iter()
            .filter(|b| b.customer_id == customer_id)
            .collect();
        Ok(newest_first(bookings, status))
    }

    /// Lists a provider's bookings, newest scheduled first.
    pub fn for_provider(&self, provider_id: &str, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        Ok(newest_first(self.repo.bookings_for(provider_id)?, status))
    }

    /// Lists the actor's bookings scheduled after `now` that are still open,
    /// soonest first.
    pub fn upcoming(&self, actor: &Actor, now: NaiveDateTime) -> Result<Vec<Booking>> {
        let bookings = match actor.role {
            Role::Customer => self.for_customer(&actor.id, None)?,
            Role::Provider => self.for_provider(&actor.id, None)?,
        };
        let mut upcoming: Vec<Booking> = bookings
            .into_iter()
            .filter(|b| b.scheduled_at > now && !b.status.is_terminal())
            .collect();
        upcoming.sort_by_key(|b| b.scheduled_at);
        Ok(upcoming)
    }

    /// Lists a customer's completed bookings that have not been rated yet.
    ///
    /// `rated` holds the ids of bookings the rating subsystem already knows.
    pub fn ratable(&self, customer_id: &str, rated: &HashSet<String>) -> Result<Vec<Booking>> {
        Ok(self
            .for_customer(customer_id, Some(BookingStatus::Completed))?
            .into_iter()
            .filter(|b| check_ratable(b, customer_id, rated.contains(&b.id)).is_ok())
            .collect())
    }

    /// Counts a provider's bookings by outcome.
    pub fn provider_stats(&self, provider_id: &str) -> Result<ProviderStats> {
        self.repo.provider(provider_id)?;
        let bookings = self.repo.bookings_for(provider_id)?;
        Ok(ProviderStats {
            total: bookings.len(),
            active: bookings.iter().filter(|b| !b.status.is_terminal()).count(),
            completed: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Completed)
                .count(),
            cancelled: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Cancelled)
                .count(),
        })
    }

    /// Writes `bookings`, then runs `slot_write`. A failed slot write puts
    /// `previous` back, so a failed operation leaves no partial state. The
    /// caller holds the provider lock.
    fn commit<F>(&self, provider_id: &str, previous: &[Booking], bookings: &[Booking], slot_write: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        self.repo.replace_bookings(provider_id, bookings)?;
        if let Err(err) = slot_write() {
            if let Err(restore) = self.repo.replace_bookings(provider_id, previous) {
                tracing::error!(provider_id, error = %restore, "failed to restore bookings after slot write error");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Clears the booked flag of a slot. The caller holds the provider lock.
    fn release_slot(&self, provider_id: &str, slot_id: &str) -> Result<()> {
        let mut slots = self.repo.slots_for(provider_id)?;
        match slots.iter_mut().find(|s| s.id == slot_id) {
            Some(slot) if slot.is_booked => {
                slot.is_booked = false;
                self.repo.replace_slots(provider_id, &slots)?;
                tracing::debug!(provider_id, slot_id, "slot released");
            }
            Some(_) => {}
            None => tracing::warn!(provider_id, slot_id, "held slot no longer exists"),
        }
        Ok(())
    }
}

fn hold_slot(slots: &mut [Slot], slot_id: &str, provider_id: &str, interval: &Interval) -> Result<()> {
    let slot = slots.iter_mut().find(|s| s.id == slot_id).ok_or_else(|| {
        Error::Validation(format!(
            "Slot {} is not offered by provider {}",
            slot_id, provider_id
        ))
    })?;
    if slot.is_booked {
        return Err(Error::AlreadyBooked(slot_id.to_string()));
    }
    if !slot.interval().contains(interval) {
        return Err(Error::Validation(format!(
            "Booking {} does not fit in slot {} ({})",
            interval,
            slot_id,
            slot.interval()
        )));
    }
    slot.is_booked = true;
    Ok(())
}

fn ensure_future(start: NaiveDateTime, now: NaiveDateTime) -> Result<()> {
    if start <= now {
        return Err(Error::Validation(
            "Scheduled time must be in the future".to_string(),
        ));
    }
    Ok(())
}

fn newest_first(bookings: Vec<Booking>, status: Option<BookingStatus>) -> Vec<Booking> {
    let mut bookings: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| status.map_or(true, |s| b.status == s))
        .collect();
    bookings.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    bookings
}
